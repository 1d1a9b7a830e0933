use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Percent-change timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Window {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "24h")]
    TwentyFourHours,
    #[default]
    #[serde(rename = "7d")]
    SevenDays,
}

impl Window {
    /// All windows, in the order the window picker lists them.
    pub const ALL: [Window; 3] = [Window::SevenDays, Window::TwentyFourHours, Window::OneHour];

    pub fn key(self) -> &'static str {
        match self {
            Window::OneHour => "1h",
            Window::TwentyFourHours => "24h",
            Window::SevenDays => "7d",
        }
    }

    /// Name of the matching percent-change column.
    pub fn column(self) -> &'static str {
        match self {
            Window::OneHour => "percent_change_1h",
            Window::TwentyFourHours => "percent_change_24h",
            Window::SevenDays => "percent_change_7d",
        }
    }

    /// Name of the matching derived boolean column.
    pub fn positive_column(self) -> &'static str {
        match self {
            Window::OneHour => "positive_percent_change_1h",
            Window::TwentyFourHours => "positive_percent_change_24h",
            Window::SevenDays => "positive_percent_change_7d",
        }
    }

    /// Caption shown above the chart.
    pub fn label(self) -> &'static str {
        match self {
            Window::OneHour => "1 hour period",
            Window::TwentyFourHours => "24 hour period",
            Window::SevenDays => "7 days period",
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Window {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1h" => Ok(Window::OneHour),
            "24h" => Ok(Window::TwentyFourHours),
            "7d" => Ok(Window::SevenDays),
            other => Err(ValidationError::UnknownWindow(other.to_string())),
        }
    }
}
