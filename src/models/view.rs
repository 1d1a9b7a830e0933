use serde::{Deserialize, Serialize};

use super::listing::{ListingRecord, ListingTable};
use super::window::Window;

// ---------------------------------------------------------------------------
// SelectionView -- filtered, ordered, row-limited subset of a ListingTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionView {
    pub currency: String,
    pub rows: Vec<ListingRecord>,
}

impl SelectionView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), ListingTable::COLUMNS.len())
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.coin_symbol.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// ChangeRow / ChangeView -- percent changes keyed by symbol
// ---------------------------------------------------------------------------

/// Percent changes for one coin with a positivity flag per window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRow {
    pub coin_symbol: String,
    pub percent_change_1h: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub percent_change_7d: Option<f64>,
    pub positive_percent_change_1h: bool,
    pub positive_percent_change_24h: bool,
    pub positive_percent_change_7d: bool,
}

impl ChangeRow {
    pub fn value(&self, window: Window) -> Option<f64> {
        match window {
            Window::OneHour => self.percent_change_1h,
            Window::TwentyFourHours => self.percent_change_24h,
            Window::SevenDays => self.percent_change_7d,
        }
    }

    pub fn is_positive(&self, window: Window) -> bool {
        match window {
            Window::OneHour => self.positive_percent_change_1h,
            Window::TwentyFourHours => self.positive_percent_change_24h,
            Window::SevenDays => self.positive_percent_change_7d,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeView {
    pub rows: Vec<ChangeRow>,
}

impl ChangeView {
    /// Value columns excluding the `coin_symbol` key.
    pub const COLUMNS: [&'static str; 6] = [
        "percent_change_1h",
        "percent_change_24h",
        "percent_change_7d",
        "positive_percent_change_1h",
        "positive_percent_change_24h",
        "positive_percent_change_7d",
    ];

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(rows, columns)`; the symbol key is not counted as a column.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), Self::COLUMNS.len())
    }

    pub fn get(&self, symbol: &str) -> Option<&ChangeRow> {
        self.rows.iter().find(|r| r.coin_symbol == symbol)
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.coin_symbol.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// ChartBar -- one bar of the percent-change chart
// ---------------------------------------------------------------------------

/// A bar for the active window. Renderers color `positive` bars one way and
/// everything else (negative, zero, missing) the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub coin_symbol: String,
    pub value: Option<f64>,
    pub positive: bool,
}
