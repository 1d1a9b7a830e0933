//! User-facing pipeline: display options in, every derived table out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::ValidationError;
use crate::fetcher::ListingsRequest;
use crate::models::{ChangeView, ChartBar, ListingTable, SelectionView, Window};

use super::change::change_view;
use super::select::{filtered_count, select, CoinSelection};

// ---------------------------------------------------------------------------
// DisplayOptions
// ---------------------------------------------------------------------------

/// Everything the user can change between renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Quote currency for prices.
    pub currency: String,
    pub coins: CoinSelection,
    /// Maximum rows shown, within the control's 1..=100 range.
    pub limit: usize,
    pub window: Window,
    /// Sort the change view ascending by the active window before charting.
    pub sort: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            currency: config::DEFAULT_CURRENCY.to_string(),
            coins: CoinSelection::All,
            limit: config::DEFAULT_DISPLAY_LIMIT,
            window: Window::default(),
            sort: true,
        }
    }
}

impl DisplayOptions {
    /// Reject a row count outside the control's bounds. Out-of-range values
    /// are errors, never clamped.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(config::MIN_DISPLAY_LIMIT..=config::MAX_DISPLAY_LIMIT).contains(&self.limit) {
            return Err(ValidationError::InvalidLimit {
                limit: self.limit,
                min: config::MIN_DISPLAY_LIMIT,
                max: config::MAX_DISPLAY_LIMIT,
            });
        }
        if self.currency.trim().is_empty() {
            return Err(ValidationError::InvalidRequest(
                "currency must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The fetch these options need. Only the currency affects it.
    pub fn listings_request(&self) -> ListingsRequest {
        ListingsRequest::for_currency(self.currency.clone())
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// The prepared tables handed to a renderer.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    #[serde(skip)]
    pub table: Arc<ListingTable>,
    /// Rows that passed the symbol filter, before the row limit.
    pub filtered_count: usize,
    pub selection: SelectionView,
    /// Ordered for display: sorted by the active window when requested.
    pub changes: ChangeView,
    pub window: Window,
    pub sorted: bool,
    pub chart: Vec<ChartBar>,
}

impl Dashboard {
    pub fn build(table: Arc<ListingTable>, options: &DisplayOptions) -> Result<Self, ValidationError> {
        options.validate()?;

        let selection = select(&table, &options.coins, options.limit)?;
        let mut changes = change_view(&selection);
        if options.sort {
            changes = changes.sorted(options.window);
        }
        let chart = changes.series(options.window);

        Ok(Self {
            filtered_count: filtered_count(&table, &options.coins),
            table,
            selection,
            changes,
            window: options.window,
            sorted: options.sort,
            chart,
        })
    }

    /// Caption for the chart.
    pub fn chart_label(&self) -> &'static str {
        self.window.label()
    }
}
