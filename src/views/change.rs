//! Percent-change view and chart series.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{ChangeRow, ChangeView, ChartBar, SelectionView, Window};

fn is_positive(value: Option<f64>) -> bool {
    value.is_some_and(|v| v > 0.0)
}

/// Derive the percent-change view from a selection.
///
/// All three positivity flags are computed regardless of which window is on
/// screen. Symbols are the row key: if the selection repeats one, the last
/// row's values win and stay at the first row's position.
pub fn change_view(selection: &SelectionView) -> ChangeView {
    let mut rows: Vec<ChangeRow> = Vec::with_capacity(selection.rows.len());
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in &selection.rows {
        let row = ChangeRow {
            coin_symbol: record.coin_symbol.clone(),
            percent_change_1h: record.percent_change_1h,
            percent_change_24h: record.percent_change_24h,
            percent_change_7d: record.percent_change_7d,
            positive_percent_change_1h: is_positive(record.percent_change_1h),
            positive_percent_change_24h: is_positive(record.percent_change_24h),
            positive_percent_change_7d: is_positive(record.percent_change_7d),
        };

        match index.get(record.coin_symbol.as_str()) {
            Some(&pos) => {
                tracing::warn!(symbol = %record.coin_symbol, "duplicate coin symbol; keeping last values");
                rows[pos] = row;
            }
            None => {
                index.insert(record.coin_symbol.as_str(), rows.len());
                rows.push(row);
            }
        }
    }

    ChangeView { rows }
}

/// Ascending by value; missing values sort last.
fn compare_values(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl ChangeView {
    /// A copy with whole rows stably sorted ascending by `window`'s value.
    pub fn sorted(&self, window: Window) -> ChangeView {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| compare_values(a.value(window), b.value(window)));
        ChangeView { rows }
    }

    /// Bars for `window`, in row order.
    pub fn series(&self, window: Window) -> Vec<ChartBar> {
        self.rows
            .iter()
            .map(|row| ChartBar {
                coin_symbol: row.coin_symbol.clone(),
                value: row.value(window),
                positive: row.is_positive(window),
            })
            .collect()
    }
}
