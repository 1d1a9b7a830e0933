//! Row selection: filter by symbol, order alphabetically, cap the row count.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{ListingTable, SelectionView};

// ---------------------------------------------------------------------------
// CoinSelection
// ---------------------------------------------------------------------------

/// Which coins a selection keeps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoinSelection {
    /// Every symbol in the table.
    #[default]
    All,
    /// Only these symbols (exact, case-sensitive match).
    Symbols(BTreeSet<String>),
}

impl CoinSelection {
    pub fn only<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CoinSelection::Symbols(symbols.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        match self {
            CoinSelection::All => true,
            CoinSelection::Symbols(set) => set.contains(symbol),
        }
    }
}

// ---------------------------------------------------------------------------
// select
// ---------------------------------------------------------------------------

/// Build a [`SelectionView`] from `table`.
///
/// Rows are ordered by ascending symbol (ties keep their API order), filtered
/// to `coins`, then truncated to the first `limit` rows. `limit` must be at
/// least 1; any upper bound is the caller's business (see
/// [`DisplayOptions::validate`](crate::views::DisplayOptions::validate)).
pub fn select(
    table: &ListingTable,
    coins: &CoinSelection,
    limit: usize,
) -> Result<SelectionView, ValidationError> {
    if limit == 0 {
        return Err(ValidationError::InvalidLimit {
            limit,
            min: 1,
            max: usize::MAX,
        });
    }

    let mut rows: Vec<_> = table
        .rows
        .iter()
        .filter(|r| coins.contains(&r.coin_symbol))
        .cloned()
        .collect();
    rows.sort_by(|a, b| a.coin_symbol.cmp(&b.coin_symbol));
    rows.truncate(limit);

    Ok(SelectionView {
        currency: table.currency.clone(),
        rows,
    })
}

/// Number of rows that pass the symbol filter, before any row limit.
pub fn filtered_count(table: &ListingTable, coins: &CoinSelection) -> usize {
    table
        .rows
        .iter()
        .filter(|r| coins.contains(&r.coin_symbol))
        .count()
}
