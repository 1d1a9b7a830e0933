use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};

// ---------------------------------------------------------------------------
// Wire types -- listings/latest response body
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingsResponse {
    pub status: Option<ApiStatus>,
    pub data: Option<Vec<RawListing>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiStatus {
    pub timestamp: Option<String>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
    pub elapsed: Option<i64>,
    pub credit_count: Option<i64>,
}

/// One coin as sent by the API. `null` and absent fields decode the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawListing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quote: HashMap<String, Option<RawQuote>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawQuote {
    pub price: Option<f64>,
    pub volume_24h: Option<f64>,
    pub percent_change_1h: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub percent_change_7d: Option<f64>,
    pub market_cap: Option<f64>,
}

// ---------------------------------------------------------------------------
// ListingRecord -- one flattened row per coin
// ---------------------------------------------------------------------------

/// A single coin's snapshot, flattened against one quote currency.
///
/// Numeric fields are `None` when the upstream payload omitted or nulled them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub coin_name: String,
    pub coin_symbol: String,
    pub market_cap: Option<f64>,
    pub percent_change_1h: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub percent_change_7d: Option<f64>,
    pub price: Option<f64>,
    pub volume_24h: Option<f64>,
}

impl ListingRecord {
    /// Flatten a raw listing using the quote keyed by `currency`.
    pub fn from_raw(mut raw: RawListing, currency: &str) -> Self {
        let quote = raw.quote.remove(currency).flatten().unwrap_or_default();
        Self {
            coin_name: raw.slug,
            coin_symbol: raw.symbol,
            market_cap: quote.market_cap,
            percent_change_1h: quote.percent_change_1h,
            percent_change_24h: quote.percent_change_24h,
            percent_change_7d: quote.percent_change_7d,
            price: quote.price,
            volume_24h: quote.volume_24h,
        }
    }
}

// ---------------------------------------------------------------------------
// ListingTable -- the full snapshot, in API response order
// ---------------------------------------------------------------------------

/// Rows of one listings fetch, in the order the API returned them.
///
/// Built once per fetch and shared behind an `Arc`; views never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingTable {
    pub currency: String,
    pub rows: Vec<ListingRecord>,
}

impl ListingTable {
    pub const COLUMNS: [&'static str; 8] = [
        "coin_name",
        "coin_symbol",
        "market_cap",
        "percent_change_1h",
        "percent_change_24h",
        "percent_change_7d",
        "price",
        "volume_24h",
    ];

    pub fn new(currency: impl Into<String>, rows: Vec<ListingRecord>) -> Self {
        Self {
            currency: currency.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), Self::COLUMNS.len())
    }

    /// Distinct symbols in ascending order.
    pub fn symbols(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.coin_symbol.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn get(&self, symbol: &str) -> Option<&ListingRecord> {
        self.rows.iter().find(|r| r.coin_symbol == symbol)
    }
}
