//! Listings fetcher.
//!
//! Issues a single GET against the `listings/latest` endpoint and flattens the
//! `data` array into a [`ListingTable`]. Transport failures, upstream error
//! responses and undecodable bodies all surface as a [`FetchError`]; no table
//! is ever built from a failed request.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{FetchError, ValidationError};
use crate::models::{ApiStatus, ListingRecord, ListingTable, ListingsResponse};

// ---------------------------------------------------------------------------
// ListingsRequest
// ---------------------------------------------------------------------------

/// Parameters of one listings fetch. Also the memoization key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingsRequest {
    /// Quote currency code, sent as `convert`.
    pub currency: String,
    /// 1-based offset into the ranking.
    pub start: u32,
    /// Page size.
    pub limit: u32,
}

impl Default for ListingsRequest {
    fn default() -> Self {
        Self {
            currency: config::DEFAULT_CURRENCY.to_string(),
            start: config::DEFAULT_START,
            limit: config::DEFAULT_FETCH_LIMIT,
        }
    }
}

impl ListingsRequest {
    pub fn new(currency: impl Into<String>, start: u32, limit: u32) -> Self {
        Self {
            currency: currency.into(),
            start,
            limit,
        }
    }

    /// Default request for a different quote currency.
    pub fn for_currency(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.currency.trim().is_empty() {
            return Err(ValidationError::InvalidRequest(
                "currency must not be empty".into(),
            ));
        }
        if self.start == 0 {
            return Err(ValidationError::InvalidRequest(
                "start is 1-based and must be at least 1".into(),
            ));
        }
        if self.limit == 0 {
            return Err(ValidationError::InvalidRequest(
                "limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ListingsFetcher
// ---------------------------------------------------------------------------

/// Performs listings requests over a preconfigured blocking HTTP client.
///
/// The client is expected to carry the API key and `Accepts` headers already
/// (see [`CmcClientBuilder`](crate::CmcClientBuilder)).
#[derive(Debug)]
pub struct ListingsFetcher {
    client: Client,
    url: String,
}

impl ListingsFetcher {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            url: config::listings_url(base_url),
        }
    }

    /// The full endpoint URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch one page of listings. Exactly one HTTP request, no retries.
    pub fn fetch(&self, request: &ListingsRequest) -> Result<ListingTable, FetchError> {
        tracing::debug!(
            url = %self.url,
            currency = %request.currency,
            start = request.start,
            limit = request.limit,
            "requesting listings"
        );

        let start = request.start.to_string();
        let limit = request.limit.to_string();
        let resp = self
            .client
            .get(&self.url)
            .query(&[
                ("start", start.as_str()),
                ("limit", limit.as_str()),
                ("convert", request.currency.as_str()),
            ])
            .send()
            .map_err(FetchError::Network)?;

        let status = resp.status();
        let body = resp.text().map_err(FetchError::Network)?;

        if !status.is_success() {
            let err = api_error(status, &body);
            tracing::warn!(status = status.as_u16(), error = %err, "listings request rejected");
            return Err(err);
        }

        let table = parse_listings(&body, &request.currency)?;
        tracing::info!(
            rows = table.len(),
            currency = %table.currency,
            "fetched listings"
        );
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a `listings/latest` body into a table against `currency`.
///
/// Fails with [`FetchError::MalformedResponse`] when the body is not a JSON
/// object or has no `data` array, and with [`FetchError::Api`] when it carries an
/// upstream error status instead of data.
pub fn parse_listings(body: &str, currency: &str) -> Result<ListingTable, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid listings JSON: {e}")))?;
    // serde's derived struct visitor also accepts a positional array.
    if !value.is_object() {
        return Err(FetchError::MalformedResponse(
            "listings body is not a JSON object".into(),
        ));
    }
    let response: ListingsResponse = serde_json::from_value(value)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid listings JSON: {e}")))?;

    let Some(data) = response.data else {
        if let Some(ApiStatus {
            error_code: Some(code),
            error_message,
            ..
        }) = response.status
        {
            if code != 0 {
                return Err(FetchError::Api {
                    status: StatusCode::OK.as_u16(),
                    code,
                    message: error_message.unwrap_or_default(),
                });
            }
        }
        return Err(FetchError::MalformedResponse(
            "response has no `data` array".into(),
        ));
    };

    let rows = data
        .into_iter()
        .map(|raw| ListingRecord::from_raw(raw, currency))
        .collect();
    Ok(ListingTable::new(currency, rows))
}

/// Build an [`FetchError::Api`] from a non-success response, preferring the
/// error details in the body's `status` object when present.
fn api_error(status: StatusCode, body: &str) -> FetchError {
    #[derive(Deserialize)]
    struct ErrorBody {
        status: Option<ApiStatus>,
    }

    let api_status = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.status)
        .unwrap_or_default();

    FetchError::Api {
        status: status.as_u16(),
        code: api_status
            .error_code
            .unwrap_or_else(|| i64::from(status.as_u16())),
        message: api_status.error_message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        }),
    }
}
