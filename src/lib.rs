//! CoinMarketCap listings client for Rust.
//!
//! Fetches a snapshot of the `listings/latest` endpoint, flattens it into a
//! [`ListingTable`], and derives the views a market dashboard needs: an
//! alphabetical, filtered, row-limited [`SelectionView`], a [`ChangeView`]
//! with per-window positivity flags, and the bar series for a chart.
//!
//! Fetches are memoized per [`ListingsRequest`] according to a
//! [`CachePolicy`], so changing display options never re-issues the request.
//!
//! # Quick start
//!
//! ```no_run
//! use cmc_listings::{CmcClient, DisplayOptions, Window};
//!
//! // Reads the key from CMC_PRO_API_KEY.
//! let client = CmcClient::builder().build().unwrap();
//!
//! let options = DisplayOptions {
//!     window: Window::TwentyFourHours,
//!     limit: 20,
//!     ..DisplayOptions::default()
//! };
//! let dashboard = client.dashboard(&options).unwrap();
//! for bar in &dashboard.chart {
//!     println!("{} {:?} {}", bar.coin_symbol, bar.value, bar.positive);
//! }
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod views;

#[cfg(feature = "async")]
pub use async_client::AsyncCmcClient;
pub use cache::{CachePolicy, ListingCache};
pub use error::{CmcError, FetchError, FetchErrorKind, Result, ValidationError};
pub use fetcher::{parse_listings, ListingsFetcher, ListingsRequest};
pub use models::{
    ChangeRow, ChangeView, ChartBar, ListingRecord, ListingTable, SelectionView, Window,
};
pub use views::{change_view, select, CoinSelection, Dashboard, DisplayOptions};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};

// ---------------------------------------------------------------------------
// CmcClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CmcClient`].
///
/// Use [`CmcClient::builder()`] to obtain one.
#[derive(Clone)]
pub struct CmcClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Duration,
    cache_policy: CachePolicy,
}

impl Default for CmcClientBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout: config::DEFAULT_TIMEOUT,
            cache_policy: CachePolicy::default(),
        }
    }
}

impl CmcClientBuilder {
    /// Set the API key explicitly.
    ///
    /// If not set, `CMC_PRO_API_KEY` is read at build time; building fails
    /// when neither is available.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Point the client at a different host (sandbox, proxy, test server).
    ///
    /// Falls back to `CMC_BASE_URL`, then to the production API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how long fetched listings are reused.
    ///
    /// Defaults to [`CachePolicy::UntilRestart`].
    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Build the client. No request is made until listings are first needed.
    pub fn build(self) -> Result<CmcClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(config::api_key_from_env)
            .ok_or_else(|| {
                CmcError::Config(format!(
                    "no API key configured; set {} or call api_key()",
                    config::API_KEY_ENV
                ))
            })?;

        let base_url = self
            .base_url
            .or_else(config::base_url_from_env)
            .unwrap_or_else(|| config::BASE_URL.to_string());
        reqwest::Url::parse(&base_url)
            .map_err(|e| CmcError::Config(format!("invalid base URL '{base_url}': {e}")))?;

        let mut key_value = HeaderValue::from_str(api_key.trim())
            .map_err(|_| CmcError::Config("API key is not a valid header value".into()))?;
        key_value.set_sensitive(true);
        let key_name = HeaderName::from_bytes(config::API_KEY_HEADER.as_bytes())
            .map_err(|e| CmcError::Config(format!("invalid API key header name: {e}")))?;

        let json = HeaderValue::from_static("application/json");
        let mut headers = HeaderMap::new();
        headers.insert(key_name, key_value);
        headers.insert(ACCEPT, json.clone());
        headers.insert(HeaderName::from_static("accepts"), json);

        let http = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(config::MAX_REDIRECTS))
            .default_headers(headers)
            .build()?;

        tracing::debug!(base_url = %base_url, timeout = ?self.timeout, cache_policy = ?self.cache_policy, "built listings client");

        Ok(CmcClient {
            fetcher: ListingsFetcher::new(http, &base_url),
            cache: ListingCache::new(self.cache_policy),
            base_url,
            timeout: self.timeout,
        })
    }
}

// ---------------------------------------------------------------------------
// CmcClient
// ---------------------------------------------------------------------------

/// The main entry point: a listings fetcher plus its memoization cache.
///
/// `CmcClient` is `Send + Sync`; share it behind an `Arc` to share the cache.
#[derive(Debug)]
pub struct CmcClient {
    fetcher: ListingsFetcher,
    cache: ListingCache,
    base_url: String,
    timeout: Duration,
}

impl CmcClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> CmcClientBuilder {
        CmcClientBuilder::default()
    }

    /// Listings for `request`, fetched at most once per cache lifetime.
    ///
    /// A failed fetch is returned as an error and nothing is cached.
    pub fn listings(&self, request: &ListingsRequest) -> Result<Arc<ListingTable>> {
        request.validate()?;
        let table = self
            .cache
            .get_or_fetch(request, || self.fetcher.fetch(request))?;
        Ok(table)
    }

    /// Fetch listings, bypassing and not populating the cache.
    pub fn fetch_uncached(&self, request: &ListingsRequest) -> Result<ListingTable> {
        request.validate()?;
        Ok(self.fetcher.fetch(request)?)
    }

    /// Drop any cached snapshot for `request` and fetch a new one.
    pub fn refresh(&self, request: &ListingsRequest) -> Result<Arc<ListingTable>> {
        if self.cache.invalidate(request) {
            tracing::info!(currency = %request.currency, "listings cache entry invalidated");
        }
        self.listings(request)
    }

    /// Drop every cached snapshot.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Run the whole pipeline for `options`: fetch (memoized), select, derive
    /// the change view and chart series.
    ///
    /// Invalid options are rejected before any network call.
    pub fn dashboard(&self, options: &DisplayOptions) -> Result<Dashboard> {
        options.validate()?;
        let table = self.listings(&options.listings_request())?;
        Ok(Dashboard::build(table, options)?)
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CmcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CmcClient(url={}, cache_policy={:?}, cached={})",
            self.fetcher.url(),
            self.cache.policy(),
            self.cache.len()
        )
    }
}
