//! Async wrapper around [`CmcClient`] for use in async runtimes (Tokio, etc.).
//!
//! The client is built on the blocking HTTP stack, so every call is moved to
//! Tokio's blocking thread pool via [`tokio::task::spawn_blocking`].
//!
//! # Example
//!
//! ```no_run
//! # use cmc_listings::{AsyncCmcClient, DisplayOptions};
//! # async fn example() -> cmc_listings::Result<()> {
//! let client = AsyncCmcClient::builder().build().await?;
//! let dashboard = client.dashboard(DisplayOptions::default()).await?;
//! println!("{} bars", dashboard.chart.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::cache::CachePolicy;
use crate::error::{CmcError, Result};
use crate::fetcher::ListingsRequest;
use crate::models::ListingTable;
use crate::views::{Dashboard, DisplayOptions};
use crate::{CmcClient, CmcClientBuilder};

// ---------------------------------------------------------------------------
// AsyncCmcClientBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`AsyncCmcClient`]; mirrors [`CmcClientBuilder`].
#[derive(Default)]
pub struct AsyncCmcClientBuilder {
    inner: CmcClientBuilder,
}

impl AsyncCmcClientBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.inner = self.inner.api_key(key);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.inner = self.inner.base_url(url);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.inner = self.inner.cache_policy(policy);
        self
    }

    /// Build the client on the blocking pool, where the blocking HTTP
    /// client may be created safely.
    pub async fn build(self) -> Result<AsyncCmcClient> {
        let builder = self.inner;
        let client = tokio::task::spawn_blocking(move || builder.build())
            .await
            .map_err(|e| CmcError::Config(format!("task join error: {e}")))??;
        Ok(AsyncCmcClient {
            inner: Arc::new(client),
        })
    }
}

// ---------------------------------------------------------------------------
// AsyncCmcClient
// ---------------------------------------------------------------------------

/// Async wrapper around a shared [`CmcClient`].
///
/// Cloning is cheap and clones share one cache.
#[derive(Debug, Clone)]
pub struct AsyncCmcClient {
    inner: Arc<CmcClient>,
}

impl AsyncCmcClient {
    pub fn builder() -> AsyncCmcClientBuilder {
        AsyncCmcClientBuilder::default()
    }

    /// Run any sync client operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&CmcClient) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&client))
            .await
            .map_err(|e| CmcError::Config(format!("task join error: {e}")))?
    }

    pub async fn listings(&self, request: ListingsRequest) -> Result<Arc<ListingTable>> {
        self.run(move |c| c.listings(&request)).await
    }

    pub async fn refresh(&self, request: ListingsRequest) -> Result<Arc<ListingTable>> {
        self.run(move |c| c.refresh(&request)).await
    }

    pub async fn dashboard(&self, options: DisplayOptions) -> Result<Dashboard> {
        self.run(move |c| c.dashboard(&options)).await
    }

    /// The wrapped sync client, for calls that never touch the network.
    pub fn blocking(&self) -> &CmcClient {
        &self.inner
    }
}
