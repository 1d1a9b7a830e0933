//! Process-wide memoization of listings fetches.
//!
//! Results are keyed by the full [`ListingsRequest`] so that changes to view
//! parameters never trigger a new fetch. How long an entry stays valid is an
//! explicit [`CachePolicy`]. Failed fetches are never stored.
//!
//! The cache is shared by everything holding the client: there is no per-user
//! invalidation. Callers that need one must key their own cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::error::FetchError;
use crate::fetcher::ListingsRequest;
use crate::models::ListingTable;

/// How long a fetched listings snapshot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Fetch once per key and reuse until the process exits or the entry is
    /// invalidated explicitly.
    #[default]
    UntilRestart,
    /// Reuse an entry for at most this long.
    Ttl(Duration),
    /// Never reuse; every call fetches.
    Disabled,
}

#[derive(Debug)]
struct CacheEntry {
    table: Arc<ListingTable>,
    fetched_at: Instant,
}

/// Thread-safe, read-mostly store of listings snapshots.
///
/// The entry map is locked only to look up or store a table. A miss takes a
/// per-key lock for the duration of the fetch, so one key is fetched at most
/// once at a time while hits and other keys proceed.
#[derive(Debug)]
pub struct ListingCache {
    policy: CachePolicy,
    entries: Mutex<HashMap<ListingsRequest, CacheEntry>>,
    in_flight: Mutex<HashMap<ListingsRequest, Arc<Mutex<()>>>>,
}

/// A panic inside a fetch closure poisons the key lock; none of the guarded
/// maps is ever left half-written, so the poison is ignored.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl ListingCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        match self.policy {
            CachePolicy::UntilRestart => true,
            CachePolicy::Ttl(ttl) => entry.fetched_at.elapsed() < ttl,
            CachePolicy::Disabled => false,
        }
    }

    /// Return the cached table for `request` if it is still fresh.
    pub fn get(&self, request: &ListingsRequest) -> Option<Arc<ListingTable>> {
        let entries = lock(&self.entries);
        entries
            .get(request)
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| Arc::clone(&entry.table))
    }

    /// Return the cached table for `request`, or run `fetch` and store its
    /// result.
    ///
    /// Concurrent callers asking for the same key wait for the first fetch
    /// instead of issuing their own. If that fetch fails, the next waiter
    /// fetches in turn.
    pub fn get_or_fetch<F>(
        &self,
        request: &ListingsRequest,
        fetch: F,
    ) -> Result<Arc<ListingTable>, FetchError>
    where
        F: FnOnce() -> Result<ListingTable, FetchError>,
    {
        if self.policy == CachePolicy::Disabled {
            tracing::debug!(currency = %request.currency, start = request.start, limit = request.limit, "listings cache disabled");
            return fetch().map(Arc::new);
        }

        if let Some(table) = self.get(request) {
            tracing::debug!(currency = %request.currency, start = request.start, limit = request.limit, "listings cache hit");
            return Ok(table);
        }

        let key_lock = Arc::clone(
            lock(&self.in_flight)
                .entry(request.clone())
                .or_default(),
        );
        let result = {
            let _fetching = lock(&key_lock);
            self.fetch_and_store(request, fetch)
        };
        self.release_in_flight(request, key_lock);
        result
    }

    /// Runs with the key lock held. Rechecks the map first: a caller that
    /// waited on another thread's fetch finds its result there.
    fn fetch_and_store<F>(
        &self,
        request: &ListingsRequest,
        fetch: F,
    ) -> Result<Arc<ListingTable>, FetchError>
    where
        F: FnOnce() -> Result<ListingTable, FetchError>,
    {
        if let Some(table) = self.get(request) {
            tracing::debug!(currency = %request.currency, start = request.start, limit = request.limit, "listings cache hit after wait");
            return Ok(table);
        }

        tracing::debug!(currency = %request.currency, start = request.start, limit = request.limit, "listings cache miss");
        let table = Arc::new(fetch()?);

        let mut entries = lock(&self.entries);
        if let CachePolicy::Ttl(ttl) = self.policy {
            let before = entries.len();
            entries.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
            let pruned = before - entries.len();
            if pruned > 0 {
                tracing::debug!(pruned, "expired listings cache entries dropped");
            }
        }
        entries.insert(
            request.clone(),
            CacheEntry {
                table: Arc::clone(&table),
                fetched_at: Instant::now(),
            },
        );
        Ok(table)
    }

    /// Drop the key lock from the in-flight map once no other caller holds it.
    /// Clones are only taken under the map lock, so the count cannot grow
    /// while it is checked.
    fn release_in_flight(&self, request: &ListingsRequest, key_lock: Arc<Mutex<()>>) {
        let mut in_flight = lock(&self.in_flight);
        let idle = in_flight
            .get(request)
            .is_some_and(|held| Arc::ptr_eq(held, &key_lock) && Arc::strong_count(held) == 2);
        if idle {
            in_flight.remove(request);
        }
    }

    /// Drop the entry for `request`. Returns whether one was present.
    pub fn invalidate(&self, request: &ListingsRequest) -> bool {
        lock(&self.entries).remove(request).is_some()
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }

    /// Number of stored entries. Under [`CachePolicy::Ttl`] this may include
    /// expired entries until the next store prunes them.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}
