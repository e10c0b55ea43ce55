//! Fetch-or-serve-from-cache orchestration
//!
//! `Cache` is the single entry point for resolving an external JSON resource:
//! it guards against circular reference chains, sweeps expired and malformed
//! records out of the persistent store, serves cache hits, and performs the
//! network fetch on a miss.

use crate::store::{CacheRecord, Store};
use crate::transport::{Transport, TransportError};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Maximum number of fetches of one URL per process run
///
/// Resolving external references recursively can loop back to an earlier URL
/// through any number of intermediate documents. A per-URL visit ceiling
/// bounds the amplification without needing full cycle detection over the
/// reference graph.
const CALL_LIMIT: u32 = 10;

/// Errors that can occur when fetching through the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// The same URL was requested more times than the call limit allows
    #[error("called {url} more than {limit} times, possible circular reference")]
    CircularReference {
        /// The URL whose call count exceeded the limit
        url: String,
        /// The fixed per-URL call limit
        limit: u32,
    },

    /// The network fetch failed, with the upstream response body if one was received
    #[error("failed fetching {url}{}", detail(.body))]
    FetchFailed {
        /// The URL that could not be fetched
        url: String,
        /// The response body text, when the failure carried a response
        body: Option<String>,
    },

    /// The fetched body was received but is not valid JSON
    #[error(transparent)]
    Parse(#[from] serde_json::Error),

    /// Writing the fetched result to the persistent store failed
    #[error("failed writing cache: {0}")]
    Store(#[from] std::io::Error),
}

fn detail(body: &Option<String>) -> String {
    match body {
        Some(text) => format!("\n{text}"),
        None => String::new(),
    }
}

/// Disk-backed cache for idempotent fetches of external JSON resources
///
/// Each distinct URL is fetched at most once per run while its cached record
/// is fresh. Records older than `ttl` milliseconds are evicted before every
/// lookup, as are records missing their timestamp or body. A ttl of 0
/// disables persistence of new results entirely.
///
/// The in-memory call counter is owned by the cache instance and lives for
/// its lifetime; it is never persisted and only resets with the process.
pub struct Cache<S, T> {
    store: S,
    transport: T,
    /// Freshness window in milliseconds; 0 disables write-through
    ttl: u64,
    /// Per-URL fetch counts for the current process lifetime
    call_counter: HashMap<String, u32>,
}

impl<S: Store, T: Transport> Cache<S, T> {
    /// Creates a cache over an already-loaded store and a transport
    ///
    /// `ttl` is the freshness window in milliseconds. A record is stale once
    /// `now > timestamp + ttl`. A ttl of 0 means successful fetches are not
    /// persisted at all.
    pub fn new(store: S, transport: T, ttl: u64) -> Self {
        Self {
            store,
            transport,
            ttl,
            call_counter: HashMap::new(),
        }
    }

    /// Fetches `url`, serving from cache when a fresh record exists
    ///
    /// On a miss the body is fetched over the transport, parsed as JSON,
    /// stored (unless ttl is 0), and returned. Expired and malformed records
    /// are swept from the entire store before the lookup, so a hit is always
    /// fresh and well-formed.
    ///
    /// # Errors
    /// * `CacheError::CircularReference` once the same URL has been requested
    ///   more than 10 times in this process
    /// * `CacheError::FetchFailed` when the transport fails or the server
    ///   returns a non-success status
    /// * `CacheError::Parse` when the response body is not valid JSON
    /// * `CacheError::Store` when the fetched result cannot be persisted
    pub async fn fetch(&mut self, url: &str) -> Result<Value, CacheError> {
        self.limit_depth(url)?;
        self.expire();

        if let Some(body) = self.store.get(url).and_then(|record| record.body) {
            debug!(url = %url, "cache hit: using cached response");
            return Ok(body);
        }

        debug!(url = %url, "cache miss: calling url");
        let text = self.transport.get(url).await.map_err(|e| match e {
            TransportError::Status { body, .. } => CacheError::FetchFailed {
                url: url.to_string(),
                body: Some(body),
            },
            TransportError::Request(_) => CacheError::FetchFailed {
                url: url.to_string(),
                body: None,
            },
        })?;
        let parsed: Value = serde_json::from_str(&text)?;

        if self.ttl > 0 {
            self.store.set(url, CacheRecord::new(now_ms(), parsed.clone()));
            self.store.save()?;
        }
        Ok(parsed)
    }

    /// Counts a request for `url`, failing once the call limit is exceeded
    fn limit_depth(&mut self, url: &str) -> Result<(), CacheError> {
        let count = self.call_counter.entry(url.to_string()).or_insert(0);
        *count += 1;
        if *count > CALL_LIMIT {
            return Err(CacheError::CircularReference {
                url: url.to_string(),
                limit: CALL_LIMIT,
            });
        }
        Ok(())
    }

    /// Evicts every malformed or stale record from the store
    ///
    /// Candidates are collected from a snapshot first, then deleted, with a
    /// durability flush after each deletion. A flush failure here is logged
    /// and swallowed; the sweep itself never fails.
    fn expire(&mut self) {
        let now = now_ms();
        let mut evict = Vec::new();
        for (url, record) in self.store.entries() {
            if record.is_malformed() {
                debug!(url = %url, "cache error: deleting malformed response");
                evict.push(url);
            } else if record
                .timestamp
                .is_some_and(|timestamp| now > timestamp.saturating_add(self.ttl))
            {
                debug!(url = %url, "cache stale: deleting cached response");
                evict.push(url);
            }
        }
        for url in evict {
            self.store.remove(&url);
            if let Err(e) = self.store.save() {
                warn!(url = %url, error = %e, "failed to flush cache after eviction");
            }
        }
    }
}

/// Current time in epoch milliseconds
fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
