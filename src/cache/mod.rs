//! In-memory asset caching.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use dashmap::DashMap;

use crate::observability::metrics;

/// One cached asset body.
#[derive(Debug, Clone)]
struct CacheEntry {
    bytes: Bytes,
    stored_at: Instant,
}

/// A thread-safe byte cache with a fixed time-to-live.
///
/// Keys are full request paths including the query string. Values are raw
/// body bytes only; content-type is not retained and callers re-derive it.
/// Expired entries are treated as absent and dropped lazily on read.
#[derive(Clone)]
pub struct AssetCache {
    inner: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl AssetCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Look up an unexpired entry.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        {
            let entry = self.inner.get(key)?;
            if entry.stored_at.elapsed() < self.ttl {
                return Some(entry.bytes.clone());
            }
        }
        // expired entries are dropped on read so the map stays bounded
        self.inner.remove(key);
        metrics::record_cache_size(self.inner.len());
        None
    }

    /// Store an asset body. An existing entry for the key is replaced,
    /// which also resets its expiry.
    pub fn insert(&self, key: impl Into<String>, bytes: Bytes) {
        self.inner.insert(
            key.into(),
            CacheEntry {
                bytes,
                stored_at: Instant::now(),
            },
        );
        metrics::record_cache_size(self.inner.len());
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
