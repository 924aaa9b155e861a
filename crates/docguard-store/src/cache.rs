//! In-process TTL cache for folder/stack document counts.
//!
//! Item counts are read-heavy aggregates (every folder listing recomputes
//! them), so a small write-through cache with a fixed TTL sits in front of
//! them. Keys are namespace-prefixed; any write to the underlying entity
//! type invalidates every key sharing that namespace prefix, so a stale
//! count can outlive a write by at most one read.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use docguard_core::defaults::COUNT_CACHE_TTL_SECS;

/// Key namespace for folder counts.
pub const NS_FOLDER: &str = "dg:counts:folder:";

/// Key namespace for stack counts.
pub const NS_STACK: &str = "dg:counts:stack:";

struct CacheEntry {
    value: i64,
    stored_at: Instant,
}

struct CountCacheInner {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    enabled: bool,
}

/// TTL count cache with prefix invalidation.
#[derive(Clone)]
pub struct CountCache {
    inner: Arc<CountCacheInner>,
}

impl CountCache {
    /// Create a cache with the default TTL.
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(COUNT_CACHE_TTL_SECS))
    }

    /// Create a cache with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(CountCacheInner {
                entries: RwLock::new(HashMap::new()),
                ttl,
                enabled: true,
            }),
        }
    }

    /// Create a disabled cache (every get misses, sets are dropped).
    pub fn disabled() -> Self {
        Self {
            inner: Arc::new(CountCacheInner {
                entries: RwLock::new(HashMap::new()),
                ttl: Duration::from_secs(COUNT_CACHE_TTL_SECS),
                enabled: false,
            }),
        }
    }

    /// Build a cache key for a folder count.
    pub fn folder_key(user_id: uuid::Uuid, folder_id: uuid::Uuid) -> String {
        format!("{}{}:{}", NS_FOLDER, user_id, folder_id)
    }

    /// Build a cache key for a stack count.
    pub fn stack_key(user_id: uuid::Uuid, stack_id: uuid::Uuid) -> String {
        format!("{}{}:{}", NS_STACK, user_id, stack_id)
    }

    /// Get a cached count if present and fresh.
    pub async fn get(&self, key: &str) -> Option<i64> {
        if !self.inner.enabled {
            return None;
        }
        let entries = self.inner.entries.read().await;
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() > self.inner.ttl {
            debug!(key, "count cache entry expired");
            return None;
        }
        Some(entry.value)
    }

    /// Store a count.
    pub async fn set(&self, key: &str, value: i64) {
        if !self.inner.enabled {
            return;
        }
        self.inner.entries.write().await.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Remove every entry whose key starts with `prefix`. Returns the number
    /// of entries removed.
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.inner.entries.write().await;
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(prefix));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(prefix, removed, "count cache invalidated");
        }
        removed
    }

    /// Cache TTL setting.
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }
}

impl Default for CountCache {
    fn default() -> Self {
        Self::new()
    }
}
