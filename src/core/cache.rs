use crate::domain::model::QueryKey;
use crate::utils::error::Result;
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    fetched_at: DateTime<Utc>,
}

/// Response cache keyed by [`QueryKey`].
///
/// Reads go through [`QueryCache::fetch`] / [`QueryCache::query`]; mutations
/// call [`QueryCache::invalidate`] with a key prefix once they succeed.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, CacheEntry>>,
    stale_after: Option<TimeDelta>,
    // Bumped under the write lock by every invalidation.
    generation: AtomicU64,
}

impl QueryCache {
    pub fn new(stale_after: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            // Durations chrono cannot represent never go stale.
            stale_after: stale_after.and_then(|d| TimeDelta::from_std(d).ok()),
            generation: AtomicU64::new(0),
        }
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        match self.stale_after {
            Some(stale_after) => Utc::now() - entry.fetched_at < stale_after,
            None => true,
        }
    }

    /// Returns the cached value for `key` if present and not stale.
    pub async fn get(&self, key: &QueryKey) -> Option<Value> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| entry.value.clone())
    }

    pub async fn fetched_at(&self, key: &QueryKey) -> Option<DateTime<Utc>> {
        let entries = self.entries.read().await;
        entries.get(key).map(|entry| entry.fetched_at)
    }

    pub async fn set(&self, key: QueryKey, value: Value) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: Utc::now(),
            },
        );
    }

    /// Serves `key` from cache, or runs `fetch` and stores its result.
    ///
    /// A failed fetch is returned unchanged and leaves the cache untouched.
    /// A value fetched across an invalidation is returned but not stored.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, fetch: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!("Cache hit for {}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for {}", key);
        let generation = self.generation.load(Ordering::SeqCst);
        let value = fetch().await?;

        let mut entries = self.entries.write().await;
        if self.generation.load(Ordering::SeqCst) == generation {
            entries.insert(
                key,
                CacheEntry {
                    value: value.clone(),
                    fetched_at: Utc::now(),
                },
            );
        } else {
            tracing::debug!("Discarding {} fetched across an invalidation", key);
        }
        Ok(value)
    }

    /// Like [`QueryCache::fetch`], gated on `enabled`. A disabled query
    /// issues no request and resolves to `None`.
    pub async fn query<F, Fut>(&self, key: QueryKey, enabled: bool, fetch: F) -> Result<Option<Value>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        if !enabled {
            tracing::debug!("Query {} disabled", key);
            return Ok(None);
        }
        self.fetch(key, fetch).await.map(Some)
    }

    /// Drops every entry whose key starts with `prefix`. Returns how many went.
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!("Invalidated {} cached queries under {}", removed, prefix);
        }
        removed
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        entries.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
