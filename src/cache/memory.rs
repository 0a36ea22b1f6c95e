//! In-memory cache implementation using moka
//!
//! Values are stored as JSON strings so any serializable type can share one
//! cache. Entries expire after the configured TTL.

use anyhow::{Context, Result};
use moka::future::Cache;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_MAX_CAPACITY: u64 = 10_000;
const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Clone)]
struct CacheEntry {
    data: Arc<String>,
}

impl CacheEntry {
    fn new<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let json = serde_json::to_string(value).context("Failed to serialize cache value")?;
        Ok(Self {
            data: Arc::new(json),
        })
    }

    fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.data).context("Failed to deserialize cache value")
    }
}

/// In-memory cache using moka
pub struct MemoryCache {
    cache: Cache<String, CacheEntry>,
    default_ttl: Duration,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entry_count", &self.cache.entry_count())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl MemoryCache {
    /// Cache with 10,000 entries and a one hour TTL
    pub fn new() -> Self {
        Self::with_capacity_and_ttl(DEFAULT_MAX_CAPACITY, DEFAULT_TTL)
    }

    pub fn with_capacity_and_ttl(max_capacity: u64, default_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(default_ttl)
            .support_invalidation_closures()
            .build();

        Self { cache, default_ttl }
    }

    /// Get a value; `Ok(None)` when missing or expired
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.cache.get(key).await {
            Some(entry) => Ok(Some(entry.deserialize()?)),
            None => Ok(None),
        }
    }

    /// Store a value, replacing any previous entry under `key`
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let entry = CacheEntry::new(value)?;
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    /// Return the cached value, or run `load` and cache its result.
    ///
    /// Cache read and write failures are logged and fall through to `load`.
    pub async fn get_or_load<T, F, Fut>(&self, key: &str, load: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.get::<T>(key).await {
            Ok(Some(hit)) => return Ok(hit),
            Ok(None) => {}
            Err(e) => tracing::warn!("Discarding unreadable cache entry {}: {}", key, e),
        }

        let value = load().await?;
        if let Err(e) = self.set(key, &value).await {
            tracing::warn!("Failed to cache {}: {}", key, e);
        }
        Ok(value)
    }

    pub async fn delete(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    /// Drop every entry whose key starts with `prefix`
    pub async fn delete_prefix(&self, prefix: &str) {
        let prefix = prefix.to_string();
        // Only fails when invalidation closures are disabled on the builder.
        if let Err(e) = self
            .cache
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix))
        {
            tracing::warn!("Failed to invalidate cache prefix: {}", e);
        }
        self.cache.run_pending_tasks().await;
    }

    pub async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache.set("key1", &vec![1, 2, 3]).await.unwrap();

        let result: Option<Vec<i32>> = cache.get("key1").await.unwrap();
        assert_eq!(result, Some(vec![1, 2, 3]));

        let missing: Option<String> = cache.get("nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_prefix_only_touches_matching_keys() {
        let cache = MemoryCache::new();
        cache.set("blog:published", &1).await.unwrap();
        cache.set("blog:post:hello", &2).await.unwrap();
        cache.set("settings", &3).await.unwrap();

        cache.delete_prefix("blog:").await;

        assert!(cache.get::<i32>("blog:published").await.unwrap().is_none());
        assert!(cache.get::<i32>("blog:post:hello").await.unwrap().is_none());
        assert_eq!(cache.get::<i32>("settings").await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let cache = MemoryCache::new();
        cache.set("a", &"x").await.unwrap();
        cache.set("b", &"y").await.unwrap();

        cache.delete("a").await;
        assert!(cache.get::<String>("a").await.unwrap().is_none());

        cache.clear().await;
        assert!(cache.get::<String>("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_or_load_runs_loader_once() {
        let cache = MemoryCache::new();
        let first: Vec<String> = cache
            .get_or_load("sheds:active", || async { Ok(vec!["a".to_string()]) })
            .await
            .unwrap();
        let second: Vec<String> = cache
            .get_or_load("sheds:active", || async { Err(anyhow::anyhow!("loader must not run")) })
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_get_or_load_does_not_cache_errors() {
        let cache = MemoryCache::new();
        let failed: Result<i32> = cache
            .get_or_load("k", || async { Err(anyhow::anyhow!("db down")) })
            .await;
        assert!(failed.is_err());
        assert!(cache.get::<i32>("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_type_mismatch_is_an_error() {
        let cache = MemoryCache::new();
        cache.set("n", &"text").await.unwrap();
        assert!(cache.get::<i64>("n").await.is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(20))]

            /// Entries disappear once the TTL has passed
            #[test]
            fn property_entries_expire_after_ttl(
                key in "[a-z]{1,10}",
                value in "[a-z]{1,100}"
            ) {
                let rt = tokio::runtime::Runtime::new().unwrap();
                rt.block_on(async {
                    let cache = MemoryCache::with_capacity_and_ttl(1000, Duration::from_millis(10));
                    cache.set(&key, &value).await.unwrap();

                    let result: Option<String> = cache.get(&key).await.unwrap();
                    prop_assert_eq!(result, Some(value.clone()));

                    tokio::time::sleep(Duration::from_millis(50)).await;
                    cache.cache.run_pending_tasks().await;

                    let expired: Option<String> = cache.get(&key).await.unwrap();
                    prop_assert_eq!(expired, None);
                    Ok(())
                })?;
            }
        }
    }
}
