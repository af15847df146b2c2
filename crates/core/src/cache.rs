//! Key-value cache collaborator for short-TTL forecast memoization.
//!
//! The trait is the seam; production deployments can bind a networked cache
//! behind it, the default binding is in-process.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[async_trait::async_trait]
pub trait KvCache: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> anyhow::Result<()>;
}

/// In-process TTL cache shared across callers. Expiry is wall-clock from the
/// moment of the `set`; expired entries are dropped on the next `get`.
#[derive(Debug, Default)]
pub struct MemoryTtlCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryTtlCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KvCache for MemoryTtlCache {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((_, expires_at)) if *expires_at <= Instant::now() => {
                entries.remove(key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), (value, Instant::now() + ttl));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let cache = MemoryTtlCache::new();
        cache
            .set("forecast:90", "[1,2,3]".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            cache.get("forecast:90").await.unwrap(),
            Some("[1,2,3]".to_string())
        );
    }

    #[tokio::test]
    async fn expired_entry_reads_as_miss() {
        let cache = MemoryTtlCache::new();
        cache
            .set("forecast:90", "[]".to_string(), Duration::from_secs(0))
            .await
            .unwrap();
        assert_eq!(cache.get("forecast:90").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_key_is_a_miss() {
        let cache = MemoryTtlCache::new();
        assert_eq!(cache.get("forecast:30").await.unwrap(), None);
    }
}
