//! Fixed-capacity in-memory cache with random eviction.
//!
//! Two instances back the scrape pipeline: one maps a target URL to its
//! computed findings, the other maps a script URL to its fetched body.
//! Entries have no TTL; they live until evicted or until the cache is dropped.
//!
//! Inserting a new key at capacity evicts one existing key chosen uniformly at
//! random. Recency plays no part in the choice.

use rand::Rng;
use std::collections::HashMap;
use tokio::sync::RwLock;

struct Slots<V> {
    items: HashMap<String, V>,
    /// Dense key list so a victim can be picked by index and swap-removed.
    keys: Vec<String>,
}

/// Thread-safe key/value store bounded to `capacity` entries.
///
/// Reads take a shared lock, writes an exclusive one.
pub struct FixedSizeCache<V> {
    slots: RwLock<Slots<V>>,
    capacity: usize,
}

impl<V: Clone> FixedSizeCache<V> {
    /// Create an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 is treated as 1 so that a fresh `set` is always readable.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: RwLock::new(Slots { items: HashMap::with_capacity(capacity), keys: Vec::with_capacity(capacity) }),
            capacity,
        }
    }

    /// Insert or overwrite `key`.
    ///
    /// Overwriting never evicts. A new key at capacity evicts exactly one
    /// random existing entry first.
    pub async fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut slots = self.slots.write().await;

        if let Some(existing) = slots.items.get_mut(&key) {
            *existing = value;
            return;
        }

        if slots.keys.len() >= self.capacity {
            let victim_idx = rand::thread_rng().gen_range(0..slots.keys.len());
            let victim = slots.keys.swap_remove(victim_idx);
            slots.items.remove(&victim);
            tracing::debug!(evicted = %victim, "cache at capacity, evicted random entry");
        }

        slots.keys.push(key.clone());
        slots.items.insert(key, value);
    }

    /// Look up `key`, returning a clone of the stored value.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.slots.read().await.items.get(key).cloned()
    }

    /// Whether `key` is currently stored.
    pub async fn contains(&self, key: &str) -> bool {
        self.slots.read().await.items.contains_key(key)
    }

    /// Number of occupied slots.
    pub async fn len(&self) -> usize {
        self.slots.read().await.keys.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_new_cache_is_empty() {
        let cache: FixedSizeCache<String> = FixedSizeCache::new(5);
        assert_eq!(cache.capacity(), 5);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = FixedSizeCache::new(3);
        cache.set("key1", "value1".to_string()).await;
        cache.set("key2", "value2".to_string()).await;
        cache.set("key3", "value3".to_string()).await;

        assert_eq!(cache.get("key2").await.as_deref(), Some("value2"));
        assert!(cache.get("nonexistent").await.is_none());
    }

    #[tokio::test]
    async fn test_eviction_removes_exactly_one() {
        let cache = FixedSizeCache::new(3);
        cache.set("key1", 1).await;
        cache.set("key2", 2).await;
        cache.set("key3", 3).await;
        cache.set("key4", 4).await;

        assert_eq!(cache.len().await, 3);

        let mut evicted = 0;
        for key in ["key1", "key2", "key3"] {
            if !cache.contains(key).await {
                evicted += 1;
            }
        }
        assert_eq!(evicted, 1);
        assert_eq!(cache.get("key4").await, Some(4));
    }

    #[tokio::test]
    async fn test_overwrite_does_not_evict() {
        let cache = FixedSizeCache::new(3);
        cache.set("key1", "value1").await;
        cache.set("key2", "value2").await;
        cache.set("key3", "value3").await;
        cache.set("key2", "new_value2").await;

        assert_eq!(cache.get("key2").await, Some("new_value2"));
        assert_eq!(cache.len().await, 3);
        for key in ["key1", "key2", "key3"] {
            assert!(cache.contains(key).await, "{key} should survive an overwrite");
        }
    }

    #[tokio::test]
    async fn test_len_never_exceeds_capacity() {
        let cache = FixedSizeCache::new(4);
        for i in 0..100 {
            cache.set(format!("key{i}"), i).await;
            assert!(cache.len().await <= 4);
        }
        assert_eq!(cache.len().await, 4);
        assert_eq!(cache.get("key99").await, Some(99));
    }

    #[tokio::test]
    async fn test_zero_capacity_holds_one() {
        let cache = FixedSizeCache::new(0);
        cache.set("a", 1).await;
        assert_eq!(cache.get("a").await, Some(1));
        cache.set("b", 2).await;
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("b").await, Some(2));
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let cache = Arc::new(FixedSizeCache::new(10));
        let mut handles = Vec::new();
        for worker in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..50 {
                    cache.set(format!("w{worker}-{i}"), i).await;
                    let _ = cache.get(&format!("w{worker}-{i}")).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(cache.len().await, 10);
    }
}
