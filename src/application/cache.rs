use std::{collections::HashMap, fmt::Debug, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::{
    sync::{Mutex, OwnedMutexGuard},
    time::Instant,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub spreadsheet_id: String,
    pub worksheet: String,
}

impl CacheKey {
    pub fn new(spreadsheet_id: impl Into<String>, worksheet: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
        }
    }
}

#[derive(Debug)]
pub struct CacheEntry<V> {
    value: Arc<V>,
    fetched_at: Instant,
    fetched_at_utc: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn new(value: Arc<V>) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
            fetched_at_utc: Utc::now(),
        }
    }

    pub fn value(&self) -> &Arc<V> {
        &self.value
    }

    pub fn fetched_at_utc(&self) -> DateTime<Utc> {
        self.fetched_at_utc
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Slot holding at most one entry for a key. Holding its guard is what
/// serializes refetches of that key.
pub type CacheSlot<V> = OwnedMutexGuard<Option<CacheEntry<V>>>;

/// Time based cache with one TTL for every key.
///
/// Expiry is only checked on access. An expired entry stays in its slot
/// until the next successful refresh overwrites it, but it is never handed
/// out.
pub struct TtlCache<V> {
    ttl: Duration,
    slots: Mutex<HashMap<CacheKey, Arc<Mutex<Option<CacheEntry<V>>>>>>,
}

impl<V> Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TtlCache {{ ttl: {:?} }}", self.ttl)
    }
}

impl<V> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Locks the slot of `key`, creating it if needed. Other callers for the
    /// same key wait until the returned guard is dropped.
    pub async fn lock_slot(&self, key: &CacheKey) -> CacheSlot<V> {
        let slot = {
            // -- MUTEX --
            let mut slots = self.slots.lock().await;
            Arc::clone(slots.entry(key.clone()).or_default())
            // -- END MUTEX --
        };
        slot.lock_owned().await
    }

    pub async fn get_fresh(&self, key: &CacheKey) -> Option<Arc<V>> {
        let slot = self.lock_slot(key).await;
        match &*slot {
            Some(entry) if entry.is_fresh(self.ttl) => Some(Arc::clone(entry.value())),
            _ => None,
        }
    }

    pub async fn fetched_at(&self, key: &CacheKey) -> Option<DateTime<Utc>> {
        let slot = self.lock_slot(key).await;
        match &*slot {
            Some(entry) if entry.is_fresh(self.ttl) => Some(entry.fetched_at_utc()),
            _ => None,
        }
    }

    pub async fn invalidate(&self, key: &CacheKey) {
        let mut slot = self.lock_slot(key).await;
        slot.take();
    }

    pub async fn clear(&self) {
        let slots: Vec<_> = self.slots.lock().await.values().cloned().collect();
        for slot in slots {
            slot.lock().await.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(3600);

    async fn store(cache: &TtlCache<String>, key: &CacheKey, value: &str) {
        let mut slot = cache.lock_slot(key).await;
        *slot = Some(CacheEntry::new(Arc::new(value.to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_absent_key() {
        let cache: TtlCache<String> = TtlCache::new(TTL);
        assert_eq!(cache.get_fresh(&CacheKey::new("id", "Products")).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_fresh_until_ttl() {
        let cache = TtlCache::new(TTL);
        let key = CacheKey::new("id", "Products");
        store(&cache, &key, "v1").await;

        tokio::time::advance(TTL - Duration::from_secs(1)).await;
        assert_eq!(cache.get_fresh(&key).await.as_deref(), Some(&"v1".to_string()));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get_fresh(&key).await, None);
        assert_eq!(cache.fetched_at(&key).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let cache = TtlCache::new(TTL);
        let products = CacheKey::new("id", "Products");
        let reps = CacheKey::new("id", "Sales Reps");
        let other_sheet = CacheKey::new("other", "Products");
        store(&cache, &products, "products").await;

        assert!(cache.get_fresh(&products).await.is_some());
        assert!(cache.get_fresh(&reps).await.is_none());
        assert!(cache.get_fresh(&other_sheet).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_and_clear() {
        let cache = TtlCache::new(TTL);
        let products = CacheKey::new("id", "Products");
        let reps = CacheKey::new("id", "Sales Reps");
        store(&cache, &products, "products").await;
        store(&cache, &reps, "reps").await;

        cache.invalidate(&products).await;
        assert!(cache.get_fresh(&products).await.is_none());
        assert!(cache.get_fresh(&reps).await.is_some());

        cache.clear().await;
        assert!(cache.get_fresh(&reps).await.is_none());
    }
}
