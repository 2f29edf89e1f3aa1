// Response Cache - per-resource TTL slots
//
// Concurrent callers that find a slot expired share a single backend fetch.
// The entry itself is only locked for short reads and writes, so `clear`
// never waits on an in-flight fetch. Clearing starts a new generation: a
// fetch begun before the clear is returned to its caller but not stored.

use crate::domain::{CategoryView, ProductView, PublicCategoryView};
use crate::error::Result;
use crate::port::TimeProvider;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Logical cache keys and their fixed TTLs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Categories,
    PublicCategories,
    Ribbons,
}

impl CacheKey {
    pub fn name(&self) -> &'static str {
        match self {
            CacheKey::Products => "products",
            CacheKey::Categories => "categories",
            CacheKey::PublicCategories => "public_categories",
            CacheKey::Ribbons => "ribbons",
        }
    }

    pub fn ttl_millis(&self) -> i64 {
        match self {
            CacheKey::Products => 5 * 60 * 1000,
            CacheKey::Categories | CacheKey::PublicCategories => 30 * 60 * 1000,
            CacheKey::Ribbons => 60 * 60 * 1000,
        }
    }
}

struct CacheEntry<T> {
    data: Option<Arc<T>>,
    timestamp: i64,
    generation: u64,
    /// Serializes fetches within one generation
    fetch_lock: Arc<Mutex<()>>,
}

/// Single cached payload with a fixed TTL
pub struct TtlCache<T> {
    key: CacheKey,
    ttl_millis: i64,
    time_provider: Arc<dyn TimeProvider>,
    entry: Mutex<CacheEntry<T>>,
}

impl<T> TtlCache<T> {
    pub fn new(key: CacheKey, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            key,
            ttl_millis: key.ttl_millis(),
            time_provider,
            entry: Mutex::new(CacheEntry {
                data: None,
                timestamp: 0,
                generation: 0,
                fetch_lock: Arc::new(Mutex::new(())),
            }),
        }
    }

    /// Return the cached payload while fresh, otherwise run `fetch` and store its result
    ///
    /// A failed fetch leaves the slot unchanged.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let (generation, fetch_lock) = {
            let entry = self.entry.lock().await;
            if let Some(data) = self.fresh(&entry) {
                debug!(cache = self.key.name(), "Cache hit");
                return Ok(data);
            }
            (entry.generation, Arc::clone(&entry.fetch_lock))
        };

        let _fetching = fetch_lock.lock().await;

        // Another caller may have filled the slot while we waited
        let now = {
            let entry = self.entry.lock().await;
            if entry.generation == generation {
                if let Some(data) = self.fresh(&entry) {
                    debug!(cache = self.key.name(), "Cache filled while waiting");
                    return Ok(data);
                }
            }
            self.time_provider.now_millis()
        };

        debug!(cache = self.key.name(), "Cache miss, fetching");
        let data = Arc::new(fetch().await?);

        let mut entry = self.entry.lock().await;
        if entry.generation == generation {
            entry.data = Some(Arc::clone(&data));
            entry.timestamp = now;
        } else {
            debug!(cache = self.key.name(), "Slot cleared during fetch, result not stored");
        }

        Ok(data)
    }

    /// Drop the payload and reset the timestamp to zero
    ///
    /// Returns without waiting for an in-flight fetch.
    pub async fn clear(&self) {
        let mut entry = self.entry.lock().await;
        entry.data = None;
        entry.timestamp = 0;
        entry.generation += 1;
        entry.fetch_lock = Arc::new(Mutex::new(()));
    }

    /// Timestamp of the last stored fetch (0 when empty)
    pub async fn timestamp(&self) -> i64 {
        self.entry.lock().await.timestamp
    }

    pub fn key(&self) -> CacheKey {
        self.key
    }

    fn fresh(&self, entry: &CacheEntry<T>) -> Option<Arc<T>> {
        let data = entry.data.as_ref()?;
        let age = self.time_provider.now_millis() - entry.timestamp;
        (age < self.ttl_millis).then(|| Arc::clone(data))
    }
}

/// All cached resources of the proxy
pub struct CacheStore {
    pub products: TtlCache<Vec<ProductView>>,
    pub categories: TtlCache<Vec<CategoryView>>,
    pub public_categories: TtlCache<Vec<PublicCategoryView>>,
    pub ribbons: TtlCache<Vec<Value>>,
}

impl CacheStore {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            products: TtlCache::new(CacheKey::Products, time_provider.clone()),
            categories: TtlCache::new(CacheKey::Categories, time_provider.clone()),
            public_categories: TtlCache::new(CacheKey::PublicCategories, time_provider.clone()),
            ribbons: TtlCache::new(CacheKey::Ribbons, time_provider),
        }
    }

    /// Reset every slot
    pub async fn clear_all(&self) {
        self.products.clear().await;
        self.categories.clear().await;
        self.public_categories.clear().await;
        self.ribbons.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::port::time_provider::mocks::ManualClock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::oneshot;
    use tokio::time::timeout;

    fn counting_fetch(
        counter: &AtomicUsize,
        value: u32,
    ) -> impl FnOnce() -> std::future::Ready<Result<u32>> + '_ {
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(value))
        }
    }

    #[tokio::test]
    async fn test_hit_within_ttl_skips_fetch() {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let cache: TtlCache<u32> = TtlCache::new(CacheKey::Products, clock.clone());
        let fetches = AtomicUsize::new(0);

        let first = cache.get_or_fetch(counting_fetch(&fetches, 1)).await.unwrap();
        clock.advance(CacheKey::Products.ttl_millis() - 1);
        let second = cache.get_or_fetch(counting_fetch(&fetches, 2)).await.unwrap();

        assert_eq!(*first, 1);
        assert_eq!(*second, 1);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expiry_refetches_once_and_updates_timestamp() {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let cache: TtlCache<u32> = TtlCache::new(CacheKey::Categories, clock.clone());
        let fetches = AtomicUsize::new(0);

        cache.get_or_fetch(counting_fetch(&fetches, 1)).await.unwrap();
        assert_eq!(cache.timestamp().await, 1_000_000);

        clock.advance(CacheKey::Categories.ttl_millis());
        let refreshed = cache.get_or_fetch(counting_fetch(&fetches, 2)).await.unwrap();

        assert_eq!(*refreshed, 2);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(
            cache.timestamp().await,
            1_000_000 + CacheKey::Categories.ttl_millis()
        );
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let clock = Arc::new(ManualClock::new(5_000));
        let cache: TtlCache<u32> = TtlCache::new(CacheKey::Ribbons, clock);
        let fetches = AtomicUsize::new(0);

        cache.get_or_fetch(counting_fetch(&fetches, 1)).await.unwrap();
        cache.clear().await;
        assert_eq!(cache.timestamp().await, 0);

        let value = cache.get_or_fetch(counting_fetch(&fetches, 9)).await.unwrap();
        assert_eq!(*value, 9);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_slot_empty() {
        let clock = Arc::new(ManualClock::new(5_000));
        let cache: TtlCache<u32> = TtlCache::new(CacheKey::Products, clock);

        let result = cache
            .get_or_fetch(|| async { Err(AppError::Backend("down".into())) })
            .await;
        assert!(result.is_err());
        assert_eq!(cache.timestamp().await, 0);

        let value = cache.get_or_fetch(|| async { Ok(3) }).await.unwrap();
        assert_eq!(*value, 3);
    }

    #[tokio::test]
    async fn test_concurrent_expiry_fetches_once() {
        let clock = Arc::new(ManualClock::new(5_000));
        let cache = Arc::new(TtlCache::<u32>::new(CacheKey::Products, clock));
        let fetches = Arc::new(AtomicUsize::new(0));

        let mut handles = vec![];
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let fetches = Arc::clone(&fetches);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch(|| async move {
                        fetches.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        Ok(7)
                    })
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(*handle.await.unwrap(), 7);
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_store_clear_all_resets_every_slot() {
        let clock = Arc::new(ManualClock::new(42_000));
        let store = CacheStore::new(clock);

        store.products.get_or_fetch(|| async { Ok(vec![]) }).await.unwrap();
        store.ribbons.get_or_fetch(|| async { Ok(vec![]) }).await.unwrap();
        store.clear_all().await;

        assert_eq!(store.products.timestamp().await, 0);
        assert_eq!(store.categories.timestamp().await, 0);
        assert_eq!(store.public_categories.timestamp().await, 0);
        assert_eq!(store.ribbons.timestamp().await, 0);
    }

    #[tokio::test]
    async fn test_clear_all_does_not_wait_for_pending_fetch() {
        let clock = Arc::new(ManualClock::new(42_000));
        let store = Arc::new(CacheStore::new(clock));
        let (started_tx, started_rx) = oneshot::channel();

        let hung = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .categories
                    .get_or_fetch(|| async move {
                        let _ = started_tx.send(());
                        std::future::pending::<Result<Vec<CategoryView>>>().await
                    })
                    .await
            })
        };
        started_rx.await.unwrap();

        timeout(Duration::from_secs(2), store.clear_all())
            .await
            .expect("clear_all blocked behind an in-flight fetch");

        // A caller arriving after the clear starts its own fetch
        let fresh = timeout(
            Duration::from_secs(2),
            store.categories.get_or_fetch(|| async { Ok(vec![]) }),
        )
        .await
        .expect("new caller blocked behind an in-flight fetch")
        .unwrap();
        assert!(fresh.is_empty());
        assert_eq!(store.categories.timestamp().await, 42_000);

        hung.abort();
    }

    #[tokio::test]
    async fn test_fetch_started_before_clear_is_not_stored() {
        let clock = Arc::new(ManualClock::new(10_000));
        let cache = Arc::new(TtlCache::<u32>::new(CacheKey::Ribbons, clock));
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel::<u32>();

        let stale = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .get_or_fetch(|| async move {
                        let _ = started_tx.send(());
                        Ok(release_rx.await.unwrap_or_default())
                    })
                    .await
            })
        };
        started_rx.await.unwrap();

        cache.clear().await;
        release_tx.send(1).unwrap();

        // The original caller still gets its answer
        assert_eq!(*stale.await.unwrap().unwrap(), 1);
        assert_eq!(cache.timestamp().await, 0);

        let fetches = AtomicUsize::new(0);
        let value = cache.get_or_fetch(counting_fetch(&fetches, 2)).await.unwrap();
        assert_eq!(*value, 2);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }
}
