//! Cache manager: category stores, global switch, function registry

use log::debug;
use once_cell::sync::OnceCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::key::CacheKey;
use super::memoized::Memoized;
use super::store::{CategoryStore, EntryKey, Slot};
use super::{CacheConfig, Category, FunctionStats};

/// A memoized function known to the manager
#[derive(Debug)]
pub(crate) struct Registration {
    pub id: u64,
    pub name: String,
    pub category: Category,
    pub capacity: Option<usize>,
    pub hits: AtomicU64,
    pub misses: AtomicU64,
}

struct Inner {
    enabled: AtomicBool,
    stores: [Mutex<CategoryStore>; 3],
    registry: Mutex<Vec<Weak<Registration>>>,
    next_id: AtomicU64,
}

/// Shared handle to the categorized result cache.
///
/// Cloning is cheap and every clone refers to the same stores.
#[derive(Clone)]
pub struct CacheManager {
    inner: Arc<Inner>,
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("enabled", &self.is_enabled())
            .field("reference", &self.capacity(Category::Reference))
            .field("calculation", &self.capacity(Category::Calculation))
            .field("ephemeris", &self.capacity(Category::Ephemeris))
            .finish()
    }
}

impl CacheManager {
    /// Create a manager with the three categories sized from `config`
    pub fn new(config: &CacheConfig) -> Self {
        let store = |category: Category| {
            Mutex::new(CategoryStore::new(config.capacity_per_category.get(category)))
        };
        Self {
            inner: Arc::new(Inner {
                enabled: AtomicBool::new(config.enabled),
                stores: [
                    store(Category::Reference),
                    store(Category::Calculation),
                    store(Category::Ephemeris),
                ],
                registry: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    fn store(&self, category: Category) -> MutexGuard<'_, CategoryStore> {
        self.inner.stores[category.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn registrations(&self) -> Vec<Arc<Registration>> {
        let mut registry = self
            .inner
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        registry.retain(|weak| weak.strong_count() > 0);
        registry.iter().filter_map(Weak::upgrade).collect()
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::Acquire)
    }

    pub fn enable_all(&self) {
        self.inner.enabled.store(true, Ordering::Release);
        debug!("Result cache enabled");
    }

    /// Turn memoization off and drop every entry
    pub fn disable_all(&self) {
        self.inner.enabled.store(false, Ordering::Release);
        self.clear(None);
        debug!("Result cache disabled and cleared");
    }

    /// Resize a category. Its entries are cleared even if the size is unchanged.
    pub fn set_capacity(&self, category: Category, capacity: usize) {
        *self.store(category) = CategoryStore::new(capacity);
        debug!("Cache category {} resized to {}", category, capacity);
    }

    pub fn capacity(&self, category: Category) -> usize {
        self.store(category).capacity()
    }

    /// Live entries in a category
    pub fn len(&self, category: Category) -> usize {
        self.store(category).len()
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.len(*c) == 0)
    }

    /// Clear one category, or all of them with `None`
    pub fn clear(&self, category: Option<Category>) {
        match category {
            Some(category) => {
                self.store(category).clear();
                debug!("Cache category {} cleared", category);
            }
            None => {
                for category in Category::ALL {
                    self.store(category).clear();
                }
                debug!("All cache categories cleared");
            }
        }
    }

    /// Drop every entry and reset all counters
    pub fn teardown(&self) {
        self.clear(None);
        for registration in self.registrations() {
            registration.hits.store(0, Ordering::Relaxed);
            registration.misses.store(0, Ordering::Relaxed);
        }
    }

    /// Reconfigure from settings. Categories whose capacity changes are cleared.
    pub fn apply(&self, config: &CacheConfig) {
        for category in Category::ALL {
            let capacity = config.capacity_per_category.get(category);
            if capacity != self.capacity(category) {
                self.set_capacity(category, capacity);
            }
        }
        if config.enabled {
            self.enable_all();
        } else {
            self.disable_all();
        }
    }

    /// Statistics for every live memoized function, optionally of one category
    pub fn stats(&self, category: Option<Category>) -> Vec<FunctionStats> {
        self.registrations()
            .iter()
            .filter(|r| category.map_or(true, |c| r.category == c))
            .map(|r| self.function_stats(r))
            .collect()
    }

    /// Register a memoized function.
    ///
    /// `capacity` bounds the number of entries this function may hold inside
    /// its category.
    pub fn memoize<K, V>(
        &self,
        name: &str,
        category: Category,
        capacity: Option<usize>,
    ) -> Memoized<K, V>
    where
        K: CacheKey + ?Sized,
        V: Clone + Send + Sync + 'static,
    {
        let registration = Arc::new(Registration {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            category,
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        });
        self.inner
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::downgrade(&registration));
        debug!("Registered memoized function '{}' in {}", name, category);
        Memoized {
            manager: self.clone(),
            registration,
            _marker: PhantomData,
        }
    }

    pub(crate) fn function_stats(&self, registration: &Registration) -> FunctionStats {
        let store = self.store(registration.category);
        let category_capacity = store.capacity();
        FunctionStats {
            function: registration.name.clone(),
            category: registration.category,
            hits: registration.hits.load(Ordering::Relaxed),
            misses: registration.misses.load(Ordering::Relaxed),
            size: store.len_for(registration.id),
            capacity: registration
                .capacity
                .map_or(category_capacity, |c| c.min(category_capacity)),
        }
    }

    /// Fetch the slot for `key`, creating and storing an empty one on a miss.
    ///
    /// Returns the slot and whether it lives in the store. The enabled flag is
    /// read again under the store lock so that nothing is stored after a
    /// concurrent `disable_all` has cleared the category.
    pub(crate) fn checkout(&self, registration: &Registration, key: &EntryKey) -> (Slot, bool) {
        let mut store = self.store(registration.category);
        if !self.is_enabled() {
            return (Arc::new(OnceCell::new()), false);
        }
        if let Some(slot) = store.get(key) {
            registration.hits.fetch_add(1, Ordering::Relaxed);
            return (slot, true);
        }
        registration.misses.fetch_add(1, Ordering::Relaxed);
        let slot: Slot = Arc::new(OnceCell::new());
        let stored = store.insert(key.clone(), slot.clone(), registration.capacity);
        (slot, stored)
    }

    pub(crate) fn discard(&self, category: Category, key: &EntryKey, slot: &Slot) {
        self.store(category).discard(key, slot);
    }

    pub(crate) fn purge(&self, registration: &Registration) {
        self.store(registration.category).purge(registration.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CategoryCapacities;

    #[test]
    fn test_set_capacity_clears_category() {
        let cache = CacheManager::default();
        let memo = cache.memoize::<u32, u32>("double", Category::Reference, None);
        memo.get_or_compute(&1, |n| n * 2).unwrap();
        assert_eq!(cache.len(Category::Reference), 1);

        cache.set_capacity(Category::Reference, 512);
        assert_eq!(cache.len(Category::Reference), 0);
        assert_eq!(cache.capacity(Category::Reference), 512);
    }

    #[test]
    fn test_clear_single_category() {
        let cache = CacheManager::default();
        let a = cache.memoize::<u32, u32>("a", Category::Reference, None);
        let b = cache.memoize::<u32, u32>("b", Category::Ephemeris, None);
        a.get_or_compute(&1, |n| *n).unwrap();
        b.get_or_compute(&1, |n| *n).unwrap();

        cache.clear(Some(Category::Reference));
        assert_eq!(cache.len(Category::Reference), 0);
        assert_eq!(cache.len(Category::Ephemeris), 1);

        cache.clear(None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_disable_clears_and_bypasses() {
        let cache = CacheManager::default();
        let memo = cache.memoize::<u32, u32>("id", Category::Calculation, None);
        memo.get_or_compute(&7, |n| *n).unwrap();
        cache.disable_all();
        assert!(!cache.is_enabled());
        assert!(cache.is_empty());

        memo.get_or_compute(&7, |n| *n).unwrap();
        assert!(cache.is_empty());
        let stats = memo.stats();
        assert_eq!((stats.hits, stats.misses), (0, 1));

        cache.enable_all();
        memo.get_or_compute(&7, |n| *n).unwrap();
        assert_eq!(cache.len(Category::Calculation), 1);
    }

    #[test]
    fn test_stats_filter_by_category_and_drop() {
        let cache = CacheManager::default();
        let a = cache.memoize::<u32, u32>("a", Category::Reference, None);
        let b = cache.memoize::<u32, u32>("b", Category::Calculation, Some(4));
        assert_eq!(cache.stats(None).len(), 2);

        let calc = cache.stats(Some(Category::Calculation));
        assert_eq!(calc.len(), 1);
        assert_eq!(calc[0].function, "b");
        assert_eq!(calc[0].capacity, 4);

        drop(a);
        assert_eq!(cache.stats(None).len(), 1);
        drop(b);
        assert!(cache.stats(None).is_empty());
    }

    #[test]
    fn test_checkout_after_disable_stores_nothing() {
        let cache = CacheManager::default();
        let memo = cache.memoize::<u32, u32>("id", Category::Calculation, None);
        let key = EntryKey {
            function: memo.registration.id,
            args: 3u32.cache_key().unwrap(),
        };

        // a call that saw the cache enabled reaches the store after the clear
        cache.disable_all();
        let (slot, stored) = cache.checkout(&memo.registration, &key);
        assert!(!stored);
        assert!(slot.get().is_none());
        assert!(cache.is_empty());
        assert_eq!(memo.stats().misses, 0);

        cache.enable_all();
        let (_, stored) = cache.checkout(&memo.registration, &key);
        assert!(stored);
        assert_eq!(cache.len(Category::Calculation), 1);
    }

    #[test]
    fn test_apply_config() {
        let cache = CacheManager::default();
        let mut capacities = CategoryCapacities::default();
        capacities.set(Category::Ephemeris, 16);
        cache.apply(&CacheConfig {
            enabled: false,
            capacity_per_category: capacities,
        });
        assert!(!cache.is_enabled());
        assert_eq!(cache.capacity(Category::Ephemeris), 16);
        assert_eq!(cache.capacity(Category::Reference), 512);
    }

    #[test]
    fn test_teardown_resets_counters() {
        let cache = CacheManager::default();
        let memo = cache.memoize::<u32, u32>("id", Category::Calculation, None);
        memo.get_or_compute(&1, |n| *n).unwrap();
        memo.get_or_compute(&1, |n| *n).unwrap();
        cache.teardown();
        let stats = memo.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (0, 0, 0));
    }
}
