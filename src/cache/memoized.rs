//! Cache-aside wrappers around deterministic functions

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use super::manager::{CacheManager, Registration};
use super::store::EntryKey;
use super::{CacheError, CacheKey, Category, FunctionStats};

/// Handle to one memoized function.
///
/// Obtained from [`CacheManager::memoize`]. Dropping the handle releases the
/// entries it owns. The computation passed to each call must be referentially
/// transparent for the given arguments: only the arguments key the entry.
pub struct Memoized<K: ?Sized, V> {
    pub(super) manager: CacheManager,
    pub(super) registration: Arc<Registration>,
    pub(super) _marker: PhantomData<fn(&K) -> V>,
}

impl<K, V> Memoized<K, V>
where
    K: CacheKey + ?Sized,
    V: Clone + Send + Sync + 'static,
{
    pub fn name(&self) -> &str {
        &self.registration.name
    }

    pub fn category(&self) -> Category {
        self.registration.category
    }

    pub fn stats(&self) -> FunctionStats {
        self.manager.function_stats(&self.registration)
    }

    /// Return the cached result for `args`, computing it on a miss
    pub fn get_or_compute<F>(&self, args: &K, compute: F) -> Result<V, CacheError>
    where
        F: FnOnce(&K) -> V,
    {
        self.try_get_or_compute(args, |args| Ok::<V, CacheError>(compute(args)))
    }

    /// Fallible variant of [`get_or_compute`](Self::get_or_compute).
    ///
    /// Errors are returned to the caller and never stored. Concurrent misses
    /// for the same arguments share one computation.
    pub fn try_get_or_compute<F, E>(&self, args: &K, compute: F) -> Result<V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
        E: From<CacheError>,
    {
        if !self.manager.is_enabled() {
            return compute(args);
        }

        let key = EntryKey {
            function: self.registration.id,
            args: args.cache_key().map_err(|err| CacheError::UnsupportedKey {
                function: self.registration.name.clone(),
                reason: err.to_string(),
            })?,
        };

        let (slot, stored) = self.manager.checkout(&self.registration, &key);
        let value = slot.get_or_try_init(|| {
            compute(args).map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>)
        });

        match value {
            Ok(value) => {
                let any: &(dyn Any + Send + Sync) = &**value;
                any.downcast_ref::<V>().cloned().ok_or_else(|| {
                    CacheError::TypeMismatch {
                        function: self.registration.name.clone(),
                    }
                    .into()
                })
            }
            Err(err) => {
                if stored {
                    self.manager.discard(self.registration.category, &key, &slot);
                }
                Err(err)
            }
        }
    }

    /// Bind a function so the result can be called like the original
    pub fn wrap<F>(self, function: F) -> MemoizedFn<K, V, F>
    where
        F: Fn(&K) -> V,
    {
        MemoizedFn {
            memo: self,
            function,
        }
    }
}

impl<K: ?Sized, V> Drop for Memoized<K, V> {
    fn drop(&mut self) {
        self.manager.purge(&self.registration);
    }
}

/// A function bundled with its cache handle
pub struct MemoizedFn<K: ?Sized, V, F> {
    memo: Memoized<K, V>,
    function: F,
}

impl<K, V, F> MemoizedFn<K, V, F>
where
    K: CacheKey + ?Sized,
    V: Clone + Send + Sync + 'static,
    F: Fn(&K) -> V,
{
    pub fn call(&self, args: &K) -> Result<V, CacheError> {
        self.memo.get_or_compute(args, &self.function)
    }

    pub fn memo(&self) -> &Memoized<K, V> {
        &self.memo
    }
}
