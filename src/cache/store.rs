//! Bounded LRU store for one cache category

use lru::LruCache;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use super::key::KeyPart;

/// A value slot, shared with callers still computing it
pub(crate) type Slot = Arc<OnceCell<Arc<dyn Any + Send + Sync>>>;

/// Identity of one entry: the registering function plus its arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct EntryKey {
    pub function: u64,
    pub args: KeyPart,
}

/// Entries of one category with per-function occupancy.
///
/// Capacity 0 keeps no entries at all.
pub(crate) struct CategoryStore {
    capacity: usize,
    entries: Option<LruCache<EntryKey, Slot>>,
    live: HashMap<u64, usize>,
}

impl CategoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
            live: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    /// Number of live entries owned by `function`
    pub fn len_for(&self, function: u64) -> usize {
        self.live.get(&function).copied().unwrap_or(0)
    }

    /// Find a slot and mark it most recently used
    pub fn get(&mut self, key: &EntryKey) -> Option<Slot> {
        self.entries.as_mut()?.get(key).cloned()
    }

    /// Store a fresh slot, evicting as needed.
    ///
    /// `function_capacity` bounds the entries of a single function inside the
    /// category. Returns false when nothing was stored.
    pub fn insert(&mut self, key: EntryKey, slot: Slot, function_capacity: Option<usize>) -> bool {
        let function = key.function;
        let Some(entries) = self.entries.as_mut() else {
            return false;
        };

        if let Some(limit) = function_capacity {
            if limit == 0 {
                return false;
            }
            if self.live.get(&function).copied().unwrap_or(0) >= limit {
                let oldest = entries
                    .iter()
                    .rev()
                    .find(|(k, _)| k.function == function)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    entries.pop(&oldest);
                    decrement(&mut self.live, function);
                }
            }
        }

        if let Some((evicted, _)) = entries.push(key, slot) {
            decrement(&mut self.live, evicted.function);
        }
        *self.live.entry(function).or_insert(0) += 1;
        true
    }

    /// Remove `key` only if it still holds `slot`
    pub fn discard(&mut self, key: &EntryKey, slot: &Slot) {
        let Some(entries) = self.entries.as_mut() else {
            return;
        };
        let same = entries
            .peek(key)
            .map_or(false, |current| Arc::ptr_eq(current, slot));
        if same {
            entries.pop(key);
            decrement(&mut self.live, key.function);
        }
    }

    /// Drop every entry of one function
    pub fn purge(&mut self, function: u64) {
        let Some(entries) = self.entries.as_mut() else {
            return;
        };
        let keys: Vec<EntryKey> = entries
            .iter()
            .filter(|(k, _)| k.function == function)
            .map(|(k, _)| k.clone())
            .collect();
        for key in keys {
            entries.pop(&key);
        }
        self.live.remove(&function);
    }

    pub fn clear(&mut self) {
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
        self.live.clear();
    }
}

fn decrement(live: &mut HashMap<u64, usize>, function: u64) {
    if let Some(count) = live.get_mut(&function) {
        *count = count.saturating_sub(1);
        if *count == 0 {
            live.remove(&function);
        }
    }
}
