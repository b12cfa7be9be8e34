use super::prefix_range;
use crate::ports::{KvPairs, KvStore};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Write-back overlay over a parent `KvStore`.
///
/// Pending writes and deletes (`None`) shadow the parent until `write()`
/// flushes them in key order.
pub struct CacheKvStore {
    parent: Arc<dyn KvStore>,
    cache: RwLock<BTreeMap<Vec<u8>, Option<Vec<u8>>>>,
}

impl CacheKvStore {
    /// Overlay `parent`.
    pub fn new(parent: Arc<dyn KvStore>) -> Self {
        Self {
            parent,
            cache: RwLock::new(BTreeMap::new()),
        }
    }

    /// Flush pending changes into the parent and clear the overlay.
    pub fn write(&self) {
        let pending = std::mem::take(&mut *self.cache.write());
        for (key, value) in pending {
            match value {
                Some(v) => self.parent.set(&key, v),
                None => self.parent.delete(&key),
            }
        }
    }

    /// Number of pending changes.
    pub fn pending(&self) -> usize {
        self.cache.read().len()
    }
}

impl KvStore for CacheKvStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        if let Some(entry) = self.cache.read().get(key) {
            return entry.clone();
        }
        self.parent.get(key)
    }

    fn set(&self, key: &[u8], value: Vec<u8>) {
        self.cache.write().insert(key.to_vec(), Some(value));
    }

    fn delete(&self, key: &[u8]) {
        self.cache.write().insert(key.to_vec(), None);
    }

    fn iterate_prefix(&self, prefix: &[u8]) -> KvPairs {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.iterate_prefix(prefix).into_iter().collect();
        let cache = self.cache.read();
        for (key, value) in prefix_range(&*cache, prefix) {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        merged.into_iter().collect()
    }
}
