use super::prefix_range;
use crate::ports::{KvPairs, KvStore};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// In-memory implementation of `KvStore`.
#[derive(Debug, Default)]
pub struct MemKvStore {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemKvStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the full contents.
    pub fn snapshot(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.data.read().clone()
    }

    /// Replace the full contents.
    pub fn replace(&self, data: BTreeMap<Vec<u8>, Vec<u8>>) {
        *self.data.write() = data;
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl KvStore for MemKvStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.read().get(key).cloned()
    }

    fn set(&self, key: &[u8], value: Vec<u8>) {
        self.data.write().insert(key.to_vec(), value);
    }

    fn delete(&self, key: &[u8]) {
        self.data.write().remove(key);
    }

    fn iterate_prefix(&self, prefix: &[u8]) -> KvPairs {
        let data = self.data.read();
        prefix_range(&*data, prefix)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
