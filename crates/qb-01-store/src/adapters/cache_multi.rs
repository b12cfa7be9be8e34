use crate::adapters::CacheKvStore;
use crate::domain::StoreKey;
use crate::ports::{KvStore, MultiStore};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Cache snapshot over every sub-store of a parent multi-store.
pub struct CacheMultiStore {
    stores: BTreeMap<StoreKey, Arc<CacheKvStore>>,
}

impl CacheMultiStore {
    /// Open an overlay over each sub-store of `parent`.
    pub fn wrap<M: MultiStore + ?Sized>(parent: &M) -> Self {
        let stores = parent
            .store_keys()
            .into_iter()
            .filter_map(|key| {
                let inner = parent.kv_store(&key)?;
                Some((key, Arc::new(CacheKvStore::new(inner))))
            })
            .collect();
        Self { stores }
    }

    /// Flush every sub-store overlay into its parent.
    pub fn write(&self) {
        for store in self.stores.values() {
            store.write();
        }
    }
}

impl MultiStore for CacheMultiStore {
    fn kv_store(&self, key: &StoreKey) -> Option<Arc<dyn KvStore>> {
        self.stores
            .get(key)
            .map(|s| Arc::clone(s) as Arc<dyn KvStore>)
    }

    fn store_keys(&self) -> Vec<StoreKey> {
        self.stores.keys().cloned().collect()
    }
}
