use crate::adapters::CacheMultiStore;
use crate::domain::{CommitId, StoreError, StoreKey};
use std::sync::Arc;

/// Ordered key/value pairs returned by prefix iteration.
pub type KvPairs = Vec<(Vec<u8>, Vec<u8>)>;

/// A byte-keyed sub-store. Implementations use interior mutability so that
/// handles can be shared by every context bound to the same snapshot.
pub trait KvStore: Send + Sync {
    /// Value stored under `key`.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Whether `key` is present.
    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Store `value` under `key`.
    fn set(&self, key: &[u8], value: Vec<u8>);

    /// Remove `key`.
    fn delete(&self, key: &[u8]);

    /// Every pair whose key starts with `prefix`, ascending by key.
    fn iterate_prefix(&self, prefix: &[u8]) -> KvPairs;
}

/// A set of sub-stores addressed by name.
pub trait MultiStore: Send + Sync {
    /// Sub-store handle for `key`.
    fn kv_store(&self, key: &StoreKey) -> Option<Arc<dyn KvStore>>;

    /// Names of every sub-store.
    fn store_keys(&self) -> Vec<StoreKey>;

    /// Open a cache snapshot over this multi-store.
    fn cache_multi_store(&self) -> Arc<CacheMultiStore> {
        Arc::new(CacheMultiStore::wrap(self))
    }
}

/// Root store that persists numbered versions.
pub trait CommitMultiStore: MultiStore {
    /// Register a sub-store. Must happen before a version is loaded.
    fn mount_store(&self, key: StoreKey) -> Result<(), StoreError>;

    /// Load the most recent committed version (or an empty state).
    fn load_latest_version(&self) -> Result<(), StoreError>;

    /// Load a specific committed version.
    fn load_version(&self, version: u64) -> Result<(), StoreError>;

    /// Persist the working state as a new version.
    fn commit(&self) -> CommitId;

    /// Identifier of the last committed version.
    fn last_commit_id(&self) -> CommitId;

    /// Answer `/<store>/key` and `/<store>/subspace` queries at `height`
    /// (0 = latest). Returns the value and the height it was read at.
    fn query(&self, path: &str, data: &[u8], height: u64) -> Result<(Vec<u8>, u64), StoreError>;
}
