use crate::adapters::MemKvStore;
use crate::domain::{CommitId, StoreError, StoreKey};
use crate::ports::{CommitMultiStore, KvStore, MultiStore};
use parking_lot::RwLock;
use shared_crypto::Sha256Hasher;
use shared_types::{Hash, KvPair};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

type StoreData = BTreeMap<Vec<u8>, Vec<u8>>;

#[derive(Debug, Clone, Default)]
struct VersionSnapshot {
    stores: BTreeMap<StoreKey, StoreData>,
    hash: Hash,
}

/// Durable side of the in-memory commit store: every committed version.
///
/// Cloning shares the same database, so a store re-opened over a clone
/// sees all previously committed versions.
#[derive(Debug, Clone, Default)]
pub struct MemDb {
    versions: Arc<RwLock<BTreeMap<u64, VersionSnapshot>>>,
}

impl MemDb {
    /// Empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest committed version, 0 if none.
    pub fn latest_version(&self) -> u64 {
        self.versions.read().keys().next_back().copied().unwrap_or(0)
    }

    fn get(&self, version: u64) -> Option<VersionSnapshot> {
        self.versions.read().get(&version).cloned()
    }

    fn put(&self, version: u64, snapshot: VersionSnapshot) {
        self.versions.write().insert(version, snapshot);
    }
}

/// Versioned root multi-store kept in memory.
pub struct MemCommitMultiStore {
    db: MemDb,
    working: RwLock<BTreeMap<StoreKey, Arc<MemKvStore>>>,
    last_commit: RwLock<CommitId>,
}

impl MemCommitMultiStore {
    /// Store over a fresh database.
    pub fn new() -> Self {
        Self::with_db(MemDb::new())
    }

    /// Store over an existing database.
    pub fn with_db(db: MemDb) -> Self {
        Self {
            db,
            working: RwLock::new(BTreeMap::new()),
            last_commit: RwLock::new(CommitId::default()),
        }
    }

    /// Handle to the underlying database.
    pub fn db(&self) -> MemDb {
        self.db.clone()
    }

    fn compute_hash(stores: &BTreeMap<StoreKey, StoreData>) -> Hash {
        let mut hasher = Sha256Hasher::new();
        for (key, data) in stores {
            hasher.update_framed(key.name().as_bytes());
            for (k, v) in data {
                hasher.update_framed(k).update_framed(v);
            }
        }
        hasher.finalize()
    }

    fn resolve_height(&self, height: u64) -> Result<u64, StoreError> {
        let latest = self.last_commit.read().version;
        match height {
            0 => Ok(latest),
            h if h > latest => Err(StoreError::VersionNotFound(h)),
            h => Ok(h),
        }
    }

    fn split_path(path: &str) -> Result<(StoreKey, &str), StoreError> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        match trimmed.split_once('/') {
            Some((store, sub)) if !store.is_empty() => Ok((StoreKey::new(store), sub)),
            _ => Err(StoreError::InvalidPath(path.to_string())),
        }
    }
}

impl Default for MemCommitMultiStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiStore for MemCommitMultiStore {
    fn kv_store(&self, key: &StoreKey) -> Option<Arc<dyn KvStore>> {
        self.working
            .read()
            .get(key)
            .map(|s| Arc::clone(s) as Arc<dyn KvStore>)
    }

    fn store_keys(&self) -> Vec<StoreKey> {
        self.working.read().keys().cloned().collect()
    }
}

impl CommitMultiStore for MemCommitMultiStore {
    fn mount_store(&self, key: StoreKey) -> Result<(), StoreError> {
        let mut working = self.working.write();
        if working.contains_key(&key) {
            return Err(StoreError::DuplicateStore(key.name().to_string()));
        }
        working.insert(key, Arc::new(MemKvStore::new()));
        Ok(())
    }

    fn load_latest_version(&self) -> Result<(), StoreError> {
        self.load_version(self.db.latest_version())
    }

    fn load_version(&self, version: u64) -> Result<(), StoreError> {
        let snapshot = if version == 0 {
            VersionSnapshot::default()
        } else {
            self.db
                .get(version)
                .ok_or(StoreError::VersionNotFound(version))?
        };

        for (key, store) in self.working.read().iter() {
            store.replace(snapshot.stores.get(key).cloned().unwrap_or_default());
        }
        *self.last_commit.write() = CommitId {
            version,
            hash: snapshot.hash,
        };
        info!(version, "loaded store version");
        Ok(())
    }

    fn commit(&self) -> CommitId {
        let stores: BTreeMap<StoreKey, StoreData> = self
            .working
            .read()
            .iter()
            .map(|(k, s)| (k.clone(), s.snapshot()))
            .collect();
        let hash = Self::compute_hash(&stores);
        let version = self.last_commit.read().version + 1;
        self.db.put(version, VersionSnapshot { stores, hash });

        let id = CommitId { version, hash };
        *self.last_commit.write() = id;
        debug!(version, "committed store version");
        id
    }

    fn last_commit_id(&self) -> CommitId {
        *self.last_commit.read()
    }

    fn query(&self, path: &str, data: &[u8], height: u64) -> Result<(Vec<u8>, u64), StoreError> {
        let (key, sub) = Self::split_path(path)?;
        if !self.working.read().contains_key(&key) {
            return Err(StoreError::UnknownStore(key.name().to_string()));
        }
        let height = self.resolve_height(height)?;
        let snapshot = self.db.get(height).unwrap_or_default();
        let empty = StoreData::new();
        let store = snapshot.stores.get(&key).unwrap_or(&empty);

        match sub {
            "key" => Ok((store.get(data).cloned().unwrap_or_default(), height)),
            "subspace" => {
                let pairs: Vec<KvPair> = super::prefix_range(store, data)
                    .map(|(k, v)| KvPair::new(k, v))
                    .collect();
                let bytes = bincode::serialize(&pairs)
                    .map_err(|e| StoreError::SerializationError(e.to_string()))?;
                Ok((bytes, height))
            }
            _ => Err(StoreError::InvalidPath(path.to_string())),
        }
    }
}
