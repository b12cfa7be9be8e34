use shared_types::Hash;
use std::fmt;

/// Name of a mounted sub-store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreKey(String);

impl StoreKey {
    /// Create a key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Store name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoreKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Identifier of a committed version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitId {
    /// Version number; 0 means nothing has been committed.
    pub version: u64,
    /// Content hash over every mounted store.
    pub hash: Hash,
}

impl CommitId {
    /// True before the first commit.
    pub fn is_zero(&self) -> bool {
        self.version == 0 && self.hash == Hash::default()
    }
}

/// Gas charged by `GasKvStore` for each operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KvGasConfig {
    /// Flat cost of a read.
    pub read_cost_flat: u64,
    /// Cost per byte read.
    pub read_cost_per_byte: u64,
    /// Flat cost of a write.
    pub write_cost_flat: u64,
    /// Cost per byte written.
    pub write_cost_per_byte: u64,
    /// Cost of a delete.
    pub delete_cost: u64,
    /// Cost per item returned by an iteration.
    pub iter_next_cost_flat: u64,
}

impl Default for KvGasConfig {
    fn default() -> Self {
        Self {
            read_cost_flat: 10,
            read_cost_per_byte: 1,
            write_cost_flat: 10,
            write_cost_per_byte: 10,
            delete_cost: 10,
            iter_next_cost_flat: 30,
        }
    }
}
