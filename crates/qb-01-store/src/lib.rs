//! # QB-01 Store
//!
//! The key/value store contract consumed by the transaction engine.
//!
//! **Subsystem ID:** 01  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - `KvStore`: byte-keyed sub-store with ordered prefix iteration
//! - `MultiStore`: a set of sub-stores addressed by `StoreKey`, able to open
//!   a cache snapshot of itself
//! - `CommitMultiStore`: the root store that commits numbered versions and
//!   answers historical queries
//!
//! ## Snapshot Discipline
//!
//! ```text
//! MemCommitMultiStore (root, versioned)
//!     └── CacheMultiStore (block: check or deliver lineage)
//!             └── CacheMultiStore (one transaction)
//! ```
//!
//! A cache only reaches its parent through `write()`. Dropping it discards
//! every pending change.
//!
//! ## Module Structure
//!
//! ```text
//! qb-01-store/
//! ├── domain/          # StoreKey, CommitId, KvGasConfig, errors
//! ├── ports/           # KvStore, MultiStore, CommitMultiStore
//! └── adapters/        # memory, cache, gas-metered and versioned stores
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{
    CacheKvStore, CacheMultiStore, GasKvStore, MemCommitMultiStore, MemDb, MemKvStore,
};
pub use domain::{CommitId, KvGasConfig, StoreError, StoreKey};
pub use ports::{CommitMultiStore, KvStore, MultiStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
