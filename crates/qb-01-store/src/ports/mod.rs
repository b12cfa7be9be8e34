//! Store ports.

mod store;

pub use store::{CommitMultiStore, KvPairs, KvStore, MultiStore};
