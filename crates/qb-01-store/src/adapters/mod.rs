//! Store adapters.

mod cache_kv;
mod cache_multi;
mod commit_multi;
mod gas_kv;
mod mem_kv;

pub use cache_kv::CacheKvStore;
pub use cache_multi::CacheMultiStore;
pub use commit_multi::{MemCommitMultiStore, MemDb};
pub use gas_kv::GasKvStore;
pub use mem_kv::MemKvStore;

use std::collections::BTreeMap;

pub(crate) fn prefix_range<'a, V>(
    map: &'a BTreeMap<Vec<u8>, V>,
    prefix: &'a [u8],
) -> impl Iterator<Item = (&'a Vec<u8>, &'a V)> + 'a {
    map.range(prefix.to_vec()..)
        .take_while(move |(k, _)| k.starts_with(prefix))
}
