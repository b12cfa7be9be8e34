//! # Key/Value Demo Application
//!
//! One payload, `KvStoreTx`, writing a string value under a string key in
//! namespace `kv`. Values are readable through `custom/kv/<key>`.

pub mod mapper;
pub mod tx;

pub use mapper::{KvMapper, KV_MAPPER_NAME};
pub use tx::{KvStoreTx, KV_STORE_TX_TAG};
