//! The `kv` namespace.

use qb_01_store::{KvStore, StoreKey};
use qb_02_mapper::{BaseMapper, Codec, Mapper, MapperError};
use std::any::Any;
use std::sync::Arc;

/// Registry and sub-store name.
pub const KV_MAPPER_NAME: &str = "kv";

/// Mapper over the `kv` namespace.
#[derive(Debug, Clone)]
pub struct KvMapper {
    base: BaseMapper,
}

impl KvMapper {
    /// Unbound mapper.
    pub fn new(codec: Arc<Codec>) -> Self {
        Self {
            base: BaseMapper::new(KV_MAPPER_NAME, codec),
        }
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Result<Option<String>, MapperError> {
        self.base.get(key.as_bytes())
    }

    /// Store `value` under `key`.
    pub fn set(&self, key: &str, value: &str) -> Result<(), MapperError> {
        self.base.set(key.as_bytes(), value)
    }
}

impl Mapper for KvMapper {
    fn name(&self) -> &str {
        KV_MAPPER_NAME
    }

    fn store_key(&self) -> StoreKey {
        self.base.store_key()
    }

    fn bind(&self, store: Arc<dyn KvStore>) -> Arc<dyn Mapper> {
        Arc::new(Self {
            base: self.base.bound(store),
        })
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
