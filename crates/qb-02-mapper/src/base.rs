//! # Namespace Mappers
//!
//! A mapper binds a logical namespace name to one sub-store and the shared
//! codec. Contexts call `Mapper::bind` every time their store snapshot
//! changes, so a bound copy only ever sees the snapshot it was bound to.

use crate::codec::Codec;
use crate::errors::MapperError;
use qb_01_store::{KvStore, StoreKey};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;

/// A namespace descriptor that can produce copies bound to a store.
pub trait Mapper: Send + Sync + 'static {
    /// Registry name.
    fn name(&self) -> &str;

    /// Sub-store the namespace lives in.
    fn store_key(&self) -> StoreKey;

    /// Fresh copy bound to `store`.
    fn bind(&self, store: Arc<dyn KvStore>) -> Arc<dyn Mapper>;

    /// Upcast for downcasting to the concrete mapper.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Typed get/set over one sub-store.
#[derive(Clone)]
pub struct BaseMapper {
    name: String,
    key: StoreKey,
    codec: Arc<Codec>,
    store: Option<Arc<dyn KvStore>>,
}

impl BaseMapper {
    /// Unbound mapper whose sub-store carries the same name.
    pub fn new(name: impl Into<String>, codec: Arc<Codec>) -> Self {
        let name = name.into();
        Self {
            key: StoreKey::new(name.clone()),
            name,
            codec,
            store: None,
        }
    }

    /// Registry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sub-store key.
    pub fn store_key(&self) -> StoreKey {
        self.key.clone()
    }

    /// Shared codec.
    pub fn codec(&self) -> &Arc<Codec> {
        &self.codec
    }

    /// Copy bound to `store`.
    pub fn bound(&self, store: Arc<dyn KvStore>) -> Self {
        Self {
            store: Some(store),
            ..self.clone()
        }
    }

    /// Whether a store is bound.
    pub fn is_bound(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> &Arc<dyn KvStore> {
        match &self.store {
            Some(store) => store,
            None => panic!("mapper {} used before a store was bound", self.name),
        }
    }

    /// Decode the value at `key`; `None` when absent.
    pub fn get<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, MapperError> {
        match self.store().get(key) {
            Some(bytes) => Ok(Some(self.codec.decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Encode and store `value` at `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &[u8], value: &T) -> Result<(), MapperError> {
        let bytes = self.codec.encode(value)?;
        self.store().set(key, bytes);
        Ok(())
    }

    /// Raw bytes at `key`.
    pub fn get_bytes(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.store().get(key)
    }

    /// Store raw bytes at `key`.
    pub fn set_bytes(&self, key: &[u8], value: Vec<u8>) {
        self.store().set(key, value);
    }

    /// Whether `key` is present.
    pub fn has(&self, key: &[u8]) -> bool {
        self.store().has(key)
    }

    /// Remove `key`.
    pub fn del(&self, key: &[u8]) {
        self.store().delete(key);
    }

    /// Decode every value under `prefix`, ascending by key.
    pub fn iterate_prefix<T: DeserializeOwned>(
        &self,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, T)>, MapperError> {
        self.store()
            .iterate_prefix(prefix)
            .into_iter()
            .map(|(k, v)| Ok((k, self.codec.decode(&v)?)))
            .collect()
    }
}

impl Mapper for BaseMapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn store_key(&self) -> StoreKey {
        self.key.clone()
    }

    fn bind(&self, store: Arc<dyn KvStore>) -> Arc<dyn Mapper> {
        Arc::new(self.bound(store))
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl std::fmt::Debug for BaseMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseMapper")
            .field("name", &self.name)
            .field("bound", &self.is_bound())
            .finish()
    }
}
