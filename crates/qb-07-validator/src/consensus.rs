//! Consensus parameters persisted at genesis.

use qb_01_store::{KvStore, StoreKey};
use qb_02_mapper::{BaseMapper, Codec, Mapper, MapperError};
use shared_types::ConsensusParams;
use std::any::Any;
use std::sync::Arc;

/// Registry and sub-store name.
pub const CONSENSUS_MAPPER_NAME: &str = "consensus";

const CONSENSUS_KEY: &str = "cons_params";

/// Store query path for consensus keys.
pub fn build_cons_store_query_path() -> String {
    format!("/store/{CONSENSUS_MAPPER_NAME}/key")
}

/// Key holding the parameters.
pub fn build_cons_key() -> Vec<u8> {
    CONSENSUS_KEY.as_bytes().to_vec()
}

/// Mapper over the `consensus` namespace.
#[derive(Debug, Clone)]
pub struct ConsensusMapper {
    base: BaseMapper,
}

impl ConsensusMapper {
    /// Unbound mapper.
    pub fn new(codec: Arc<Codec>) -> Self {
        Self {
            base: BaseMapper::new(CONSENSUS_MAPPER_NAME, codec),
        }
    }

    /// Stored parameters.
    pub fn get_consensus_params(&self) -> Result<Option<ConsensusParams>, MapperError> {
        self.base.get(&build_cons_key())
    }

    /// Persist parameters.
    pub fn set_consensus_params(&self, params: &ConsensusParams) -> Result<(), MapperError> {
        self.base.set(&build_cons_key(), params)
    }
}

impl Mapper for ConsensusMapper {
    fn name(&self) -> &str {
        CONSENSUS_MAPPER_NAME
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
