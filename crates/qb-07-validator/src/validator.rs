//! Validator bookkeeping.

use qb_01_store::{KvStore, StoreKey};
use qb_02_mapper::{BaseMapper, Codec, Mapper, MapperError};
use shared_crypto::Ed25519PublicKey;
use shared_types::{Address, ValidatorUpdate};
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

/// Registry and sub-store name.
pub const VALIDATOR_MAPPER_NAME: &str = "validator";

const ENABLE_VALIDATOR_UPDATED_KEY: &[u8] = b"_enable_validator_updated_";
const VALIDATOR_UPDATE_SET_KEY: &[u8] = b"_validator_update_set_";
const LAST_BLOCK_PROPOSER_KEY: &[u8] = b"_last_block_proposer_";

/// Mapper over the `validator` namespace.
#[derive(Debug, Clone)]
pub struct ValidatorMapper {
    base: BaseMapper,
}

impl ValidatorMapper {
    /// Unbound mapper.
    pub fn new(codec: Arc<Codec>) -> Self {
        Self {
            base: BaseMapper::new(VALIDATOR_MAPPER_NAME, codec),
        }
    }

    /// Drop every pending update.
    pub fn clear_validator_update_set(&self) {
        self.base.del(VALIDATOR_UPDATE_SET_KEY);
    }

    /// Pending updates, in insertion order.
    pub fn get_validator_update_set(&self) -> Result<Vec<ValidatorUpdate>, MapperError> {
        Ok(self.base.get(VALIDATOR_UPDATE_SET_KEY)?.unwrap_or_default())
    }

    /// Overwrite the pending set.
    pub fn set_validator_update_set(&self, updates: &[ValidatorUpdate]) -> Result<(), MapperError> {
        self.base.set(VALIDATOR_UPDATE_SET_KEY, updates)
    }

    /// Add an update, replacing a pending one for the same key.
    pub fn add_validator_update(
        &self,
        pub_key: &Ed25519PublicKey,
        power: u64,
    ) -> Result<(), MapperError> {
        let update = ValidatorUpdate {
            pub_key: pub_key.as_bytes().to_vec(),
            power: power.min(i64::MAX as u64) as i64,
        };
        let mut updates = self.get_validator_update_set()?;
        match updates.iter_mut().find(|u| u.pub_key == update.pub_key) {
            Some(existing) => *existing = update,
            None => updates.push(update),
        }
        debug!(pending = updates.len(), "validator update recorded");
        self.set_validator_update_set(&updates)
    }

    /// Record the proposer of the current block.
    pub fn set_last_block_proposer(&self, proposer: &Address) -> Result<(), MapperError> {
        self.base.set(LAST_BLOCK_PROPOSER_KEY, proposer)
    }

    /// Proposer recorded by the last BeginBlock.
    pub fn get_last_block_proposer(&self) -> Result<Option<Address>, MapperError> {
        self.base.get(LAST_BLOCK_PROPOSER_KEY)
    }

    /// Whether EndBlock reports pending updates.
    pub fn is_enable_validator_updated(&self) -> Result<bool, MapperError> {
        Ok(self.base.get(ENABLE_VALIDATOR_UPDATED_KEY)?.unwrap_or(false))
    }

    /// Report pending updates from EndBlock.
    pub fn enable_validator_updated(&self) -> Result<(), MapperError> {
        self.base.set(ENABLE_VALIDATOR_UPDATED_KEY, &true)
    }

    /// Stop reporting pending updates.
    pub fn disable_validator_updated(&self) -> Result<(), MapperError> {
        self.base.set(ENABLE_VALIDATOR_UPDATED_KEY, &false)
    }
}

impl Mapper for ValidatorMapper {
    fn name(&self) -> &str {
        VALIDATOR_MAPPER_NAME
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
