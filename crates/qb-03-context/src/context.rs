//! # Context
//!
//! Per-call state: store snapshot, block header, chain id, mode flag,
//! transaction bytes and index, gas meter, signing validators, bound mappers
//! and application values.

use crate::mutation_log::{ContextOp, MutationLog};
use qb_01_store::{CacheMultiStore, GasKvStore, KvGasConfig, KvStore, MultiStore, StoreKey};
use qb_02_mapper::{Codec, Mapper};
use shared_types::{BlockHeader, GasMeter, TxError, VoteInfo};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Unbound mapper prototypes by name.
pub type MapperRegistry = BTreeMap<String, Arc<dyn Mapper>>;

type BoundMappers = HashMap<String, Arc<dyn Mapper>>;
type Values = HashMap<&'static str, Arc<dyn Any + Send + Sync>>;

/// Immutable execution context. Cloning is cheap.
#[derive(Clone)]
pub struct Context {
    multi_store: Arc<dyn MultiStore>,
    header: BlockHeader,
    chain_id: String,
    is_check_tx: bool,
    tx_bytes: Arc<Vec<u8>>,
    block_tx_index: i64,
    gas_meter: GasMeter,
    gas_config: KvGasConfig,
    vote_infos: Arc<Vec<VoteInfo>>,
    codec: Arc<Codec>,
    registry: Arc<MapperRegistry>,
    mappers: Arc<BoundMappers>,
    values: Arc<Values>,
    log: MutationLog,
    version: u64,
}

impl Context {
    /// Root context over `multi_store`. Starts a new mutation log.
    pub fn new(
        multi_store: Arc<dyn MultiStore>,
        header: BlockHeader,
        is_check_tx: bool,
        codec: Arc<Codec>,
        registry: Arc<MapperRegistry>,
    ) -> Self {
        let mut ctx = Self {
            multi_store,
            chain_id: header.chain_id.clone(),
            header,
            is_check_tx,
            tx_bytes: Arc::new(Vec::new()),
            block_tx_index: -1,
            gas_meter: GasMeter::infinite(),
            gas_config: KvGasConfig::default(),
            vote_infos: Arc::new(Vec::new()),
            codec,
            registry,
            mappers: Arc::new(HashMap::new()),
            values: Arc::new(HashMap::new()),
            log: MutationLog::new(),
            version: 0,
        };
        ctx.rebind_mappers();
        ctx
    }

    fn record(mut self, op: ContextOp) -> Self {
        self.version = self.log.append(op);
        self
    }

    fn rebind_mappers(&mut self) {
        let bound: BoundMappers = self
            .registry
            .iter()
            .filter_map(|(name, proto)| {
                let store = self.kv_store(&proto.store_key())?;
                Some((name.clone(), proto.bind(store)))
            })
            .collect();
        trace!(mappers = bound.len(), version = self.version, "mappers rebound");
        self.mappers = Arc::new(bound);
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Active store snapshot.
    pub fn multi_store(&self) -> &Arc<dyn MultiStore> {
        &self.multi_store
    }

    /// Gas-metered handle to a sub-store of the active snapshot.
    pub fn kv_store(&self, key: &StoreKey) -> Option<Arc<dyn KvStore>> {
        let inner = self.multi_store.kv_store(key)?;
        Some(Arc::new(GasKvStore::new(
            inner,
            self.gas_meter.clone(),
            self.gas_config,
        )))
    }

    /// Current block header.
    pub fn block_header(&self) -> &BlockHeader {
        &self.header
    }

    /// Current block height.
    pub fn block_height(&self) -> u64 {
        self.header.height
    }

    /// Chain being executed.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// True on the CheckTx lineage.
    pub fn is_check_tx(&self) -> bool {
        self.is_check_tx
    }

    /// Raw bytes of the transaction being processed.
    pub fn tx_bytes(&self) -> &[u8] {
        &self.tx_bytes
    }

    /// Index of the current transaction in the block, -1 before the first.
    pub fn block_tx_index(&self) -> i64 {
        self.block_tx_index
    }

    /// Gas meter shared by clones of this context.
    pub fn gas_meter(&self) -> &GasMeter {
        &self.gas_meter
    }

    /// Validators that signed the previous block.
    pub fn vote_infos(&self) -> &[VoteInfo] {
        &self.vote_infos
    }

    /// Shared codec.
    pub fn codec(&self) -> &Arc<Codec> {
        &self.codec
    }

    /// Mutation log shared with every related context.
    pub fn mutation_log(&self) -> &MutationLog {
        &self.log
    }

    /// Version of the last mutation that produced this context.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Bound mapper as a trait object.
    pub fn raw_mapper(&self, name: &str) -> Option<Arc<dyn Mapper>> {
        self.mappers.get(name).cloned()
    }

    /// Bound mapper downcast to its concrete type.
    pub fn mapper<T: Mapper>(&self, name: &str) -> Option<Arc<T>> {
        self.raw_mapper(name)?.as_any().downcast::<T>().ok()
    }

    /// Like `mapper`, failing with an internal error when not registered.
    pub fn require_mapper<T: Mapper>(&self, name: &str) -> Result<Arc<T>, TxError> {
        self.mapper::<T>(name)
            .ok_or_else(|| TxError::Internal(format!("mapper {name} not registered")))
    }

    /// Whether a mapper with this name is registered.
    pub fn has_mapper(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Application value attached under `key`.
    pub fn value<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.values.get(key)?.clone().downcast::<T>().ok()
    }

    // ---------------------------------------------------------------------
    // Derivations
    // ---------------------------------------------------------------------

    /// Context over another store snapshot. Rebinds every mapper.
    pub fn with_multi_store(&self, multi_store: Arc<dyn MultiStore>) -> Self {
        let mut ctx = self.clone();
        ctx.multi_store = multi_store;
        ctx.rebind_mappers();
        ctx.record(ContextOp::MultiStore)
    }

    /// Context with another block header.
    pub fn with_block_header(&self, header: BlockHeader) -> Self {
        let mut ctx = self.clone();
        ctx.header = header.clone();
        ctx.record(ContextOp::BlockHeader(header))
    }

    /// Context with the header height replaced.
    pub fn with_block_height(&self, height: u64) -> Self {
        let mut ctx = self.clone();
        ctx.header.height = height;
        ctx.record(ContextOp::BlockHeight(height))
    }

    /// Context with another chain id.
    pub fn with_chain_id(&self, chain_id: impl Into<String>) -> Self {
        let mut ctx = self.clone();
        ctx.chain_id = chain_id.into();
        let op = ContextOp::ChainId(ctx.chain_id.clone());
        ctx.record(op)
    }

    /// Context in check or deliver mode.
    pub fn with_is_check_tx(&self, is_check_tx: bool) -> Self {
        let mut ctx = self.clone();
        ctx.is_check_tx = is_check_tx;
        ctx.record(ContextOp::IsCheckTx(is_check_tx))
    }

    /// Context carrying the raw transaction bytes.
    pub fn with_tx_bytes(&self, tx_bytes: Vec<u8>) -> Self {
        let mut ctx = self.clone();
        ctx.tx_bytes = Arc::new(tx_bytes.clone());
        ctx.record(ContextOp::TxBytes(tx_bytes))
    }

    /// Context with another per-block transaction index.
    pub fn with_block_tx_index(&self, index: i64) -> Self {
        let mut ctx = self.clone();
        ctx.block_tx_index = index;
        ctx.record(ContextOp::BlockTxIndex(index))
    }

    /// Context with the transaction index reset to -1.
    pub fn reset_block_tx_index(&self) -> Self {
        self.with_block_tx_index(-1)
    }

    /// Context with the transaction index advanced by one.
    pub fn increment_block_tx_index(&self) -> Self {
        self.with_block_tx_index(self.block_tx_index + 1)
    }

    /// Context charging another gas meter. Rebinds every mapper.
    pub fn with_gas_meter(&self, gas_meter: GasMeter) -> Self {
        let mut ctx = self.clone();
        let limit = gas_meter.limit();
        ctx.gas_meter = gas_meter;
        ctx.rebind_mappers();
        ctx.record(ContextOp::GasMeter(limit))
    }

    /// Context with the signing validators of the previous block.
    pub fn with_vote_infos(&self, vote_infos: Vec<VoteInfo>) -> Self {
        let mut ctx = self.clone();
        ctx.vote_infos = Arc::new(vote_infos.clone());
        ctx.record(ContextOp::VoteInfos(vote_infos))
    }

    /// Context with an application value attached under `key`.
    pub fn with_value<T: Any + Send + Sync>(&self, key: &'static str, value: T) -> Self {
        let mut ctx = self.clone();
        let mut values = (*ctx.values).clone();
        values.insert(key, Arc::new(value));
        ctx.values = Arc::new(values);
        ctx.record(ContextOp::Value(key))
    }

    /// Child context over a fresh cache of the active snapshot, and the
    /// closure that writes the cache back.
    pub fn cache_context(&self) -> (Context, impl FnOnce() + Send + 'static) {
        let cache: Arc<CacheMultiStore> = self.multi_store.cache_multi_store();
        let child = self.with_multi_store(cache.clone());
        (child, move || {
            trace!("cache context written back");
            cache.write()
        })
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("chain_id", &self.chain_id)
            .field("height", &self.header.height)
            .field("is_check_tx", &self.is_check_tx)
            .field("block_tx_index", &self.block_tx_index)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
