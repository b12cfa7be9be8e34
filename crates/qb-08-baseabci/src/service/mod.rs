//! # BaseApp
//!
//! The application state machine.
//!
//! ## States
//!
//! | State | Store | Lifetime |
//! |-------|-------|----------|
//! | check | cache over the last committed version | rebuilt on every load and Commit |
//! | deliver | cache over the last committed version | InitChain / first BeginBlock until Commit |
//!
//! Every delivered `TxStd` executes in its own cache over the deliver
//! store, written back only when the envelope succeeds.

mod lifecycle;
mod query;
mod tx;


use crate::domain::{
    AppConfig, AppError, BeginBlockHandler, CustomQueryHandler, EndBlockHandler, GasHandler,
    InitChainHandler, QcpResultHandler, RequestBeginBlock, RequestEndBlock, RequestInitChain,
    RequestQuery, ResponseBeginBlock, ResponseCheckTx, ResponseCommit, ResponseDeliverTx,
    ResponseEndBlock, ResponseInfo, ResponseInitChain, ResponseQuery,
};
use crate::ports::Application;
use qb_01_store::{CacheMultiStore, CommitId, CommitMultiStore, MemCommitMultiStore, MultiStore};
use qb_02_mapper::{Codec, Mapper};
use qb_03_context::{Context, MapperRegistry};
use qb_04_txs::{ITx, QCP_RESULT_HANDLER_KEY};
use qb_05_qcp::QcpMapper;
use qb_06_account::{Account, AccountAuthenticator, AccountMapper, TxAuthenticator};
use qb_07_validator::{ConsensusMapper, ValidatorMapper};
use serde::de::DeserializeOwned;
use shared_crypto::{Ed25519KeyPair, Ed25519PublicKey};
use shared_types::{Address, BlockHeader, TxError, TxResult, VoteInfo};
use std::sync::Arc;
use tracing::{debug, info};

/// A store snapshot and the context bound to it.
pub(crate) struct State {
    pub(crate) ms: Arc<CacheMultiStore>,
    pub(crate) ctx: Context,
}

/// ABCI application over a versioned multi-store.
pub struct BaseApp {
    config: AppConfig,
    cms: Arc<dyn CommitMultiStore>,
    codec: Arc<Codec>,
    mappers: Arc<MapperRegistry>,
    authenticator: Option<Arc<dyn TxAuthenticator>>,
    qcp_signer: Option<Arc<Ed25519KeyPair>>,

    init_chainer: Option<InitChainHandler>,
    begin_blocker: Option<BeginBlockHandler>,
    end_blocker: Option<EndBlockHandler>,
    gas_handler: Option<GasHandler>,
    qcp_result_handler: Option<QcpResultHandler>,
    custom_query_handler: Option<CustomQueryHandler>,

    check_state: Option<State>,
    deliver_state: Option<State>,
    vote_infos: Vec<VoteInfo>,
    sealed: bool,
}

impl BaseApp {
    /// Application over `cms` with the framework namespaces (`qcp`,
    /// `consensus`, `validator`) registered.
    pub fn new(config: AppConfig, cms: Arc<dyn CommitMultiStore>) -> Result<Self, AppError> {
        let qcp_signer = config
            .qcp_signer_seed
            .map(|seed| Arc::new(Ed25519KeyPair::from_seed(seed)));
        let codec = Arc::new(Codec::new());

        let mut app = Self {
            config,
            cms,
            codec: codec.clone(),
            mappers: Arc::new(MapperRegistry::new()),
            authenticator: None,
            qcp_signer,
            init_chainer: None,
            begin_blocker: None,
            end_blocker: None,
            gas_handler: None,
            qcp_result_handler: None,
            custom_query_handler: None,
            check_state: None,
            deliver_state: None,
            vote_infos: Vec::new(),
            sealed: false,
        };

        app.register_mapper(Arc::new(QcpMapper::new(codec.clone())))?;
        app.register_mapper(Arc::new(ConsensusMapper::new(codec.clone())))?;
        app.register_mapper(Arc::new(ValidatorMapper::new(codec)))?;

        if let Some(signer) = &app.qcp_signer {
            info!(signer = %signer.address(), "QCP signer configured");
        }
        Ok(app)
    }

    /// Application over a fresh in-memory store.
    pub fn in_memory(config: AppConfig) -> Result<Self, AppError> {
        Self::new(config, Arc::new(MemCommitMultiStore::new()))
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Application name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Shared codec; register payload types on it before loading.
    pub fn codec(&self) -> &Arc<Codec> {
        &self.codec
    }

    /// Identifier of the last committed version.
    pub fn last_commit_id(&self) -> CommitId {
        self.cms.last_commit_id()
    }

    /// Last committed height.
    pub fn last_block_height(&self) -> u64 {
        self.cms.last_commit_id().version
    }

    /// Key outbound cross-chain messages are signed with.
    pub fn qcp_signer_public_key(&self) -> Option<Ed25519PublicKey> {
        self.qcp_signer.as_ref().map(|k| k.public_key())
    }

    /// Whether registration is closed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Close registration.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    // ---------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------

    fn ensure_unsealed(&self, op: &'static str) -> Result<(), AppError> {
        if self.sealed {
            return Err(AppError::Sealed(op));
        }
        Ok(())
    }

    /// Register a namespace and mount its sub-store.
    pub fn register_mapper(&mut self, mapper: Arc<dyn Mapper>) -> Result<(), AppError> {
        self.ensure_unsealed("register_mapper")?;
        let name = mapper.name().to_string();
        if self.mappers.contains_key(&name) {
            return Err(AppError::DuplicateMapper(name));
        }
        self.cms.mount_store(mapper.store_key())?;
        Arc::make_mut(&mut self.mappers).insert(name.clone(), mapper);
        debug!(mapper = %name, "mapper registered");
        Ok(())
    }

    /// Register the account type. Enables signature and nonce binding for
    /// every `TxStd`.
    pub fn register_account_proto<A: Account>(&mut self) -> Result<(), AppError> {
        self.ensure_unsealed("register_account_proto")?;
        self.register_mapper(Arc::new(AccountMapper::<A>::new(self.codec.clone())))?;
        self.authenticator = Some(Arc::new(AccountAuthenticator::<A>::new()));
        Ok(())
    }

    /// Register a payload type under `tag`.
    pub fn register_itx<T>(&mut self, tag: &str) -> Result<(), AppError>
    where
        T: ITx + DeserializeOwned,
    {
        self.ensure_unsealed("register_itx")?;
        qb_04_txs::register_itx::<T>(&self.codec, tag)?;
        Ok(())
    }

    /// Sign outbound cross-chain messages with `signer`.
    pub fn init_qcp_signer(&mut self, signer: Ed25519KeyPair) -> Result<(), AppError> {
        self.ensure_unsealed("init_qcp_signer")?;
        info!(signer = %signer.address(), "QCP signer configured");
        self.qcp_signer = Some(Arc::new(signer));
        Ok(())
    }

    /// Genesis hook.
    pub fn set_init_chainer<F>(&mut self, handler: F) -> Result<(), AppError>
    where
        F: Fn(&Context, &RequestInitChain) -> Result<ResponseInitChain, AppError>
            + Send
            + Sync
            + 'static,
    {
        self.ensure_unsealed("set_init_chainer")?;
        self.init_chainer = Some(Arc::new(handler));
        Ok(())
    }

    /// Pre-block hook.
    pub fn set_begin_blocker<F>(&mut self, handler: F) -> Result<(), AppError>
    where
        F: Fn(&Context, &RequestBeginBlock) -> ResponseBeginBlock + Send + Sync + 'static,
    {
        self.ensure_unsealed("set_begin_blocker")?;
        self.begin_blocker = Some(Arc::new(handler));
        Ok(())
    }

    /// Post-block hook.
    pub fn set_end_blocker<F>(&mut self, handler: F) -> Result<(), AppError>
    where
        F: Fn(&Context, &RequestEndBlock) -> ResponseEndBlock + Send + Sync + 'static,
    {
        self.ensure_unsealed("set_end_blocker")?;
        self.end_blocker = Some(Arc::new(handler));
        Ok(())
    }

    /// Gas-fee hook, run after payload execution with the first payload's
    /// gas payer.
    pub fn set_gas_handler<F>(&mut self, handler: F) -> Result<(), AppError>
    where
        F: Fn(&Context, Option<Address>) -> Result<u64, TxError> + Send + Sync + 'static,
    {
        self.ensure_unsealed("set_gas_handler")?;
        self.gas_handler = Some(Arc::new(handler));
        Ok(())
    }

    /// Callback for delivered result notifications.
    pub fn register_qcp_result_handler<F>(&mut self, handler: F) -> Result<(), AppError>
    where
        F: Fn(&Context, &qb_04_txs::QcpTxResult) -> TxResult + Send + Sync + 'static,
    {
        self.ensure_unsealed("register_qcp_result_handler")?;
        self.qcp_result_handler = Some(Arc::new(handler));
        Ok(())
    }

    /// Handler for `custom/...` queries.
    pub fn register_custom_query_handler<F>(&mut self, handler: F) -> Result<(), AppError>
    where
        F: Fn(&Context, &[String], &RequestQuery) -> Result<Vec<u8>, TxError>
            + Send
            + Sync
            + 'static,
    {
        self.ensure_unsealed("register_custom_query_handler")?;
        self.custom_query_handler = Some(Arc::new(handler));
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------------

    /// Load the latest committed version.
    pub fn load_latest_version(&mut self) -> Result<(), AppError> {
        self.cms.load_latest_version()?;
        self.init_from_store();
        Ok(())
    }

    /// Load a specific committed version.
    pub fn load_version(&mut self, version: u64) -> Result<(), AppError> {
        self.cms.load_version(version)?;
        self.init_from_store();
        Ok(())
    }

    fn init_from_store(&mut self) {
        self.check_state = Some(self.make_state(BlockHeader::default(), true));
        self.deliver_state = None;
        if self.config.seal_on_load {
            self.seal();
        }
        info!(
            app = %self.config.name,
            height = self.last_block_height(),
            mappers = self.mappers.len(),
            "application loaded"
        );
    }

    // ---------------------------------------------------------------------
    // Contexts
    // ---------------------------------------------------------------------

    fn make_state(&self, header: BlockHeader, is_check_tx: bool) -> State {
        let ms = self.cms.cache_multi_store();
        let mut ctx = Context::new(
            ms.clone(),
            header,
            is_check_tx,
            self.codec.clone(),
            self.mappers.clone(),
        );
        if let Some(handler) = &self.qcp_result_handler {
            ctx = ctx.with_value(QCP_RESULT_HANDLER_KEY, handler.clone());
        }
        State { ms, ctx }
    }

    /// Context over the check or deliver store with `header`.
    pub fn new_context(&self, is_check_tx: bool, header: BlockHeader) -> Result<Context, AppError> {
        let state = if is_check_tx {
            self.check_state.as_ref()
        } else {
            self.deliver_state.as_ref()
        };
        let state = state.ok_or(AppError::NotInitialized("new_context"))?;
        Ok(Context::new(
            state.ms.clone(),
            header,
            is_check_tx,
            self.codec.clone(),
            self.mappers.clone(),
        ))
    }

    pub(crate) fn deliver_ctx(&self, op: &'static str) -> Result<Context, AppError> {
        self.deliver_state
            .as_ref()
            .map(|s| s.ctx.clone())
            .ok_or(AppError::NotInitialized(op))
    }
}

impl Application for BaseApp {
    fn info(&self) -> ResponseInfo {
        BaseApp::info(self)
    }

    fn init_chain(&mut self, req: RequestInitChain) -> Result<ResponseInitChain, AppError> {
        BaseApp::init_chain(self, req)
    }

    fn begin_block(&mut self, req: RequestBeginBlock) -> Result<ResponseBeginBlock, AppError> {
        BaseApp::begin_block(self, req)
    }

    fn check_tx(&mut self, tx: &[u8]) -> ResponseCheckTx {
        BaseApp::check_tx(self, tx)
    }

    fn deliver_tx(&mut self, tx: &[u8]) -> ResponseDeliverTx {
        BaseApp::deliver_tx(self, tx)
    }

    fn end_block(&mut self, req: RequestEndBlock) -> Result<ResponseEndBlock, AppError> {
        BaseApp::end_block(self, req)
    }

    fn commit(&mut self) -> Result<ResponseCommit, AppError> {
        BaseApp::commit(self)
    }

    fn query(&self, req: RequestQuery) -> ResponseQuery {
        BaseApp::query(self, req)
    }
}
