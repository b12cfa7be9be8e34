//! # QB-08 BaseApp
//!
//! **Subsystem ID:** 08
//!
//! The ABCI application state machine. `BaseApp` owns the versioned
//! multi-store, the namespace registry and the codec, and drives every
//! transaction through the envelope pipeline.
//!
//! ## Lifecycle
//!
//! ```text
//! new ─► register_* ─► load_latest_version (seals)
//!                            │
//!          ┌─────────────────┴──────────────────┐
//!          ▼                                    ▼
//!      InitChain ─► DeliverTx* ─► Commit    CheckTx* (check state)
//!          │
//!          └─► BeginBlock ─► DeliverTx* ─► EndBlock ─► Commit ─► ...
//! ```
//!
//! ## Result Codes
//!
//! | Failure | Code |
//! |---------|------|
//! | undecodable bytes, structural errors | TxDecode (2) |
//! | nonce or QCP sequence mismatch | InvalidSequence (3) |
//! | signature or trust failure | Unauthorized (4) |
//! | unknown query | UnknownRequest (6) |
//! | gas limit exceeded | OutOfGas (12) |
//! | contained panic | Internal (1) |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qb_08_baseabci::{AppConfig, BaseApp};
//!
//! let mut app = BaseApp::in_memory(AppConfig::named("kv"))?;
//! app.register_mapper(Arc::new(KvMapper::new(app.codec().clone())))?;
//! app.register_itx::<KvStoreTx>("kv/KvStoreTx")?;
//! app.load_latest_version()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    AppConfig, AppError, BeginBlockHandler, CustomQueryHandler, EndBlockHandler, GasHandler,
    InitChainHandler, QcpResultHandler, RequestBeginBlock, RequestEndBlock, RequestInitChain,
    RequestQuery, ResponseBeginBlock, ResponseCheckTx, ResponseCommit, ResponseDeliverTx,
    ResponseEndBlock, ResponseInfo, ResponseInitChain, ResponseQuery,
};
pub use ports::Application;
pub use service::BaseApp;

/// Framework version reported by Info and `app/version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
