//! Application hooks.
//!
//! All hooks are optional. They are registered before the application is
//! sealed and invoked by `BaseApp` with the context of the current call.

use crate::domain::abci::{
    RequestBeginBlock, RequestEndBlock, RequestInitChain, RequestQuery, ResponseBeginBlock,
    ResponseEndBlock, ResponseInitChain,
};
use crate::domain::errors::AppError;
use qb_03_context::Context;
use shared_types::{Address, TxError};
use std::sync::Arc;

pub use qb_04_txs::QcpResultHandler;

/// Initialise application state at genesis. An error aborts `init_chain`.
pub type InitChainHandler = Arc<
    dyn Fn(&Context, &RequestInitChain) -> Result<ResponseInitChain, AppError> + Send + Sync,
>;

/// Runs before the transactions of a block.
pub type BeginBlockHandler =
    Arc<dyn Fn(&Context, &RequestBeginBlock) -> ResponseBeginBlock + Send + Sync>;

/// Runs after the transactions of a block; may return validator changes.
pub type EndBlockHandler =
    Arc<dyn Fn(&Context, &RequestEndBlock) -> ResponseEndBlock + Send + Sync>;

/// Charges the gas payer after execution; returns the gas used.
pub type GasHandler = Arc<dyn Fn(&Context, Option<Address>) -> Result<u64, TxError> + Send + Sync>;

/// Answers `custom/<route...>` queries. `route` excludes the `custom` segment.
pub type CustomQueryHandler =
    Arc<dyn Fn(&Context, &[String], &RequestQuery) -> Result<Vec<u8>, TxError> + Send + Sync>;
