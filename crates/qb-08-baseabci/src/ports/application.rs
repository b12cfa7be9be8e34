//! Driving port.

use crate::domain::{
    AppError, RequestBeginBlock, RequestEndBlock, RequestInitChain, RequestQuery,
    ResponseBeginBlock, ResponseCheckTx, ResponseCommit, ResponseDeliverTx, ResponseEndBlock,
    ResponseInfo, ResponseInitChain, ResponseQuery,
};

/// ABCI-style application driven by a consensus engine.
///
/// Calls are serialized: at most one is in flight at a time.
///
/// ```text
/// InitChain -> (BeginBlock -> DeliverTx* -> EndBlock -> Commit)*
/// CheckTx and Query may run between any two calls.
/// ```
pub trait Application {
    /// Identity and last committed state.
    fn info(&self) -> ResponseInfo;

    /// Apply genesis.
    fn init_chain(&mut self, req: RequestInitChain) -> Result<ResponseInitChain, AppError>;

    /// Open a block.
    fn begin_block(&mut self, req: RequestBeginBlock) -> Result<ResponseBeginBlock, AppError>;

    /// Admission check; never mutates durable state.
    fn check_tx(&mut self, tx: &[u8]) -> ResponseCheckTx;

    /// Execute one transaction of the open block.
    fn deliver_tx(&mut self, tx: &[u8]) -> ResponseDeliverTx;

    /// Close the block.
    fn end_block(&mut self, req: RequestEndBlock) -> Result<ResponseEndBlock, AppError>;

    /// Persist the block and start a new check lineage.
    fn commit(&mut self) -> Result<ResponseCommit, AppError>;

    /// Read state.
    fn query(&self, req: RequestQuery) -> ResponseQuery;
}
