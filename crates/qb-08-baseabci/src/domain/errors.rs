//! Application errors.
//!
//! These are fatal: they surface from startup and lifecycle calls, never
//! from CheckTx/DeliverTx, which report failures as `TxResult` codes.

use qb_01_store::StoreError;
use qb_02_mapper::{CodecError, MapperError};
use qb_05_qcp::QcpError;
use shared_types::TxError;
use thiserror::Error;

/// Fatal application errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Registration attempted after the application was sealed.
    #[error("{0} on sealed BaseApp")]
    Sealed(&'static str),

    /// A mapper with the same name is already registered.
    #[error("duplicate mapper: {0}")]
    DuplicateMapper(String),

    /// Lifecycle call made before the state it needs exists.
    #[error("{0} called before its state was initialized")]
    NotInitialized(&'static str),

    /// Genesis state could not be applied.
    #[error("genesis: {0}")]
    Genesis(#[from] QcpError),

    /// The application's init hook failed.
    #[error("init chainer: {0}")]
    InitChain(String),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Codec failure.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Namespace failure.
    #[error(transparent)]
    Mapper(#[from] MapperError),

    /// Framework namespace missing or unusable.
    #[error(transparent)]
    Tx(#[from] TxError),
}
