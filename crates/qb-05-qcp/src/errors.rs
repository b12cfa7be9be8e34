//! QCP error types.

use qb_02_mapper::MapperError;
use shared_types::TxError;
use thiserror::Error;

/// Errors raised while configuring or persisting QCP state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QcpError {
    /// Genesis document could not be parsed.
    #[error("Invalid QCP genesis: {0}")]
    InvalidGenesis(String),

    /// A configured trusted key is malformed.
    #[error("Invalid trusted pubkey for chain {chain_id}: {reason}")]
    InvalidPubKey {
        /// Remote chain.
        chain_id: String,
        /// What is wrong with the key.
        reason: String,
    },

    /// A configured remote chain id is empty.
    #[error("QCP entry {0} has no chain id")]
    MissingChainId(String),

    /// Reading or writing the namespace failed.
    #[error(transparent)]
    Mapper(#[from] MapperError),
}

impl From<QcpError> for TxError {
    fn from(err: QcpError) -> Self {
        TxError::Internal(err.to_string())
    }
}
