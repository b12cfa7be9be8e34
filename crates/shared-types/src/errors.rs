//! # Error Types
//!
//! The stable result-code taxonomy reported to the consensus engine and the
//! `TxError` / `TxResult` pair every transaction path returns.

use crate::entities::Event;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Codespace of all framework-level errors.
pub const CODESPACE_ROOT: &str = "sdk";

/// ABCI result codes. Values are part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum CodeType {
    /// Success.
    Ok = 0,
    /// Unexpected fault, including contained panics.
    Internal = 1,
    /// Transaction bytes could not be decoded or are structurally invalid.
    TxDecode = 2,
    /// Nonce or cross-chain sequence mismatch.
    InvalidSequence = 3,
    /// Signature or trust failure.
    Unauthorized = 4,
    /// Balance too low.
    InsufficientFunds = 5,
    /// Query path or request not understood.
    UnknownRequest = 6,
    /// Malformed address.
    InvalidAddress = 7,
    /// Malformed or mismatched public key.
    InvalidPubKey = 8,
    /// Address has no account.
    UnknownAddress = 9,
    /// Gas limit exceeded.
    OutOfGas = 12,
}

impl CodeType {
    /// Numeric value.
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Errors produced while validating or executing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),

    /// Structural or decoding failure.
    #[error("tx decode error: {0}")]
    TxDecode(String),

    /// Nonce or sequence mismatch.
    #[error("invalid sequence: {0}")]
    InvalidSequence(String),

    /// Authentication failure.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Not enough balance.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Unknown query or request.
    #[error("unknown request: {0}")]
    UnknownRequest(String),

    /// Malformed address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Malformed public key.
    #[error("invalid pubkey: {0}")]
    InvalidPubKey(String),

    /// No account stored for an address.
    #[error("unknown address: {0}")]
    UnknownAddress(String),

    /// Gas limit exceeded.
    #[error("out of gas: {0}")]
    OutOfGas(String),
}

impl TxError {
    /// The result code this error maps to.
    pub fn code(&self) -> CodeType {
        match self {
            TxError::Internal(_) => CodeType::Internal,
            TxError::TxDecode(_) => CodeType::TxDecode,
            TxError::InvalidSequence(_) => CodeType::InvalidSequence,
            TxError::Unauthorized(_) => CodeType::Unauthorized,
            TxError::InsufficientFunds(_) => CodeType::InsufficientFunds,
            TxError::UnknownRequest(_) => CodeType::UnknownRequest,
            TxError::InvalidAddress(_) => CodeType::InvalidAddress,
            TxError::InvalidPubKey(_) => CodeType::InvalidPubKey,
            TxError::UnknownAddress(_) => CodeType::UnknownAddress,
            TxError::OutOfGas(_) => CodeType::OutOfGas,
        }
    }

    /// Convert into a failed `TxResult` with the message as log.
    pub fn result(&self) -> TxResult {
        TxResult {
            code: self.code().as_u32(),
            codespace: CODESPACE_ROOT.to_string(),
            log: self.to_string(),
            ..Default::default()
        }
    }
}

/// Outcome of CheckTx, DeliverTx or a single payload execution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxResult {
    /// 0 on success.
    pub code: u32,
    /// Namespace of `code`.
    pub codespace: String,
    /// Arbitrary result data.
    pub data: Vec<u8>,
    /// Human-readable log.
    pub log: String,
    /// Additional information.
    pub info: String,
    /// Gas ceiling requested by the envelope.
    pub gas_wanted: u64,
    /// Gas actually consumed.
    pub gas_used: u64,
    /// Events emitted during execution.
    pub events: Vec<Event>,
}

impl TxResult {
    /// A successful empty result.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Successful result with data.
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }

    /// True if `code == 0`.
    pub fn is_ok(&self) -> bool {
        self.code == CodeType::Ok.as_u32()
    }
}

impl From<TxError> for TxResult {
    fn from(err: TxError) -> Self {
        err.result()
    }
}
