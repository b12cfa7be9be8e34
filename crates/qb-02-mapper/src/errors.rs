//! Mapper and codec errors.

use shared_types::TxError;
use thiserror::Error;

/// Encoding and decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Value could not be encoded.
    #[error("encode failed: {0}")]
    Encode(String),

    /// Bytes could not be decoded into the requested type.
    #[error("decode failed: {0}")]
    Decode(String),

    /// No decoder registered for this tag.
    #[error("no concrete type registered for tag {tag} of {interface}")]
    UnknownTag {
        /// Interface type name.
        interface: &'static str,
        /// Tag looked up.
        tag: String,
    },

    /// Tag registered twice for the same interface.
    #[error("tag {tag} already registered for {interface}")]
    DuplicateTag {
        /// Interface type name.
        interface: &'static str,
        /// Duplicated tag.
        tag: String,
    },
}

/// Errors raised by a mapper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapperError {
    /// Stored bytes could not be (de)serialized.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<CodecError> for TxError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Decode(_) | CodecError::UnknownTag { .. } => {
                TxError::TxDecode(err.to_string())
            }
            _ => TxError::Internal(err.to_string()),
        }
    }
}

impl From<MapperError> for TxError {
    fn from(err: MapperError) -> Self {
        TxError::Internal(err.to_string())
    }
}
