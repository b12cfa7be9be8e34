//! Errors raised by key parsing and signature checks.

use thiserror::Error;

/// Key and signature failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The signature does not match the message and key.
    #[error("signature does not verify")]
    SignatureVerificationFailed,

    /// The bytes are not a point on the curve.
    #[error("not a valid ed25519 public key")]
    InvalidPublicKey,

    /// Signature of the wrong size.
    #[error("signature must be 64 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// Key of the wrong size.
    #[error("key must be {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required length.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },
}
