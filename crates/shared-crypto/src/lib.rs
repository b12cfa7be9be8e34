//! # Shared Crypto
//!
//! Primitives used to authenticate transactions and cross-chain messages.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 | Message digests, QCP hashes, commit hashes |
//! | `signatures` | Ed25519 | Envelope signatures, trusted relayer keys |
//!
//! Addresses are the first 20 bytes of the SHA-256 digest of a public key.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{sha256, Sha256Hasher};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
