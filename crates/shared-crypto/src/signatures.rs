//! # Ed25519 Signatures
//!
//! Envelope signers and the trusted relayer key of each remote chain both
//! use Ed25519. An account address is the first 20 bytes of the SHA-256
//! digest of its public key.

use crate::hashing::sha256;
use crate::CryptoError;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_types::{Address, ADDRESS_LEN};
use std::fmt;
use zeroize::Zeroize;

/// Length of an encoded public key.
pub const PUBLIC_KEY_LEN: usize = 32;
/// Length of an encoded signature.
pub const SIGNATURE_LEN: usize = 64;

/// Ed25519 public key. Always a valid curve point.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519PublicKey([u8; PUBLIC_KEY_LEN]);

impl Ed25519PublicKey {
    /// Checked constructor.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Result<Self, CryptoError> {
        let key = Self(bytes);
        key.verifying_key()?;
        Ok(key)
    }

    /// Checked constructor from an untrusted slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes = <[u8; PUBLIC_KEY_LEN]>::try_from(bytes).map_err(|_| {
            CryptoError::InvalidKeyLength {
                expected: PUBLIC_KEY_LEN,
                actual: bytes.len(),
            }
        })?;
        Self::from_bytes(bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Account address owned by this key.
    pub fn address(&self) -> Address {
        let mut addr = [0u8; ADDRESS_LEN];
        addr.copy_from_slice(&sha256(&self.0)[..ADDRESS_LEN]);
        Address(addr)
    }

    fn verifying_key(&self) -> Result<VerifyingKey, CryptoError> {
        VerifyingKey::from_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Check `signature` over `message`.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        self.verifying_key()?
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }

    /// Like `verify`, for a signature still in wire form.
    pub fn verify_bytes(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        self.verify(message, &Ed25519Signature::from_slice(signature)?)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0[..4].iter().map(|b| format!("{b:02x}")).collect();
        write!(f, "Ed25519PublicKey({prefix}..)")
    }
}

/// Detached Ed25519 signature.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ed25519Signature(#[serde_as(as = "Bytes")] [u8; SIGNATURE_LEN]);

impl Ed25519Signature {
    /// Wrap raw bytes. Validity is only known at verification.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Fails unless `bytes` is exactly 64 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        <[u8; SIGNATURE_LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidSignatureLength(bytes.len()))
    }

    /// Raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Wire form, as stored in envelope signatures.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

/// Signing key with its public half. The secret is wiped on drop.
pub struct Ed25519KeyPair {
    secret: SigningKey,
}

impl Ed25519KeyPair {
    /// Fresh key from the thread RNG.
    pub fn generate() -> Self {
        Self {
            secret: SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    /// Deterministic key from a 32-byte seed. The caller's copy of the
    /// seed is consumed and wiped.
    pub fn from_seed(mut seed: [u8; 32]) -> Self {
        let secret = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Self { secret }
    }

    /// Public half.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.secret.verifying_key().to_bytes())
    }

    /// Address of the public half.
    pub fn address(&self) -> Address {
        self.public_key().address()
    }

    /// Deterministic signature over `message`.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.secret.sign(message).to_bytes())
    }

    /// Secret seed, for configuration round trips. Wipe it after use.
    pub fn to_seed(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }
}

impl fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
