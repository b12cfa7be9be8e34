//! Account types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_crypto::Ed25519PublicKey;
use shared_types::Address;
use std::fmt;

/// Fields every account carries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseAccount {
    /// Account address.
    pub address: Address,
    /// Key, learned from the first signed envelope.
    pub public_key: Option<Ed25519PublicKey>,
    /// Number of envelopes signed so far.
    pub nonce: u64,
}

impl BaseAccount {
    /// Fresh account for `address`.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }
}

/// An application account type embedding `BaseAccount`.
pub trait Account:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Fresh account with only the address set.
    fn with_address(address: Address) -> Self;

    /// Embedded base fields.
    fn base(&self) -> &BaseAccount;

    /// Embedded base fields, mutable.
    fn base_mut(&mut self) -> &mut BaseAccount;

    /// Account address.
    fn address(&self) -> Address {
        self.base().address
    }

    /// Stored key.
    fn public_key(&self) -> Option<Ed25519PublicKey> {
        self.base().public_key
    }

    /// Current nonce.
    fn nonce(&self) -> u64 {
        self.base().nonce
    }

    /// Replace the nonce.
    fn set_nonce(&mut self, nonce: u64) {
        self.base_mut().nonce = nonce;
    }

    /// Replace the key.
    fn set_public_key(&mut self, key: Ed25519PublicKey) {
        self.base_mut().public_key = Some(key);
    }
}

impl Account for BaseAccount {
    fn with_address(address: Address) -> Self {
        Self::new(address)
    }

    fn base(&self) -> &BaseAccount {
        self
    }

    fn base_mut(&mut self) -> &mut BaseAccount {
        self
    }
}
