//! # TxQcp
//!
//! The cross-chain envelope. Its signature covers a digest of the wrapped
//! envelope plus routing, sequence, origin position, result flag and
//! extension text.

use crate::std_tx::{Signature, TxStd};
use crate::{int_bytes, uint_bytes};
use shared_crypto::{sha256, Ed25519KeyPair, Ed25519PublicKey};
use shared_types::TxError;

/// Cross-chain envelope.
#[derive(Debug, Clone)]
pub struct TxQcp {
    /// Wrapped single-chain envelope.
    pub tx_std: TxStd,
    /// Origin chain.
    pub from: String,
    /// Destination chain.
    pub to: String,
    /// Per-destination sequence assigned by the origin chain.
    pub sequence: u64,
    /// Relayer signature.
    pub sig: Signature,
    /// Origin block height.
    pub block_height: u64,
    /// Origin transaction index within the block.
    pub tx_index: i64,
    /// True if this envelope is a result notification.
    pub is_result: bool,
    /// Free-text extension echoed in the result.
    pub extends: String,
}

impl TxQcp {
    /// Skeleton returned by a payload: only destination and wrapped envelope
    /// are set; the sequencing layer fills in the rest.
    pub fn skeleton(to: impl Into<String>, tx_std: TxStd) -> Self {
        Self {
            tx_std,
            from: String::new(),
            to: to.into(),
            sequence: 0,
            sig: Signature::default(),
            block_height: 0,
            tx_index: 0,
            is_result: false,
            extends: String::new(),
        }
    }

    /// Attach extension text.
    pub fn with_extends(mut self, extends: impl Into<String>) -> Self {
        self.extends = extends.into();
        self
    }

    /// Bytes covered by the relayer signature.
    pub fn sign_data(&self) -> Vec<u8> {
        let mut out = sha256(&self.tx_std.sign_data()).to_vec();
        out.extend_from_slice(self.from.as_bytes());
        out.extend_from_slice(self.to.as_bytes());
        out.extend_from_slice(&uint_bytes(self.sequence));
        out.extend_from_slice(&uint_bytes(self.block_height));
        out.extend_from_slice(&int_bytes(self.tx_index));
        out.push(u8::from(self.is_result));
        out.extend_from_slice(self.extends.as_bytes());
        out
    }

    /// Sign with the relayer key. The signature nonce is unused.
    pub fn sign(&mut self, key: &Ed25519KeyPair) {
        let sig = key.sign(&self.sign_data());
        self.sig = Signature {
            pubkey: Some(key.public_key()),
            signature: sig.to_vec(),
            nonce: 0,
        };
    }

    /// Structural checks against the chain executing the envelope.
    pub fn validate_basic_data(&self, current_chain_id: &str) -> Result<(), TxError> {
        if self.from.is_empty() || self.to.is_empty() || self.sequence == 0 {
            return Err(TxError::TxDecode(
                "TxQcp requires from, to and a non-zero sequence".into(),
            ));
        }
        if self.sig.signature.is_empty() {
            return Err(TxError::TxDecode("TxQcp is not signed".into()));
        }
        if self.to != current_chain_id {
            return Err(TxError::TxDecode(format!(
                "TxQcp destination {} does not match current chain {}",
                self.to, current_chain_id
            )));
        }
        Ok(())
    }

    /// Verify the relayer signature against the trusted key of `from`.
    pub fn verify_signature(&self, trusted: &Ed25519PublicKey) -> Result<(), TxError> {
        let pubkey = self
            .sig
            .pubkey
            .as_ref()
            .ok_or_else(|| TxError::InvalidPubKey("TxQcp signature carries no pubkey".into()))?;
        if pubkey != trusted {
            return Err(TxError::InvalidPubKey(format!(
                "TxQcp pubkey is not the trusted key of chain {}",
                self.from
            )));
        }
        pubkey
            .verify_bytes(&self.sign_data(), &self.sig.signature)
            .map_err(|_| TxError::Unauthorized("TxQcp signature verification failed".into()))
    }
}
