//! # TxStd
//!
//! The single-chain envelope.

use crate::itx::ITx;
use crate::qcp_result::QcpTxResult;
use crate::{int_bytes, uint_bytes};
use serde::{Deserialize, Serialize};
use shared_crypto::{Ed25519KeyPair, Ed25519PublicKey};
use shared_types::{Address, Gas, TxError};
use qb_03_context::Context;
use std::sync::Arc;
use tracing::trace;

/// Context value key holding the verified signer addresses.
pub const SIGNERS_KEY: &str = "signers";

/// One signer's signature.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Signature {
    /// Optional when the account already stores its key.
    pub pubkey: Option<Ed25519PublicKey>,
    /// Ed25519 signature bytes.
    pub signature: Vec<u8>,
    /// Account nonce the signature commits to.
    pub nonce: u64,
}

/// Single-chain envelope.
#[derive(Debug, Clone)]
pub struct TxStd {
    /// Payloads, executed in order.
    pub itxs: Vec<Arc<dyn ITx>>,
    /// One signature per unique signer, in signer order.
    pub signatures: Vec<Signature>,
    /// Chain this envelope executes on.
    pub chain_id: String,
    /// Gas ceiling; must be non-negative.
    pub max_gas: i64,
}

impl TxStd {
    /// Unsigned envelope with one payload.
    pub fn new(itx: Arc<dyn ITx>, chain_id: impl Into<String>, max_gas: i64) -> Self {
        Self::with_itxs(vec![itx], chain_id, max_gas)
    }

    /// Unsigned envelope with several payloads.
    pub fn with_itxs(itxs: Vec<Arc<dyn ITx>>, chain_id: impl Into<String>, max_gas: i64) -> Self {
        Self {
            itxs,
            signatures: Vec::new(),
            chain_id: chain_id.into(),
            max_gas,
        }
    }

    /// Unique signers across all payloads, first-seen order.
    pub fn signers(&self) -> Vec<Address> {
        let mut out: Vec<Address> = Vec::new();
        for addr in self.itxs.iter().flat_map(|itx| itx.signers()) {
            if !out.contains(&addr) {
                out.push(addr);
            }
        }
        out
    }

    /// Sum of every payload's static gas.
    pub fn calc_gas(&self) -> Gas {
        self.itxs
            .iter()
            .fold(0, |acc: Gas, itx| acc.saturating_add(itx.calc_gas()))
    }

    /// Gas ceiling as an unsigned value (negative ceilings read as 0).
    pub fn gas_limit(&self) -> Gas {
        self.max_gas.max(0) as Gas
    }

    /// Payload sign bytes, chain id and gas ceiling.
    pub fn sign_data(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for itx in &self.itxs {
            out.extend(itx.sign_data());
        }
        out.extend_from_slice(self.chain_id.as_bytes());
        out.extend_from_slice(&int_bytes(self.max_gas));
        out
    }

    /// Bytes a signer with `nonce` signs. `from_chain_id` is the origin chain
    /// when the envelope arrived inside a `TxQcp`, empty otherwise.
    pub fn build_signature_bytes(&self, nonce: u64, from_chain_id: &str) -> Vec<u8> {
        let mut out = self.sign_data();
        out.extend_from_slice(&uint_bytes(nonce));
        out.extend_from_slice(from_chain_id.as_bytes());
        out
    }

    /// Sign for `nonce` and return the signature entry.
    pub fn sign_tx(&self, key: &Ed25519KeyPair, nonce: u64, from_chain_id: &str) -> Signature {
        let sig = key.sign(&self.build_signature_bytes(nonce, from_chain_id));
        Signature {
            pubkey: Some(key.public_key()),
            signature: sig.to_vec(),
            nonce,
        }
    }

    /// Sign for `nonce` and append the signature.
    pub fn add_signature(&mut self, key: &Ed25519KeyPair, nonce: u64, from_chain_id: &str) {
        let sig = self.sign_tx(key, nonce, from_chain_id);
        self.signatures.push(sig);
    }

    /// True when every payload is a `QcpTxResult`.
    pub fn is_qcp_result(&self) -> bool {
        !self.itxs.is_empty()
            && self
                .itxs
                .iter()
                .all(|itx| itx.as_any().downcast_ref::<QcpTxResult>().is_some())
    }

    /// True when any payload is a `QcpTxResult`.
    pub fn contains_qcp_result(&self) -> bool {
        self.itxs
            .iter()
            .any(|itx| itx.as_any().downcast_ref::<QcpTxResult>().is_some())
    }

    /// Structural checks against the chain executing `ctx`.
    ///
    /// Payload validation runs in a cache scope that is dropped afterwards.
    pub fn validate_basic_data(&self, ctx: &Context) -> Result<(), TxError> {
        if self.itxs.is_empty() {
            return Err(TxError::TxDecode("no itx in TxStd".into()));
        }
        if self.chain_id.is_empty() {
            return Err(TxError::TxDecode("no chain id in TxStd".into()));
        }
        if self.chain_id != ctx.chain_id() {
            return Err(TxError::TxDecode(format!(
                "chain id mismatch. expect: {}, actual: {}",
                ctx.chain_id(),
                self.chain_id
            )));
        }
        if self.max_gas < 0 {
            return Err(TxError::TxDecode(format!(
                "invalid max gas {} in TxStd",
                self.max_gas
            )));
        }

        let (scratch, _discard) = ctx.cache_context();
        for itx in &self.itxs {
            itx.validate_data(&scratch)?;
        }

        if self.is_qcp_result() {
            return Ok(());
        }
        let signers = self.signers();
        if signers.is_empty() {
            return Ok(());
        }
        if self.signatures.is_empty() {
            return Err(TxError::Unauthorized("no signatures".into()));
        }
        if self.signatures.len() != signers.len() {
            return Err(TxError::Unauthorized(format!(
                "signatures and signers not match. signatures: {}, signers: {}",
                self.signatures.len(),
                signers.len()
            )));
        }
        trace!(signers = signers.len(), "TxStd basic data valid");
        Ok(())
    }
}
