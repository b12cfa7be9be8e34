//! # QcpMapper
//!
//! Durable per-remote-chain sequencing state.

use crate::errors::QcpError;
use qb_01_store::{KvStore, StoreKey};
use qb_02_mapper::{BaseMapper, Codec, Mapper, MapperError};
use qb_04_txs::TxQcp;
use shared_crypto::{Ed25519KeyPair, Ed25519PublicKey};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, warn};

/// Registry and sub-store name.
pub const QCP_MAPPER_NAME: &str = "qcp";

const OUT_SEQUENCE_PREFIX: &str = "sequence/out/";
const OUT_TX_PREFIX: &str = "tx/out/";
const IN_SEQUENCE_PREFIX: &str = "sequence/in/";
const IN_PUBKEY_PREFIX: &str = "pubkey/in/";

/// `sequence/out/<chain>`
pub fn build_out_sequence_key(out_chain: &str) -> Vec<u8> {
    format!("{OUT_SEQUENCE_PREFIX}{out_chain}").into_bytes()
}

/// `tx/out/<chain>/<sequence>`
pub fn build_out_tx_key(out_chain: &str, sequence: u64) -> Vec<u8> {
    format!("{OUT_TX_PREFIX}{out_chain}/{sequence}").into_bytes()
}

/// `sequence/in/<chain>`
pub fn build_in_sequence_key(in_chain: &str) -> Vec<u8> {
    format!("{IN_SEQUENCE_PREFIX}{in_chain}").into_bytes()
}

/// `pubkey/in/<chain>`
pub fn build_in_pubkey_key(in_chain: &str) -> Vec<u8> {
    format!("{IN_PUBKEY_PREFIX}{in_chain}").into_bytes()
}

/// Store query path for QCP keys.
pub fn build_qcp_store_query_path() -> String {
    format!("/store/{QCP_MAPPER_NAME}/key")
}

/// Mapper over the `qcp` namespace.
#[derive(Debug, Clone)]
pub struct QcpMapper {
    base: BaseMapper,
}

impl QcpMapper {
    /// Unbound mapper.
    pub fn new(codec: Arc<Codec>) -> Self {
        Self {
            base: BaseMapper::new(QCP_MAPPER_NAME, codec),
        }
    }

    fn read_sequence(&self, key: &[u8]) -> Result<u64, MapperError> {
        Ok(self.base.get::<u64>(key)?.unwrap_or(0))
    }

    /// Highest sequence allocated towards `out_chain`.
    pub fn get_max_chain_out_sequence(&self, out_chain: &str) -> Result<u64, MapperError> {
        self.read_sequence(&build_out_sequence_key(out_chain))
    }

    /// Overwrite the outbound counter.
    pub fn set_max_chain_out_sequence(&self, out_chain: &str, sequence: u64) -> Result<(), MapperError> {
        self.base.set(&build_out_sequence_key(out_chain), &sequence)
    }

    /// Highest sequence accepted from `in_chain`.
    pub fn get_max_chain_in_sequence(&self, in_chain: &str) -> Result<u64, MapperError> {
        self.read_sequence(&build_in_sequence_key(in_chain))
    }

    /// Overwrite the inbound counter.
    pub fn set_max_chain_in_sequence(&self, in_chain: &str, sequence: u64) -> Result<(), MapperError> {
        self.base.set(&build_in_sequence_key(in_chain), &sequence)
    }

    /// Trusted relayer key of `in_chain`.
    pub fn get_chain_in_trust_pubkey(
        &self,
        in_chain: &str,
    ) -> Result<Option<Ed25519PublicKey>, MapperError> {
        self.base.get(&build_in_pubkey_key(in_chain))
    }

    /// Register the trusted relayer key of `in_chain`. Genesis/admin only.
    pub fn set_chain_in_trust_pubkey(
        &self,
        in_chain: &str,
        pubkey: &Ed25519PublicKey,
    ) -> Result<(), MapperError> {
        self.base.set(&build_in_pubkey_key(in_chain), pubkey)
    }

    /// Archived outbound message.
    pub fn get_chain_out_tx(&self, out_chain: &str, sequence: u64) -> Result<Option<TxQcp>, MapperError> {
        match self.base.get_bytes(&build_out_tx_key(out_chain, sequence)) {
            Some(bytes) => Ok(Some(TxQcp::from_bytes(self.base.codec(), &bytes)?)),
            None => Ok(None),
        }
    }

    /// Archive an outbound message.
    pub fn set_chain_out_tx(&self, out_chain: &str, sequence: u64, tx: &TxQcp) -> Result<(), MapperError> {
        let bytes: Vec<u8> = tx.to_bytes(self.base.codec()).map_err(MapperError::from)?;
        self.base.set_bytes(&build_out_tx_key(out_chain, sequence), bytes);
        Ok(())
    }

    /// Outbound counters of every remote chain.
    pub fn out_sequences(&self) -> Result<Vec<(String, u64)>, MapperError> {
        self.sequences(OUT_SEQUENCE_PREFIX)
    }

    /// Inbound counters of every remote chain.
    pub fn in_sequences(&self) -> Result<Vec<(String, u64)>, MapperError> {
        self.sequences(IN_SEQUENCE_PREFIX)
    }

    fn sequences(&self, prefix: &str) -> Result<Vec<(String, u64)>, MapperError> {
        Ok(self
            .base
            .iterate_prefix::<u64>(prefix.as_bytes())?
            .into_iter()
            .map(|(k, v)| {
                let chain = String::from_utf8_lossy(&k[prefix.len()..]).into_owned();
                (chain, v)
            })
            .collect())
    }

    /// Allocate the next outbound sequence for `tx.to`, sign with `signer`
    /// if present, and archive the message. Returns the stored message.
    pub fn sign_and_save_tx_qcp(
        &self,
        mut tx: TxQcp,
        signer: Option<&Ed25519KeyPair>,
    ) -> Result<TxQcp, QcpError> {
        let sequence = self.get_max_chain_out_sequence(&tx.to)? + 1;
        tx.sequence = sequence;
        match signer {
            Some(key) => tx.sign(key),
            None => warn!(to = %tx.to, sequence, "saving unsigned TxQcp"),
        }
        self.set_max_chain_out_sequence(&tx.to, sequence)?;
        self.set_chain_out_tx(&tx.to, sequence, &tx)?;
        debug!(to = %tx.to, sequence, is_result = tx.is_result, "outbound TxQcp saved");
        Ok(tx)
    }
}

impl Mapper for QcpMapper {
    fn name(&self) -> &str {
        QCP_MAPPER_NAME
    }

    fn store_key(&self) -> StoreKey {
        self.base.store_key()
    }

    fn bind(&self, store: Arc<dyn KvStore>) -> Arc<dyn Mapper> {
        Arc::new(Self {
            base: self.base.bound(store),
        })
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
