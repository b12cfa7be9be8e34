//! # Wire Encoding
//!
//! Closed outer variant for envelopes; payloads are either the framework's
//! `QcpTxResult` or an application payload tagged for the codec registry.

use crate::itx::ITx;
use crate::qcp_result::QcpTxResult;
use crate::qcp_tx::TxQcp;
use crate::std_tx::{Signature, TxStd};
use qb_02_mapper::{Codec, CodecError};
use serde::{Deserialize, Serialize};
use shared_types::TxError;
use std::sync::Arc;

#[derive(Serialize, Deserialize)]
enum ItxWire {
    QcpResult(QcpTxResult),
    Registered { tag: String, bytes: Vec<u8> },
}

#[derive(Serialize, Deserialize)]
struct TxStdWire {
    itxs: Vec<ItxWire>,
    signatures: Vec<Signature>,
    chain_id: String,
    max_gas: i64,
}

#[derive(Serialize, Deserialize)]
struct TxQcpWire {
    tx_std: TxStdWire,
    from: String,
    to: String,
    sequence: u64,
    sig: Signature,
    block_height: u64,
    tx_index: i64,
    is_result: bool,
    extends: String,
}

#[derive(Serialize, Deserialize)]
enum TxWire {
    Std(TxStdWire),
    Qcp(TxQcpWire),
}

/// A decoded top-level transaction.
#[derive(Debug, Clone)]
pub enum Tx {
    /// Single-chain envelope.
    Std(TxStd),
    /// Cross-chain envelope.
    Qcp(TxQcp),
}

impl Tx {
    /// Encode for submission to CheckTx / DeliverTx.
    pub fn encode(&self, codec: &Codec) -> Result<Vec<u8>, CodecError> {
        let wire = match self {
            Tx::Std(tx) => TxWire::Std(std_to_wire(tx, codec)?),
            Tx::Qcp(tx) => TxWire::Qcp(qcp_to_wire(tx, codec)?),
        };
        codec.encode(&wire)
    }
}

impl TxStd {
    /// Encode as a top-level transaction.
    pub fn encode(&self, codec: &Codec) -> Result<Vec<u8>, CodecError> {
        Tx::Std(self.clone()).encode(codec)
    }
}

impl TxQcp {
    /// Encode as a top-level transaction.
    pub fn encode(&self, codec: &Codec) -> Result<Vec<u8>, CodecError> {
        Tx::Qcp(self.clone()).encode(codec)
    }

    /// Persistable form used by the outbound archive.
    pub fn to_bytes(&self, codec: &Codec) -> Result<Vec<u8>, CodecError> {
        self.encode(codec)
    }

    /// Decode bytes produced by `to_bytes`.
    pub fn from_bytes(codec: &Codec, bytes: &[u8]) -> Result<TxQcp, CodecError> {
        match codec.decode::<TxWire>(bytes)? {
            TxWire::Qcp(wire) => qcp_from_wire(wire, codec),
            TxWire::Std(_) => Err(CodecError::Decode("expected TxQcp, found TxStd".into())),
        }
    }
}

/// Decode transaction bytes. Any failure is a `TxDecode` error.
pub fn decode_tx(codec: &Codec, bytes: &[u8]) -> Result<Tx, TxError> {
    if bytes.is_empty() {
        return Err(TxError::TxDecode("empty tx bytes".into()));
    }
    let decoded = codec
        .decode::<TxWire>(bytes)
        .and_then(|wire| match wire {
            TxWire::Std(w) => std_from_wire(w, codec).map(Tx::Std),
            TxWire::Qcp(w) => qcp_from_wire(w, codec).map(Tx::Qcp),
        });
    decoded.map_err(|e| TxError::TxDecode(e.to_string()))
}

fn itx_to_wire(itx: &Arc<dyn ITx>, codec: &Codec) -> Result<ItxWire, CodecError> {
    if let Some(result) = itx.as_any().downcast_ref::<QcpTxResult>() {
        return Ok(ItxWire::QcpResult(result.clone()));
    }
    Ok(ItxWire::Registered {
        tag: itx.type_tag().to_string(),
        bytes: itx.encode(codec)?,
    })
}

fn itx_from_wire(wire: ItxWire, codec: &Codec) -> Result<Arc<dyn ITx>, CodecError> {
    match wire {
        ItxWire::QcpResult(result) => Ok(Arc::new(result)),
        ItxWire::Registered { tag, bytes } => codec.decode_interface::<dyn ITx>(&tag, &bytes),
    }
}

fn std_to_wire(tx: &TxStd, codec: &Codec) -> Result<TxStdWire, CodecError> {
    Ok(TxStdWire {
        itxs: tx
            .itxs
            .iter()
            .map(|itx| itx_to_wire(itx, codec))
            .collect::<Result<_, _>>()?,
        signatures: tx.signatures.clone(),
        chain_id: tx.chain_id.clone(),
        max_gas: tx.max_gas,
    })
}

fn std_from_wire(wire: TxStdWire, codec: &Codec) -> Result<TxStd, CodecError> {
    Ok(TxStd {
        itxs: wire
            .itxs
            .into_iter()
            .map(|w| itx_from_wire(w, codec))
            .collect::<Result<_, _>>()?,
        signatures: wire.signatures,
        chain_id: wire.chain_id,
        max_gas: wire.max_gas,
    })
}

fn qcp_to_wire(tx: &TxQcp, codec: &Codec) -> Result<TxQcpWire, CodecError> {
    Ok(TxQcpWire {
        tx_std: std_to_wire(&tx.tx_std, codec)?,
        from: tx.from.clone(),
        to: tx.to.clone(),
        sequence: tx.sequence,
        sig: tx.sig.clone(),
        block_height: tx.block_height,
        tx_index: tx.tx_index,
        is_result: tx.is_result,
        extends: tx.extends.clone(),
    })
}

fn qcp_from_wire(wire: TxQcpWire, codec: &Codec) -> Result<TxQcp, CodecError> {
    Ok(TxQcp {
        tx_std: std_from_wire(wire.tx_std, codec)?,
        from: wire.from,
        to: wire.to,
        sequence: wire.sequence,
        sig: wire.sig,
        block_height: wire.block_height,
        tx_index: wire.tx_index,
        is_result: wire.is_result,
        extends: wire.extends,
    })
}
