//! # QcpTxResult
//!
//! Bookkeeping payload that reports the outcome of a delivered `TxQcp` back
//! to its origin chain. It has no signers and is only accepted inside a
//! result-notification `TxQcp`.

use crate::itx::{ExecOutcome, ITx};
use crate::uint_bytes;
use qb_02_mapper::{Codec, CodecError};
use qb_03_context::Context;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Gas, KvPair, TxError, TxResult};
use std::any::Any;
use std::sync::Arc;

/// Context value key holding the application's result handler.
pub const QCP_RESULT_HANDLER_KEY: &str = "qcp_result_handler";

/// Application callback run when a result notification is delivered.
pub type QcpResultHandler = Arc<dyn Fn(&Context, &QcpTxResult) -> TxResult + Send + Sync>;

/// Outcome of a cross-chain envelope, sent back to its origin chain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QcpTxResult {
    /// Result code of the original delivery.
    pub code: u32,
    /// Extension attributes.
    pub extends: Vec<KvPair>,
    /// Gas the original delivery used.
    pub gas_used: u64,
    /// Sequence of the `TxQcp` this answers.
    pub qcp_original_sequence: u64,
    /// `extends` of the `TxQcp` this answers.
    pub qcp_original_extends: String,
    /// Free-text information.
    pub info: String,
}

impl QcpTxResult {
    /// Build from the result of delivering the `TxQcp` with `sequence`.
    pub fn from_result(result: &TxResult, sequence: u64, original_extends: &str) -> Self {
        let extends = result
            .events
            .iter()
            .flat_map(|e| e.attributes.iter().cloned())
            .collect();
        Self {
            code: result.code,
            extends,
            gas_used: result.gas_used,
            qcp_original_sequence: sequence,
            qcp_original_extends: original_extends.to_string(),
            info: result.log.clone(),
        }
    }

    /// True if the original delivery succeeded.
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

impl ITx for QcpTxResult {
    fn type_tag(&self) -> &'static str {
        "qbase/txs/QcpTxResult"
    }

    fn validate_data(&self, _ctx: &Context) -> Result<(), TxError> {
        if self.qcp_original_sequence == 0 {
            return Err(TxError::TxDecode(
                "QcpTxResult original sequence must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    fn exec(&self, ctx: &Context) -> Result<ExecOutcome, TxError> {
        let handler = ctx
            .value::<QcpResultHandler>(QCP_RESULT_HANDLER_KEY)
            .ok_or_else(|| TxError::Internal("QcpResultHandler not set".into()))?;
        Ok(ExecOutcome::with_result(handler(ctx, self)))
    }

    fn signers(&self) -> Vec<Address> {
        Vec::new()
    }

    fn calc_gas(&self) -> Gas {
        0
    }

    fn gas_payer(&self) -> Option<Address> {
        None
    }

    fn sign_data(&self) -> Vec<u8> {
        let mut out = uint_bytes(u64::from(self.code)).to_vec();
        for kv in &self.extends {
            out.extend_from_slice(&kv.key);
            out.extend_from_slice(&kv.value);
        }
        out.extend_from_slice(&uint_bytes(self.gas_used));
        out.extend_from_slice(&uint_bytes(self.qcp_original_sequence));
        out.extend_from_slice(self.qcp_original_extends.as_bytes());
        out.extend_from_slice(self.info.as_bytes());
        out
    }

    fn encode(&self, codec: &Codec) -> Result<Vec<u8>, CodecError> {
        codec.encode(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
