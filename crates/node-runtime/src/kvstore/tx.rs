//! The key/value payload.

use super::mapper::{KvMapper, KV_MAPPER_NAME};
use qb_02_mapper::{Codec, CodecError};
use qb_03_context::Context;
use qb_04_txs::{ExecOutcome, ITx};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Event, Gas, TxError, TxResult};
use std::any::Any;

/// Codec tag of `KvStoreTx`.
pub const KV_STORE_TX_TAG: &str = "kv/KvStoreTx";

/// Maximum key length in bytes.
const MAX_KEY_LEN: usize = 256;

/// Write `value` under `key`. Unsigned; the demo chain has no accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvStoreTx {
    /// Key, non-empty.
    pub key: String,
    /// Value.
    pub value: String,
}

impl KvStoreTx {
    /// Payload for `key=value`.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Split a `key=value` line at its first `=`. Whitespace around the key
    /// is ignored.
    pub fn parse(line: &str) -> Option<Self> {
        let (key, value) = line.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, value))
    }
}

impl ITx for KvStoreTx {
    fn type_tag(&self) -> &'static str {
        KV_STORE_TX_TAG
    }

    fn validate_data(&self, _ctx: &Context) -> Result<(), TxError> {
        if self.key.is_empty() {
            return Err(TxError::TxDecode("empty key".into()));
        }
        if self.key.len() > MAX_KEY_LEN {
            return Err(TxError::TxDecode(format!(
                "key longer than {MAX_KEY_LEN} bytes"
            )));
        }
        Ok(())
    }

    fn exec(&self, ctx: &Context) -> Result<ExecOutcome, TxError> {
        ctx.require_mapper::<KvMapper>(KV_MAPPER_NAME)?
            .set(&self.key, &self.value)?;
        let mut result = TxResult::ok();
        result
            .events
            .push(Event::new("kv").with_attribute("key", &self.key));
        Ok(ExecOutcome::with_result(result))
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
        let mut out = self.key.as_bytes().to_vec();
        out.push(b'=');
        out.extend_from_slice(self.value.as_bytes());
        out
    }

    fn encode(&self, codec: &Codec) -> Result<Vec<u8>, CodecError> {
        codec.encode(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
