//! Notes namespace and the payloads writing to it.

use qb_01_store::{KvStore, StoreKey};
use qb_02_mapper::{BaseMapper, Codec, CodecError, Mapper, MapperError};
use qb_03_context::Context;
use qb_04_txs::{ExecOutcome, ITx, TxQcp, TxStd};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Event, Gas, TxError, TxResult};
use std::any::Any;
use std::sync::Arc;

pub const NOTES_MAPPER_NAME: &str = "note";

/// String notes keyed by name.
#[derive(Debug, Clone)]
pub struct NotesMapper {
    base: BaseMapper,
}

impl NotesMapper {
    pub fn new(codec: Arc<Codec>) -> Self {
        Self {
            base: BaseMapper::new(NOTES_MAPPER_NAME, codec),
        }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, MapperError> {
        self.base.get(key.as_bytes())
    }

    pub fn set(&self, key: &str, text: &str) -> Result<(), MapperError> {
        self.base.set(key.as_bytes(), text)
    }
}

impl Mapper for NotesMapper {
    fn name(&self) -> &str {
        NOTES_MAPPER_NAME
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

/// Write `text` under `key`. Unsigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTx {
    pub key: String,
    pub text: String,
    /// Fail during execution, after validation passed.
    pub reject: bool,
}

impl NoteTx {
    pub fn new(key: &str, text: &str) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            reject: false,
        }
    }

    pub fn rejecting(key: &str) -> Self {
        Self {
            reject: true,
            ..Self::new(key, "rejected")
        }
    }
}

impl ITx for NoteTx {
    fn type_tag(&self) -> &'static str {
        "test/NoteTx"
    }

    fn validate_data(&self, _ctx: &Context) -> Result<(), TxError> {
        if self.key.is_empty() {
            return Err(TxError::TxDecode("empty note key".into()));
        }
        Ok(())
    }

    fn exec(&self, ctx: &Context) -> Result<ExecOutcome, TxError> {
        ctx.require_mapper::<NotesMapper>(NOTES_MAPPER_NAME)?
            .set(&self.key, &self.text)?;
        if self.reject {
            return Err(TxError::Unauthorized(format!("note {} rejected", self.key)));
        }
        let mut result = TxResult::ok();
        result
            .events
            .push(Event::new("note").with_attribute("key", &self.key));
        Ok(ExecOutcome::with_result(result))
    }

    fn signers(&self) -> Vec<Address> {
        Vec::new()
    }

    fn calc_gas(&self) -> Gas {
        1
    }

    fn gas_payer(&self) -> Option<Address> {
        None
    }

    fn sign_data(&self) -> Vec<u8> {
        let mut out = self.key.as_bytes().to_vec();
        out.extend_from_slice(self.text.as_bytes());
        out.push(u8::from(self.reject));
        out
    }

    fn encode(&self, codec: &Codec) -> Result<Vec<u8>, CodecError> {
        codec.encode(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Send a note to `to_chain` as an outbound cross-chain message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTx {
    pub to_chain: String,
    pub note: NoteTx,
}

impl SendTx {
    pub fn new(to_chain: &str, key: &str, text: &str) -> Self {
        Self {
            to_chain: to_chain.into(),
            note: NoteTx::new(key, text),
        }
    }
}

impl ITx for SendTx {
    fn type_tag(&self) -> &'static str {
        "test/SendTx"
    }

    fn validate_data(&self, ctx: &Context) -> Result<(), TxError> {
        if self.to_chain.is_empty() || self.to_chain == ctx.chain_id() {
            return Err(TxError::TxDecode("invalid destination chain".into()));
        }
        self.note.validate_data(ctx)
    }

    fn exec(&self, _ctx: &Context) -> Result<ExecOutcome, TxError> {
        let remote = TxStd::new(Arc::new(self.note.clone()), self.to_chain.clone(), 0);
        Ok(ExecOutcome::ok().with_cross_tx(TxQcp::skeleton(self.to_chain.clone(), remote)))
    }

    fn signers(&self) -> Vec<Address> {
        Vec::new()
    }

    fn calc_gas(&self) -> Gas {
        1
    }

    fn gas_payer(&self) -> Option<Address> {
        None
    }

    fn sign_data(&self) -> Vec<u8> {
        let mut out = self.to_chain.as_bytes().to_vec();
        out.extend_from_slice(&self.note.sign_data());
        out
    }

    fn encode(&self, codec: &Codec) -> Result<Vec<u8>, CodecError> {
        codec.encode(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
