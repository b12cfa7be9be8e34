//! Business payload contract.

use crate::qcp_tx::TxQcp;
use qb_02_mapper::{Codec, CodecError};
use qb_03_context::Context;
use serde::de::DeserializeOwned;
use shared_types::{Address, Gas, TxError, TxResult};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Result of executing one payload.
#[derive(Debug, Clone, Default)]
pub struct ExecOutcome {
    /// Payload result; non-zero code fails the whole envelope.
    pub result: TxResult,
    /// Outbound cross-chain skeleton (destination and wrapped envelope).
    pub cross_tx: Option<TxQcp>,
}

impl ExecOutcome {
    /// Successful outcome with an empty result.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Outcome carrying `result`.
    pub fn with_result(result: TxResult) -> Self {
        Self {
            result,
            cross_tx: None,
        }
    }

    /// Attach an outbound cross-chain skeleton.
    pub fn with_cross_tx(mut self, tx: TxQcp) -> Self {
        self.cross_tx = Some(tx);
        self
    }
}

/// A business payload carried by `TxStd`.
pub trait ITx: Send + Sync + fmt::Debug + 'static {
    /// Codec tag the payload is registered under.
    fn type_tag(&self) -> &'static str;

    /// Stateless and read-only checks. Runs inside a disposable cache scope.
    fn validate_data(&self, ctx: &Context) -> Result<(), TxError>;

    /// Apply the payload against `ctx`.
    fn exec(&self, ctx: &Context) -> Result<ExecOutcome, TxError>;

    /// Addresses that must sign the envelope.
    fn signers(&self) -> Vec<Address>;

    /// Static gas charged before validation.
    fn calc_gas(&self) -> Gas;

    /// Account paying for gas.
    fn gas_payer(&self) -> Option<Address>;

    /// Bytes covered by the envelope signatures.
    fn sign_data(&self) -> Vec<u8>;

    /// Encode the concrete payload.
    fn encode(&self, codec: &Codec) -> Result<Vec<u8>, CodecError>;

    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Register an application payload so `decode_tx` can rebuild it from `tag`.
pub fn register_itx<T>(codec: &Codec, tag: &str) -> Result<(), CodecError>
where
    T: ITx + DeserializeOwned,
{
    codec.register_interface::<dyn ITx, _>(tag, |codec, bytes| {
        let itx: T = codec.decode(bytes)?;
        Ok(Arc::new(itx) as Arc<dyn ITx>)
    })
}
