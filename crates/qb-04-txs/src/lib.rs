//! # QB-04 Transaction Envelopes
//!
//! **Subsystem ID:** 04
//!
//! ## Envelopes
//!
//! | Type | Role |
//! |------|------|
//! | `TxStd` | One or more business payloads, one signature per unique signer, chain id, gas ceiling |
//! | `TxQcp` | One `TxStd` plus routing, sequence and a single relayer signature |
//! | `QcpTxResult` | Framework payload reporting the outcome of a delivered `TxQcp` |
//!
//! ## Wire Format
//!
//! `Tx` is a closed enum (`Std` / `Qcp`). Payloads are a closed variant for
//! `QcpTxResult` plus a tagged entry decoded through the codec registry for
//! application payloads registered with `register_itx`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod itx;
pub mod qcp_result;
pub mod qcp_tx;
pub mod std_tx;
pub mod wire;

pub use itx::{register_itx, ExecOutcome, ITx};
pub use qcp_result::{QcpResultHandler, QcpTxResult, QCP_RESULT_HANDLER_KEY};
pub use qcp_tx::TxQcp;
pub use std_tx::{Signature, TxStd, SIGNERS_KEY};
pub use wire::{decode_tx, Tx};

pub(crate) fn int_bytes(value: i64) -> [u8; 8] {
    value.to_be_bytes()
}

pub(crate) fn uint_bytes(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}
