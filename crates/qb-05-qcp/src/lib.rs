//! # QB-05 Cross-Chain Sequencing Protocol (QCP)
//!
//! **Subsystem ID:** 05
//!
//! ## Purpose
//!
//! Ordered, authenticated, at-most-once delivery of envelopes between two
//! independent ledgers.
//!
//! ## Per-Remote-Chain State
//!
//! | Key | Value |
//! |-----|-------|
//! | `sequence/out/<chain>` | highest sequence allocated towards `chain` |
//! | `tx/out/<chain>/<seq>` | archived outbound `TxQcp` |
//! | `sequence/in/<chain>` | highest sequence accepted from `chain` |
//! | `pubkey/in/<chain>` | trusted relayer key of `chain` |
//!
//! Entries default to zero/absent and are never deleted.
//!
//! ## Ordering Rules
//!
//! - Inbound: a delivery is accepted only with `sequence == in + 1`.
//! - Outbound: allocation is local; each saved message gets `out + 1`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod events;
pub mod genesis;
pub mod mapper;

pub use errors::QcpError;
pub use events::{
    gen_qcp_tx_hash, qcp_event, ATTRIBUTE_KEY_MODULE, EVENT_MODULE, EVENT_TYPE_MESSAGE, FROM,
    HASH, SEQUENCE, TO,
};
pub use genesis::{QcpConfig, QcpGenesis};
pub use mapper::{
    build_in_pubkey_key, build_in_sequence_key, build_out_sequence_key, build_out_tx_key,
    build_qcp_store_query_path, QcpMapper, QCP_MAPPER_NAME,
};
