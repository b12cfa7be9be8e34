//! # QB-07 Validator & Consensus Namespaces
//!
//! **Subsystem ID:** 07
//!
//! Framework-owned namespaces the application runtime maintains around
//! block boundaries:
//!
//! | Namespace | Contents | Written by |
//! |-----------|----------|------------|
//! | `validator` | last proposer, pending validator updates, enable flag | BeginBlock, application logic |
//! | `consensus` | consensus parameters | InitChain |
//!
//! EndBlock reports the pending update set only while updates are enabled.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod consensus;
pub mod validator;

pub use consensus::{
    build_cons_key, build_cons_store_query_path, ConsensusMapper, CONSENSUS_MAPPER_NAME,
};
pub use validator::{ValidatorMapper, VALIDATOR_MAPPER_NAME};
