//! # Shared Types Crate
//!
//! Chain-wide primitives used by every QBase subsystem.
//!
//! ## Contents
//!
//! - **Entities**: `Address`, `BlockHeader`, `VoteInfo`, `ValidatorUpdate`,
//!   `ConsensusParams`, `Event`, `KvPair`
//! - **Results**: the stable ABCI `CodeType` taxonomy, `TxError` and `TxResult`
//! - **Gas**: the shared `GasMeter` handed to every execution context

pub mod entities;
pub mod errors;
pub mod gas;

pub use entities::*;
pub use errors::*;
pub use gas::{Gas, GasMeter};
