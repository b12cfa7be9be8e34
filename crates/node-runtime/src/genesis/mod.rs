//! # Genesis Module
//!
//! Genesis file loading and the InitChain request built from it.
//!
//! ```json
//! {
//!   "chain_id": "qbase-local",
//!   "genesis_time": 1700000000,
//!   "consensus_params": { "max_block_bytes": 22020096, "max_block_gas": -1 },
//!   "validators": [ { "pub_key": "<hex ed25519>", "power": 10 } ],
//!   "app_state": { "qcps": [] }
//! }
//! ```
//!
//! Every field is optional.

pub mod builder;

pub use builder::{GenesisConfig, GenesisError, GenesisValidator};
