//! # Node Runtime Library
//!
//! Exposes the node's modules for testing. The entry point is the
//! `main.rs` binary.
//!
//! - `container/` - configuration and application wiring
//! - `genesis/` - genesis file loading
//! - `kvstore/` - key/value demo application
//! - `runtime` - block driver

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod container;
pub mod genesis;
pub mod kvstore;
pub mod runtime;

pub use container::{build_app, NodeConfig};
pub use genesis::{GenesisConfig, GenesisError};
pub use kvstore::{KvMapper, KvStoreTx};
pub use runtime::{BlockOutcome, NodeRuntime};
