//! Ports: the interface the consensus engine drives.

pub mod application;

pub use application::Application;
