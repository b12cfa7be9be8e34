//! Integration scenarios.

pub mod lifecycle;
pub mod qcp_inbound;
pub mod qcp_outbound;
pub mod transfers;
