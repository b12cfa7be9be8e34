//! Store domain types.

mod entities;
mod errors;

pub use entities::*;
pub use errors::StoreError;
