//! # QB-02 Mapper
//!
//! Typed access to the key/value stores.
//!
//! - `Codec`: bincode for concrete types plus a tag registry that decodes
//!   polymorphic values (trait objects) registered by the application.
//! - `Mapper`: a named namespace bound to one sub-store. `bind` returns a
//!   fresh copy over a new store handle; a mapper is never shared between
//!   snapshots.
//! - `BaseMapper`: the get/set/del/iterate building block every concrete
//!   mapper wraps.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod base;
pub mod codec;
pub mod errors;

pub use base::{BaseMapper, Mapper};
pub use codec::Codec;
pub use errors::{CodecError, MapperError};
