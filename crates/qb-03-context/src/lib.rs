//! # QB-03 Context
//!
//! The request-scoped carrier handed to every validation and execution step.
//!
//! ## Properties
//!
//! - A `Context` is immutable: every `with_*` call returns a new value and
//!   appends one record to the mutation log shared by all contexts derived
//!   from the same root.
//! - Changing the store snapshot or the gas meter rebinds every registered
//!   mapper. Bound mappers see the context's store through a gas-metered
//!   wrapper.
//! - `cache_context` opens a child scope whose writes reach the parent only
//!   when the returned closure is called.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod mutation_log;

pub use context::{Context, MapperRegistry};
pub use mutation_log::{ContextOp, MutationLog, MutationRecord};
