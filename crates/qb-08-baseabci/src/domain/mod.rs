//! Domain layer: ABCI messages, hooks, configuration and errors.

pub mod abci;
pub mod config;
pub mod errors;
pub mod handlers;

pub use abci::*;
pub use config::AppConfig;
pub use errors::AppError;
pub use handlers::*;
