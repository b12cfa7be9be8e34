use thiserror::Error;

/// Errors raised by the store contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No sub-store is mounted under this name.
    #[error("Unknown store: {0}")]
    UnknownStore(String),

    /// The sub-store was mounted twice.
    #[error("Store already mounted: {0}")]
    DuplicateStore(String),

    /// The requested version was never committed.
    #[error("Version not found: {0}")]
    VersionNotFound(u64),

    /// Query path does not match `/<store>/key` or `/<store>/subspace`.
    #[error("Invalid query path: {0}")]
    InvalidPath(String),

    /// Encoding a query response failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
