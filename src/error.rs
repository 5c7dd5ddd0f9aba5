//! Error types for the portal core.

/// Top-level error type for the portal persistence core.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// Key-value storage read/write error (quota, corruption).
    #[error("storage error: {0}")]
    Storage(String),

    /// Record serialization error.
    #[error("serialize error: {0}")]
    Serialize(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, PortalError>;
