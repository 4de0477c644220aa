use thiserror::Error;

/// Errors that can occur during media storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested file or directory was not found.
    #[error("media not found: {0}")]
    NotFound(String),
    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The key does not describe a path inside the media root.
    #[error("invalid media key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },
    /// The upload exceeds the configured size limit.
    #[error("file exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}
