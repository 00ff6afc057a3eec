use thiserror::Error;

/// Errors that can arise while persisting or rehydrating LifeHUD state.
#[derive(Debug, Error)]
pub enum LifeHudError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around JSON serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 encoding error in a stored blob.
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Returned when a persisted blob carries an unexpected schema version.
    #[error("schema mismatch: expected {expected}, got {found}")]
    SchemaMismatch { expected: u32, found: u32 },

    /// The key-value collaborator refused the operation (quota, read-only, ...).
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}
