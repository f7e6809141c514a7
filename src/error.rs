//! Error types for the reader controller

use thiserror::Error;

/// Result type alias for reader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while presenting an entry
#[derive(Error, Debug)]
pub enum Error {
    /// The rendering surface refused or failed to load a document
    #[error("Failed to load document: {0}")]
    LoadError(String),

    /// A script sent to the rendering surface failed
    #[error("Script execution failed: {0}")]
    ScriptError(String),

    /// The durable entry store rejected an operation
    #[error("Entry store error: {0}")]
    StoreError(String),

    /// No entry with the given identifier exists in the store
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The persistence worker has shut down
    #[error("Persistence worker is gone: {0}")]
    WorkerGone(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
