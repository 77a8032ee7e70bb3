use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the autoroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Every variant is fatal for the run. Per-route resolution failures are
/// reported through [`crate::ResolveError`] and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// Route document could not be located at the given path.
    #[error("route document not found at {path}")]
    DocumentNotFound { path: PathBuf },

    /// Route document was readable but not structurally valid.
    #[error("malformed route document {path}")]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Raised when serializing the rewritten document fails.
    #[error("failed to serialize route document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Raised when the rewritten document could not be moved into place.
    #[error("failed to persist route document to {path}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
