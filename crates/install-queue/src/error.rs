//! Install queue error types.

use burrow_catalog::CatalogError;
use burrow_store::StoreError;

/// Code surfaced to callers when the user cancelled or declined.
pub const CODE_OPERATION_ABORTED: i64 = 499;

/// Code surfaced to callers when no upload is installable on this platform.
pub const CODE_NO_COMPATIBLE_UPLOADS: i64 = 2001;

/// Errors produced while queueing an install.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("no compatible uploads found")]
    NoCompatibleUploads,

    #[error("operation aborted")]
    OperationAborted,

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("install preparation failed: {0}")]
    Prepare(String),

    #[error("download queue error: {0}")]
    Enqueue(String),

    #[error("fatal: {0}")]
    Fatal(String),
}

impl QueueError {
    /// Distinguished error code, if this error has one.
    pub fn code(&self) -> Option<i64> {
        match self {
            QueueError::OperationAborted => Some(CODE_OPERATION_ABORTED),
            QueueError::NoCompatibleUploads => Some(CODE_NO_COMPATIBLE_UPLOADS),
            _ => None,
        }
    }

    /// Whether the user declined rather than something breaking.
    pub fn is_aborted(&self) -> bool {
        matches!(self, QueueError::OperationAborted)
    }
}
