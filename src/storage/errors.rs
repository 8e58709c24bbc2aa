//! Storage error types

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by an item store backend.
///
/// Handlers translate these into the operation-specific 500 responses; the
/// backend detail never reaches the caller.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Backend rejected or failed the call.
    #[error("storage backend failure: {0}")]
    Backend(String),

    /// Interior lock poisoned by a panicked writer.
    #[error("storage lock poisoned")]
    LockPoisoned,
}
