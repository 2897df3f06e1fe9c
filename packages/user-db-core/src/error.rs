//! Store error types.

use thiserror::Error;

/// Store operation errors.
///
/// A missing row is not an error here; lookups return `Option` and
/// mutations by id return `bool`.
#[derive(Error, Debug, Clone)]
pub enum DbError {
    /// Lock poisoned (RwLock poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Data corruption detected
    #[error("Data corruption detected: {0}")]
    DataCorruption(String),

    /// Id counter cannot advance
    #[error("Id space exhausted for table '{table}'")]
    IdSpaceExhausted { table: &'static str },

    /// Disk full error during persistence
    #[error("Disk full: {0}")]
    DiskFull(String),

    /// I/O error during persistence
    #[error("I/O error: {0}")]
    IoError(String),

    /// Transient I/O error that may succeed on retry
    #[error("Transient I/O error: {0}")]
    TransientIoError(String),
}
