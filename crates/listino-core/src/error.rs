//! Error types for the listino-core library.

use thiserror::Error;

/// Main error type for the listino library.
#[derive(Error, Debug)]
pub enum ListinoError {
    /// Price history persistence error.
    #[error("history error: {0}")]
    History(#[from] HistoryError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the price history store.
///
/// Note that a missing or corrupt persisted collection is *not* an error:
/// the store opens as empty and logs a warning. These variants cover the
/// cases where the collaborator itself fails.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The key-value collaborator failed to read a key.
    #[error("failed to read key {key}: {reason}")]
    Read { key: String, reason: String },

    /// The key-value collaborator failed to write a key.
    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },

    /// Failed to serialize store contents.
    #[error("failed to serialize {0}")]
    Serialize(String),
}

/// Result type for the listino library.
pub type Result<T> = std::result::Result<T, ListinoError>;
