//! Error types for the receipt-core library.

use thiserror::Error;

use crate::extract::rules::Field;

/// Main error type for the receipt library.
#[derive(Error, Debug)]
pub enum ReceiptError {
    /// Receipt database error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Per-field extraction misses.
///
/// None of these abort an extraction: the affected field is left absent and
/// the miss is logged and reported alongside the summary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The field's label never occurs in the document.
    #[error("could not find {0} label in document")]
    LabelNotFound(Field),

    /// The label was found but no amount could be parsed next to it.
    #[error("could not parse {field} amount from {text:?}")]
    AmountUnparsable { field: Field, text: String },

    /// No date-shaped text occurs in the document.
    #[error("could not find a date in document")]
    DateNotFound,

    /// A date-shaped substring failed calendar validation.
    #[error("could not parse date from {0:?}")]
    DateUnparsable(String),
}

/// Errors raised by receipt databases.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No receipt exists with the given ID.
    #[error("receipt {0} not found")]
    NotFound(i64),

    /// The database has been closed.
    #[error("database is closed")]
    Closed,

    /// A writer panicked while holding the database lock.
    #[error("database lock poisoned")]
    Poisoned,
}

/// Result type for the receipt library.
pub type Result<T> = std::result::Result<T, ReceiptError>;
