use thiserror::Error;

use crate::processing::validate::Violation;

/// Convenience result type for loading and cleaning operations.
pub type CleaningResult<T> = Result<T, CleaningError>;

/// Error type returned by loading, cleaning and export functions.
///
/// Cell-level parse problems during numeric coercion are *not* reported here: coercion absorbs
/// them by writing [`crate::types::Value::Null`]. Everything in this enum is fatal to the step
/// that produced it.
#[derive(Debug, Error)]
pub enum CleaningError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text reader/writer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Cleaning plan (de)serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A referenced column does not exist, a column name would be duplicated, or a column has
    /// the wrong declared type for an operation.
    #[error("schema error: {message}")]
    SchemaError { message: String },

    /// A value could not be parsed into the declared [`crate::types::DataType`] while loading.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// A compound value does not match its `<left><sep><right>` pattern.
    #[error("malformed value at row {row} column '{column}': {message} (value='{value}')")]
    FormatError {
        row: usize,
        column: String,
        value: String,
        message: String,
    },

    /// Post-cleaning invariants do not hold.
    #[error(
        "{} invariant violation(s); first: {}",
        .violations.len(),
        first_violation(.violations)
    )]
    InvariantViolation { violations: Vec<Violation> },
}

impl CleaningError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::SchemaError {
            message: message.into(),
        }
    }
}

fn first_violation(violations: &[Violation]) -> String {
    violations
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}
