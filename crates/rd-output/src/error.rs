//! Error types for rd-output.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Well-formed CSV whose contents violate a table invariant.
    #[error("invalid {table} data: {reason}")]
    Invalid { table: &'static str, reason: String },

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl OutputError {
    pub(crate) fn invalid(table: &'static str, reason: impl ToString) -> Self {
        OutputError::Invalid { table, reason: reason.to_string() }
    }
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
