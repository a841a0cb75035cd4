//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur during CSV operations
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (only raised under the strict parse failure policy)
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: u64,
        column: usize,
        message: String,
    },

    /// Infinite and NaN decimals have no text form the reader accepts
    #[error("Decimal in column {column} is not finite: {value}")]
    NonFinite { column: usize, value: f64 },

    /// No column with the requested name
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// The reader or writer was closed or never opened
    #[error("The CSV stream is not open")]
    NotOpen,

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] rowcsv_core::Error),
}
