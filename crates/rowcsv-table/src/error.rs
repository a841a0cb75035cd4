//! Table error types

use rowcsv::CsvError;
use thiserror::Error;

/// Result type for table operations
pub type TableResult<T> = std::result::Result<T, TableError>;

/// Errors that can occur while loading, writing or copying tables
#[derive(Debug, Error)]
pub enum TableError {
    /// Error from the underlying reader or writer
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Page numbers start at 1 and pages hold at least one row
    #[error("Invalid page request: page {page}, {rows_per_page} rows per page")]
    InvalidPage { page: usize, rows_per_page: usize },

    /// A row does not match the table width
    #[error("Row has {actual} values but the table has {expected} columns")]
    RowWidth { expected: usize, actual: usize },

    /// Failure reported by an asynchronous row source
    #[error("Row source error: {0}")]
    Source(String),
}

impl From<std::io::Error> for TableError {
    fn from(e: std::io::Error) -> Self {
        TableError::Csv(CsvError::Io(e))
    }
}
