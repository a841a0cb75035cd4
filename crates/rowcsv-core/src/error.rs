//! Error types for rowcsv-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building file conventions or column descriptors
#[derive(Debug, Error)]
pub enum Error {
    /// The field separator cannot be used to delimit fields
    #[error("Invalid field separator: {0:?}")]
    InvalidSeparator(char),

    /// The date format contains items chrono cannot format or parse
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    /// A typed header cell lacks the `Name|Type` shape
    #[error("Can't extract the column type from header cell: {0}")]
    MalformedHeader(String),
}
