//! # rowcsv-core
//!
//! Core data structures shared by the rowcsv reader, writer and table layers.
//!
//! - [`FileFormat`] - Per-file conventions (separator, decimal separator, date format, ...)
//! - [`Column`] and [`ColumnType`] - Column descriptors in physical file order
//! - [`FieldValue`] - A typed, nullable field value
//!
//! ## Example
//!
//! ```rust
//! use rowcsv_core::{FileFormat, FieldValue};
//!
//! let format = FileFormat::builder()
//!     .separator(';')
//!     .decimal_separator(',')
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(format.separator(), ';');
//! assert_eq!(FieldValue::from(3.5).as_f64(), Some(3.5));
//! ```

pub mod column;
pub mod date_pattern;
pub mod error;
pub mod format;
pub mod value;

// Re-exports for convenience
pub use column::{Column, ColumnType};
pub use date_pattern::DatePattern;
pub use error::{Error, Result};
pub use format::{FileFormat, FileFormatBuilder, LineTerminator, ParseFailure};
pub use value::FieldValue;

/// The only quote character the CSV dialect recognizes
pub const QUOTE: char = '"';

/// Separator between the name and the type inside a typed header cell
pub const TYPED_HEADER_SEPARATOR: char = '|';
