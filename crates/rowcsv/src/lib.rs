//! # rowcsv
//!
//! Streaming CSV reader and writer with typed columns.
//!
//! The reader is a forward-only row cursor: one logical line is assembled,
//! scanned and converted per [`CsvReader::read`] call, and values are read
//! by position or by column name.
//!
//! ```rust
//! use std::io::Cursor;
//! use rowcsv::{Column, ColumnType, CsvReader, FieldValue, FileFormat};
//!
//! let mut input = Cursor::new(b"name,age\nAlice,30\n".to_vec());
//! let columns = vec![Column::string("name"), Column::new("age", ColumnType::Integer)];
//!
//! let mut reader = CsvReader::new(FileFormat::default(), columns);
//! reader.open_stream(&mut input)?;
//! while reader.read()? {
//!     assert_eq!(reader.value_by_name("age")?, &FieldValue::Int(30));
//! }
//! # Ok::<(), rowcsv::CsvError>(())
//! ```

pub mod convert;
pub mod cursor;
pub mod error;
pub mod line;
pub mod progress;
pub mod reader;
pub mod scanner;
pub mod writer;

pub use convert::{FieldConverter, InvalidField};
pub use cursor::RowCursor;
pub use error::{CsvError, CsvResult};
pub use progress::{Progress, ProgressObserver, COPY_NOTIFY_AFTER, READ_NOTIFY_AFTER};
pub use reader::{CsvReader, ReaderState, StreamOwnership};
pub use writer::{quote_field, CsvWriter};

pub use rowcsv_core::{
    Column, ColumnType, DatePattern, FieldValue, FileFormat, FileFormatBuilder, LineTerminator,
    ParseFailure,
};
