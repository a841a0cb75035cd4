//! # rowcsv-table
//!
//! In-memory tables on top of the rowcsv cursor: paged and filtered loading,
//! writing several tables to one file, and bulk copy from any row source.

pub mod copy;
pub mod error;
pub mod filter;
pub mod loader;
pub mod table;
pub mod writer;

pub use copy::{AsyncRowSource, CopyOutcome, CursorCopier};
pub use error::{TableError, TableResult};
pub use filter::{compare_values, Filter, FilterCondition, FilterSet};
pub use loader::{load_page, TableLoader};
pub use table::{Table, TableCursor};
pub use writer::TableWriter;
