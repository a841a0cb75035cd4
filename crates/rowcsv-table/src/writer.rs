//! Writing tables to CSV

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use rowcsv::{CsvWriter, FileFormat};

use crate::error::TableResult;
use crate::table::Table;

/// Writes one or more tables to the same CSV output
///
/// The header is written before the first table only.
#[derive(Debug)]
pub struct TableWriter<'s> {
    format: Arc<FileFormat>,
    writer: CsvWriter<'s>,
    header_written: bool,
}

impl<'s> TableWriter<'s> {
    pub fn new(format: impl Into<Arc<FileFormat>>) -> Self {
        let format = format.into();
        Self {
            writer: CsvWriter::new(Arc::clone(&format)),
            format,
            header_written: false,
        }
    }

    /// Create (or truncate) a file
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> TableResult<()> {
        self.writer.open(path)?;
        self.header_written = false;
        Ok(())
    }

    /// Write to a stream owned by the caller
    pub fn open_stream<W: Write>(&mut self, stream: &'s mut W) -> TableResult<()> {
        self.writer.open_stream(stream)?;
        self.header_written = false;
        Ok(())
    }

    /// Append the rows of a table
    pub fn save(&mut self, table: &Table) -> TableResult<()> {
        if self.format.with_header() && !self.header_written {
            self.writer.write_columns(table.columns())?;
            self.header_written = true;
        }

        for row in table.rows() {
            self.writer.write_typed_row(table.columns(), row)?;
        }

        tracing::debug!(rows = table.len(), "table saved");
        Ok(())
    }

    /// Number of data rows written so far
    pub fn rows_written(&self) -> u64 {
        self.writer.rows_written()
    }

    pub fn close(&mut self) -> TableResult<()> {
        self.writer.close()?;
        Ok(())
    }
}
