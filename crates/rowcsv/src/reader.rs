//! CSV reader
//!
//! [`CsvReader`] is a forward-only row cursor. Each call to
//! [`read`](CsvReader::read) assembles one logical line, scans its fields and
//! converts them into the row buffer, which stays aligned 1:1 with the column
//! descriptors.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use chrono::NaiveDateTime;
use rowcsv_core::{Column, ColumnType, FieldValue, FileFormat};

use crate::convert::FieldConverter;
use crate::cursor::RowCursor;
use crate::error::{CsvError, CsvResult};
use crate::line::LineAssembler;
use crate::progress::{Progress, ProgressObserver, READ_NOTIFY_AFTER};
use crate::scanner::{normalize_field, scan_field, split_fields};

static NULL_VALUE: FieldValue = FieldValue::Null;

/// Lifecycle of a reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// No stream bound
    Closed,
    /// Stream bound, header not consumed yet
    HeaderPending,
    /// Rows are being read
    Streaming,
    /// The stream has no more rows
    Exhausted,
}

/// Who is responsible for closing a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOwnership {
    /// Opened by the reader/writer itself from a path
    Owned,
    /// Handed in by the caller, never closed by us
    Borrowed,
}

type Source<'s> = LineAssembler<Box<dyn BufRead + 's>>;

/// CSV row cursor
pub struct CsvReader<'s> {
    format: Arc<FileFormat>,
    columns: Vec<Column>,
    ordinals: AHashMap<String, usize>,
    values: Vec<FieldValue>,
    source: Option<Source<'s>>,
    ownership: StreamOwnership,
    state: ReaderState,
    row: u64,
    progress: Progress<'s>,
}

impl<'s> CsvReader<'s> {
    /// Create a reader; `columns` may be empty to take them from the header
    pub fn new(format: impl Into<Arc<FileFormat>>, columns: Vec<Column>) -> Self {
        let mut reader = Self {
            format: format.into(),
            columns: Vec::new(),
            ordinals: AHashMap::new(),
            values: Vec::new(),
            source: None,
            ownership: StreamOwnership::Borrowed,
            state: ReaderState::Closed,
            row: 0,
            progress: Progress::new(READ_NOTIFY_AFTER),
        };
        reader.set_columns(columns);
        reader
    }

    /// Set how many rows pass between progress notifications (0 disables them)
    pub fn with_notify_after(mut self, notify_after: u64) -> Self {
        self.progress.set_notify_after(notify_after);
        self
    }

    /// Attach a progress observer
    pub fn with_progress<O: ProgressObserver + 's>(mut self, observer: O) -> Self {
        self.progress.set_observer(observer);
        self
    }

    /// Open a file; the reader owns and closes the handle
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> CsvResult<()> {
        let path = path.as_ref();
        let file = File::open(path)?;
        tracing::debug!(path = %path.display(), "opened CSV file");
        self.bind(Box::new(BufReader::new(file)), StreamOwnership::Owned)
    }

    /// Read from a stream the caller keeps ownership of
    pub fn open_stream<R: BufRead>(&mut self, stream: &'s mut R) -> CsvResult<()> {
        self.bind(Box::new(stream), StreamOwnership::Borrowed)
    }

    fn bind(&mut self, stream: Box<dyn BufRead + 's>, ownership: StreamOwnership) -> CsvResult<()> {
        self.close();
        self.source = Some(LineAssembler::new(stream));
        self.ownership = ownership;
        self.state = ReaderState::HeaderPending;
        self.row = 0;
        if let Err(e) = self.read_header() {
            self.close();
            return Err(e);
        }
        self.state = ReaderState::Streaming;
        Ok(())
    }

    /// Consume the header line when the format has one
    fn read_header(&mut self) -> CsvResult<()> {
        if !self.format.with_header() {
            return Ok(());
        }

        let Some(source) = self.source.as_mut() else {
            return Err(CsvError::NotOpen);
        };
        let Some(line) = source.next_logical_line()? else {
            return Ok(());
        };

        if !self.columns.is_empty() {
            tracing::debug!("header skipped, columns supplied by the caller");
            return Ok(());
        }

        let mut columns = Vec::new();
        for field in split_fields(&line, self.format.separator()) {
            let name = normalize_field(field);
            let column = if self.format.typed_header() {
                Column::parse_typed(&name)?
            } else {
                Column::string(name)
            };
            columns.push(column);
        }

        tracing::debug!(columns = columns.len(), "header parsed");
        self.set_columns(columns);
        Ok(())
    }

    fn set_columns(&mut self, columns: Vec<Column>) {
        self.ordinals.clear();
        for (index, column) in columns.iter().enumerate() {
            self.ordinals
                .entry(column.name.to_lowercase())
                .or_insert(index);
        }
        self.values = vec![FieldValue::Null; columns.len()];
        self.columns = columns;
    }

    /// Advance to the next record
    ///
    /// Returns `false` once the stream is exhausted. Fails with
    /// [`CsvError::NotOpen`] on a closed reader.
    pub fn read(&mut self) -> CsvResult<bool> {
        match self.state {
            ReaderState::Closed => return Err(CsvError::NotOpen),
            ReaderState::Exhausted => return Ok(false),
            ReaderState::HeaderPending | ReaderState::Streaming => {}
        }

        let source = self.source.as_mut().ok_or(CsvError::NotOpen)?;
        let Some(line) = source.next_logical_line()? else {
            tracing::debug!(rows = self.row, "CSV stream exhausted");
            self.state = ReaderState::Exhausted;
            self.values.fill(FieldValue::Null);
            return Ok(false);
        };

        if self.columns.is_empty() {
            let count = split_fields(&line, self.format.separator()).len();
            tracing::debug!(columns = count, "columns inferred from the first record");
            self.set_columns(
                (1..=count)
                    .map(|index| Column::string(format!("Column{index}")))
                    .collect(),
            );
        }

        self.row += 1;
        self.convert_fields(&line)?;
        self.progress.record(self.row);
        Ok(true)
    }

    fn convert_fields(&mut self, line: &str) -> CsvResult<()> {
        let separator = self.format.separator();
        let separator_len = separator.len_utf8();
        let converter = FieldConverter::new(&self.format);
        let mut start = 0;

        for (index, column) in self.columns.iter().enumerate() {
            let length = scan_field(line, start, separator);

            if length == 0 {
                self.values[index] = FieldValue::Null;
                start += separator_len;
                continue;
            }

            let field = normalize_field(&line[start..start + length]);
            self.values[index] = converter
                .convert(column.column_type, &field)
                .map_err(|invalid| CsvError::Parse {
                    row: self.row,
                    column: index,
                    message: invalid.to_string(),
                })?;
            start += length + separator_len;
        }

        if start < line.len() {
            tracing::trace!(row = self.row, "extra fields dropped");
        }

        Ok(())
    }

    /// Close the reader; the stream is closed only when the reader opened it
    pub fn close(&mut self) {
        if let Some(source) = self.source.take() {
            match self.ownership {
                StreamOwnership::Owned => tracing::debug!(rows = self.row, "closing CSV file"),
                StreamOwnership::Borrowed => tracing::debug!(rows = self.row, "releasing CSV stream"),
            }
            drop(source);
        }
        self.values.fill(FieldValue::Null);
        self.state = ReaderState::Closed;
    }

    /// File conventions
    pub fn format(&self) -> &FileFormat {
        &self.format
    }

    /// Column descriptors
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column name by position
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|column| column.name.as_str())
    }

    /// Column type by position
    pub fn column_type(&self, index: usize) -> Option<ColumnType> {
        self.columns.get(index).map(|column| column.column_type)
    }

    /// Position of a column by name (case insensitive, first match)
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.ordinals.get(&name.to_lowercase()).copied()
    }

    /// Current row values
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Value by position; null when out of range
    pub fn value(&self, index: usize) -> &FieldValue {
        self.values.get(index).unwrap_or(&NULL_VALUE)
    }

    /// Value by column name; [`CsvError::ColumnNotFound`] for unknown names
    pub fn value_by_name(&self, name: &str) -> CsvResult<&FieldValue> {
        self.ordinal(name)
            .map(|index| self.value(index))
            .ok_or_else(|| CsvError::ColumnNotFound(name.to_string()))
    }

    /// Whether the value at a position is null
    pub fn is_null(&self, index: usize) -> bool {
        self.value(index).is_null()
    }

    /// Text value at a position
    pub fn get_str(&self, index: usize) -> Option<&str> {
        self.value(index).as_str()
    }

    /// Integer value at a position
    pub fn get_i64(&self, index: usize) -> Option<i64> {
        self.value(index).as_i64()
    }

    /// Numeric value at a position
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        self.value(index).as_f64()
    }

    /// Boolean value at a position
    pub fn get_bool(&self, index: usize) -> Option<bool> {
        self.value(index).as_bool()
    }

    /// Timestamp value at a position
    pub fn get_timestamp(&self, index: usize) -> Option<NaiveDateTime> {
        self.value(index).as_timestamp()
    }

    /// Number of records read so far (1-based once the first row is read)
    pub fn row_number(&self) -> u64 {
        self.row
    }

    /// Current lifecycle state
    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Whether no stream is bound
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Whether the reader opened (and will close) its stream
    pub fn owns_stream(&self) -> bool {
        self.source.is_some() && self.ownership == StreamOwnership::Owned
    }
}

impl RowCursor for CsvReader<'_> {
    fn read(&mut self) -> CsvResult<bool> {
        CsvReader::read(self)
    }

    fn column_count(&self) -> usize {
        CsvReader::column_count(self)
    }

    fn column_name(&self, index: usize) -> Option<&str> {
        CsvReader::column_name(self, index)
    }

    fn column_type(&self, index: usize) -> Option<ColumnType> {
        CsvReader::column_type(self, index)
    }

    fn value(&self, index: usize) -> &FieldValue {
        CsvReader::value(self, index)
    }

    fn close(&mut self) {
        CsvReader::close(self)
    }

    fn ordinal(&self, name: &str) -> Option<usize> {
        CsvReader::ordinal(self, name)
    }

    fn columns(&self) -> Vec<Column> {
        self.columns.clone()
    }
}

impl std::fmt::Debug for CsvReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvReader")
            .field("format", &self.format)
            .field("columns", &self.columns)
            .field("state", &self.state)
            .field("ownership", &self.ownership)
            .field("row", &self.row)
            .finish()
    }
}
