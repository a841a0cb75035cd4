//! CSV writer

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use rowcsv_core::{Column, ColumnType, FieldValue, FileFormat, QUOTE, TYPED_HEADER_SEPARATOR};

use crate::convert::FieldConverter;
use crate::error::{CsvError, CsvResult};
use crate::reader::StreamOwnership;

/// Quote a field when it contains the separator, a line break or a quote
///
/// Quotes inside the field are doubled so the reader restores the value.
pub fn quote_field(field: &str, separator: char) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == separator || c == QUOTE || c == '\r' || c == '\n');

    if !needs_quotes {
        return Cow::Borrowed(field);
    }

    let mut quoted = String::with_capacity(field.len() + 2);
    quoted.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            quoted.push(QUOTE);
        }
        quoted.push(c);
    }
    quoted.push(QUOTE);
    Cow::Owned(quoted)
}

fn check_finite<'v>(values: impl Iterator<Item = (usize, &'v FieldValue)>) -> CsvResult<()> {
    for (column, value) in values {
        if let FieldValue::Decimal(value) = *value {
            if !value.is_finite() {
                return Err(CsvError::NonFinite { column, value });
            }
        }
    }
    Ok(())
}

/// Writes typed rows in a [`FileFormat`]
pub struct CsvWriter<'s> {
    format: Arc<FileFormat>,
    sink: Option<BufWriter<Box<dyn Write + 's>>>,
    ownership: StreamOwnership,
    rows: u64,
}

impl<'s> CsvWriter<'s> {
    /// Create a closed writer
    pub fn new(format: impl Into<Arc<FileFormat>>) -> Self {
        Self {
            format: format.into(),
            sink: None,
            ownership: StreamOwnership::Borrowed,
            rows: 0,
        }
    }

    /// Create (or truncate) a file; the writer owns and closes the handle
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> CsvResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        tracing::debug!(path = %path.display(), "created CSV file");
        self.bind(Box::new(file), StreamOwnership::Owned)
    }

    /// Write to a stream the caller keeps ownership of
    pub fn open_stream<W: Write>(&mut self, stream: &'s mut W) -> CsvResult<()> {
        self.bind(Box::new(stream), StreamOwnership::Borrowed)
    }

    fn bind(&mut self, stream: Box<dyn Write + 's>, ownership: StreamOwnership) -> CsvResult<()> {
        self.close()?;
        self.sink = Some(BufWriter::new(stream));
        self.ownership = ownership;
        self.rows = 0;
        Ok(())
    }

    /// File conventions
    pub fn format(&self) -> &FileFormat {
        &self.format
    }

    /// Write a plain header line
    pub fn write_headers<S: AsRef<str>>(&mut self, names: &[S]) -> CsvResult<()> {
        let separator = self.format.separator();
        let fields: Vec<Cow<'_, str>> = names
            .iter()
            .map(|name| quote_field(name.as_ref(), separator))
            .collect();
        self.write_line(&fields)
    }

    /// Write the header for a set of columns
    ///
    /// Cells carry `Name|Type` when the format uses typed headers, so names
    /// containing `|` are rejected there before anything is written.
    pub fn write_columns(&mut self, columns: &[Column]) -> CsvResult<()> {
        if self.format.typed_header() {
            if let Some(column) = columns
                .iter()
                .find(|column| column.name.contains(TYPED_HEADER_SEPARATOR))
            {
                return Err(rowcsv_core::Error::MalformedHeader(column.typed_header()).into());
            }
            let cells: Vec<String> = columns.iter().map(Column::typed_header).collect();
            self.write_headers(&cells)
        } else {
            let names: Vec<&str> = columns.iter().map(|column| column.name.as_str()).collect();
            self.write_headers(&names)
        }
    }

    /// Write a row, rendering each value by its own type
    pub fn write_row(&mut self, values: &[FieldValue]) -> CsvResult<()> {
        check_finite(values.iter().enumerate())?;
        let converter = FieldConverter::new(&self.format);
        let separator = self.format.separator();
        let fields: Vec<String> = values
            .iter()
            .map(|value| {
                let text = converter.render(ColumnType::of(value), value);
                quote_field(&text, separator).into_owned()
            })
            .collect();
        self.write_record(&fields)
    }

    /// Write a row, rendering each value by its column's declared type
    ///
    /// Missing values are written empty.
    pub fn write_typed_row(&mut self, columns: &[Column], values: &[FieldValue]) -> CsvResult<()> {
        check_finite(
            values
                .iter()
                .enumerate()
                .filter(|&(index, _)| {
                    columns
                        .get(index)
                        .is_some_and(|column| column.column_type != ColumnType::Unknown)
                }),
        )?;
        let converter = FieldConverter::new(&self.format);
        let separator = self.format.separator();
        let fields: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let text = values
                    .get(index)
                    .map(|value| converter.render(column.column_type, value))
                    .unwrap_or_default();
                quote_field(&text, separator).into_owned()
            })
            .collect();
        self.write_record(&fields)
    }

    fn write_record(&mut self, fields: &[String]) -> CsvResult<()> {
        self.write_line(fields)?;
        self.rows += 1;
        Ok(())
    }

    fn write_line<S: AsRef<str>>(&mut self, fields: &[S]) -> CsvResult<()> {
        let separator = self.format.separator();
        let terminator = self.format.line_terminator().as_str();
        let sink = self.sink.as_mut().ok_or(CsvError::NotOpen)?;

        for (index, field) in fields.iter().enumerate() {
            if index > 0 {
                write!(sink, "{separator}")?;
            }
            sink.write_all(field.as_ref().as_bytes())?;
        }
        sink.write_all(terminator.as_bytes())?;
        Ok(())
    }

    /// Number of data rows written since the stream was opened
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Whether a stream is bound
    pub fn is_open(&self) -> bool {
        self.sink.is_some()
    }

    /// Flush buffered output
    pub fn flush(&mut self) -> CsvResult<()> {
        if let Some(sink) = self.sink.as_mut() {
            sink.flush()?;
        }
        Ok(())
    }

    /// Flush and release the stream; closing twice is a no-op
    pub fn close(&mut self) -> CsvResult<()> {
        let Some(mut sink) = self.sink.take() else {
            return Ok(());
        };
        sink.flush()?;
        tracing::debug!(
            rows = self.rows,
            owned = self.ownership == StreamOwnership::Owned,
            "CSV writer closed"
        );
        Ok(())
    }
}

impl Drop for CsvWriter<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "failed to flush CSV output on drop");
        }
    }
}

impl std::fmt::Debug for CsvWriter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvWriter")
            .field("format", &self.format)
            .field("open", &self.sink.is_some())
            .field("ownership", &self.ownership)
            .field("rows", &self.rows)
            .finish()
    }
}
