//! In-memory table of typed rows

use ahash::AHashMap;
use rowcsv::{Column, ColumnType, CsvError, CsvResult, FieldValue, RowCursor};

use crate::error::{TableError, TableResult};

static NULL_VALUE: FieldValue = FieldValue::Null;

/// Rows held in memory under a fixed set of columns
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    ordinals: AHashMap<String, usize>,
    rows: Vec<Vec<FieldValue>>,
}

impl Table {
    /// Create an empty table
    pub fn new(columns: Vec<Column>) -> Self {
        let mut ordinals = AHashMap::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            ordinals.entry(column.name.to_lowercase()).or_insert(index);
        }
        Self {
            columns,
            ordinals,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn rows(&self) -> &[Vec<FieldValue>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[FieldValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name (case insensitive)
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.ordinals.get(&name.to_lowercase()).copied()
    }

    /// Append a row; its width must match the columns
    pub fn push_row(&mut self, values: Vec<FieldValue>) -> TableResult<()> {
        if values.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        self.rows.push(values);
        Ok(())
    }

    /// Value at a row and column position, null when out of range
    pub fn value(&self, row: usize, column: usize) -> &FieldValue {
        self.rows
            .get(row)
            .and_then(|values| values.get(column))
            .unwrap_or(&NULL_VALUE)
    }

    /// Value at a row by column name
    pub fn value_by_name(&self, row: usize, name: &str) -> Option<&FieldValue> {
        self.ordinal(name).map(|column| self.value(row, column))
    }

    /// Forward-only cursor over the rows
    pub fn cursor(&self) -> TableCursor<'_> {
        TableCursor {
            table: self,
            next: 0,
            current: None,
            closed: false,
        }
    }
}

/// [`RowCursor`] over a [`Table`]
#[derive(Debug)]
pub struct TableCursor<'t> {
    table: &'t Table,
    next: usize,
    current: Option<usize>,
    closed: bool,
}

impl RowCursor for TableCursor<'_> {
    fn read(&mut self) -> CsvResult<bool> {
        if self.closed {
            return Err(CsvError::NotOpen);
        }
        if self.next < self.table.len() {
            self.current = Some(self.next);
            self.next += 1;
            Ok(true)
        } else {
            self.current = None;
            Ok(false)
        }
    }

    fn column_count(&self) -> usize {
        self.table.column_count()
    }

    fn column_name(&self, index: usize) -> Option<&str> {
        self.table.columns.get(index).map(|column| column.name.as_str())
    }

    fn column_type(&self, index: usize) -> Option<ColumnType> {
        self.table.columns.get(index).map(|column| column.column_type)
    }

    fn value(&self, index: usize) -> &FieldValue {
        match self.current {
            Some(row) => self.table.value(row, index),
            None => &NULL_VALUE,
        }
    }

    fn close(&mut self) {
        self.closed = true;
        self.current = None;
    }

    fn ordinal(&self, name: &str) -> Option<usize> {
        self.table.ordinal(name)
    }

    fn columns(&self) -> Vec<Column> {
        self.table.columns.clone()
    }
}
