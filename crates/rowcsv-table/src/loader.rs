//! Paged loading of CSV files into tables

use std::path::Path;
use std::sync::Arc;

use rowcsv::{Column, CsvReader, FieldValue, FileFormat, RowCursor};

use crate::error::{TableError, TableResult};
use crate::filter::FilterSet;
use crate::table::Table;

/// Loads one page of filtered rows into a [`Table`]
#[derive(Debug, Clone)]
pub struct TableLoader {
    format: Arc<FileFormat>,
    columns: Vec<Column>,
}

impl TableLoader {
    pub fn new(format: impl Into<Arc<FileFormat>>) -> Self {
        Self {
            format: format.into(),
            columns: Vec::new(),
        }
    }

    /// Use explicit columns instead of the file header
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Load page `page` (1-based) of a file
    ///
    /// Returns the table and the number of rows that passed the filters.
    /// When `count_records` is false, reading stops once the page is full
    /// and the count covers only the rows read so far.
    pub fn load<P: AsRef<Path>>(
        &self,
        path: P,
        page: usize,
        rows_per_page: usize,
        count_records: bool,
        filters: Option<&FilterSet>,
    ) -> TableResult<(Table, u64)> {
        let mut reader = CsvReader::new(Arc::clone(&self.format), self.columns.clone());
        reader.open(path)?;
        let loaded = load_page(&mut reader, page, rows_per_page, count_records, filters);
        reader.close();
        loaded
    }
}

/// Collect one page of filtered rows from any cursor
pub fn load_page<C: RowCursor + ?Sized>(
    cursor: &mut C,
    page: usize,
    rows_per_page: usize,
    count_records: bool,
    filters: Option<&FilterSet>,
) -> TableResult<(Table, u64)> {
    if page == 0 || rows_per_page == 0 {
        return Err(TableError::InvalidPage { page, rows_per_page });
    }

    let offset = ((page - 1) * rows_per_page) as u64;
    let end = offset + rows_per_page as u64;
    let mut table: Option<Table> = None;
    let mut matched = 0u64;

    while (count_records || matched < end) && cursor.read()? {
        if !filters.map_or(true, |filters| filters.matches(&*cursor)) {
            continue;
        }

        if matched >= offset && matched < end {
            let table = table.get_or_insert_with(|| Table::new(cursor.columns()));
            let values: Vec<FieldValue> = (0..table.column_count())
                .map(|index| cursor.value(index).clone())
                .collect();
            table.push_row(values)?;
        }
        matched += 1;
    }

    tracing::debug!(page, rows_per_page, matched, "page loaded");
    let table = table.unwrap_or_else(|| Table::new(cursor.columns()));
    Ok((table, matched))
}
