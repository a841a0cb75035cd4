//! Row cursor capability

use rowcsv_core::{Column, ColumnType, FieldValue};

use crate::error::{CsvError, CsvResult};

/// A forward-only cursor over typed rows
///
/// Implemented by [`CsvReader`](crate::CsvReader) and by any adapter that
/// wants to feed table loaders or bulk copies. Opening is specific to each
/// implementation and is not part of the trait.
pub trait RowCursor {
    /// Advance to the next row, `false` when no rows are left
    fn read(&mut self) -> CsvResult<bool>;

    /// Number of columns
    fn column_count(&self) -> usize;

    /// Column name by position
    fn column_name(&self, index: usize) -> Option<&str>;

    /// Column type by position
    fn column_type(&self, index: usize) -> Option<ColumnType>;

    /// Value of the current row by position (null when out of range)
    fn value(&self, index: usize) -> &FieldValue;

    /// Release the underlying source
    fn close(&mut self);

    /// Position of a column by name (case insensitive)
    fn ordinal(&self, name: &str) -> Option<usize> {
        (0..self.column_count()).find(|&index| {
            self.column_name(index)
                .map_or(false, |candidate| candidate.to_lowercase() == name.to_lowercase())
        })
    }

    /// Value of the current row by column name
    fn value_by_name(&self, name: &str) -> CsvResult<&FieldValue> {
        self.ordinal(name)
            .map(|index| self.value(index))
            .ok_or_else(|| CsvError::ColumnNotFound(name.to_string()))
    }

    /// Snapshot of the column descriptors
    fn columns(&self) -> Vec<Column> {
        (0..self.column_count())
            .map(|index| {
                Column::new(
                    self.column_name(index).unwrap_or_default(),
                    self.column_type(index).unwrap_or_default(),
                )
            })
            .collect()
    }
}
