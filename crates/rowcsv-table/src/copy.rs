//! Bulk copy of row sources into CSV files
//!
//! [`CursorCopier`] drains a [`RowCursor`] (or an [`AsyncRowSource`]) into a
//! [`CsvWriter`], reporting progress every [`COPY_NOTIFY_AFTER`] rows by
//! default and once more when the copy ends.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rowcsv::{
    Column, CsvWriter, FieldValue, FileFormat, Progress, ProgressObserver, RowCursor,
    COPY_NOTIFY_AFTER,
};
use tokio_util::sync::CancellationToken;

use crate::error::TableResult;

/// Rows produced asynchronously, e.g. by a database query
///
/// Sources need not be `Send`. The copy holds the writer and the progress
/// observer across `.await`, so [`CursorCopier::copy_async`] is awaited in
/// place (or on a `LocalSet`) rather than spawned.
#[async_trait(?Send)]
pub trait AsyncRowSource {
    /// Column descriptors of the rows
    fn columns(&self) -> Vec<Column>;

    /// Next row, `None` when the source is exhausted
    async fn next_row(&mut self) -> TableResult<Option<Vec<FieldValue>>>;
}

/// How an asynchronous copy ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The source was exhausted
    Completed(u64),
    /// The token was cancelled; rows copied before that are kept
    Cancelled(u64),
}

impl CopyOutcome {
    pub fn rows(&self) -> u64 {
        match self {
            CopyOutcome::Completed(rows) | CopyOutcome::Cancelled(rows) => *rows,
        }
    }
}

/// Copies rows into CSV with progress notifications
pub struct CursorCopier<'a> {
    format: Arc<FileFormat>,
    progress: Progress<'a>,
}

impl<'a> CursorCopier<'a> {
    pub fn new(format: impl Into<Arc<FileFormat>>) -> Self {
        Self {
            format: format.into(),
            progress: Progress::new(COPY_NOTIFY_AFTER),
        }
    }

    /// Rows between progress notifications (0 keeps only the final one)
    pub fn with_notify_after(mut self, notify_after: u64) -> Self {
        self.progress.set_notify_after(notify_after);
        self
    }

    pub fn with_progress<O: ProgressObserver + 'a>(mut self, observer: O) -> Self {
        self.progress.set_observer(observer);
        self
    }

    /// Copy every remaining row of a cursor into a new file
    pub fn copy<C, P>(&mut self, cursor: &mut C, target: P) -> TableResult<u64>
    where
        C: RowCursor + ?Sized,
        P: AsRef<Path>,
    {
        let mut writer = CsvWriter::new(Arc::clone(&self.format));
        writer.open(target)?;
        let rows = self.copy_to(cursor, &mut writer)?;
        writer.close()?;
        Ok(rows)
    }

    /// Copy every remaining row of a cursor into an open writer
    pub fn copy_to<C: RowCursor + ?Sized>(
        &mut self,
        cursor: &mut C,
        writer: &mut CsvWriter<'_>,
    ) -> TableResult<u64> {
        let mut header_written = false;
        if cursor.column_count() > 0 {
            self.write_header(writer, &cursor.columns())?;
            header_written = true;
        }

        let mut rows = 0u64;
        let mut values = Vec::new();
        while cursor.read()? {
            // cursors that infer columns only know them after the first row
            if !header_written {
                self.write_header(writer, &cursor.columns())?;
                header_written = true;
            }

            values.clear();
            values.extend((0..cursor.column_count()).map(|index| cursor.value(index).clone()));
            writer.write_row(&values)?;

            rows += 1;
            self.progress.record(rows);
        }

        self.progress.notify(rows);
        Ok(rows)
    }

    /// Copy an asynchronous source into a new file until it ends or
    /// `cancel` fires
    pub async fn copy_async<S, P>(
        &mut self,
        source: &mut S,
        target: P,
        cancel: &CancellationToken,
    ) -> TableResult<CopyOutcome>
    where
        S: AsyncRowSource + ?Sized,
        P: AsRef<Path>,
    {
        let mut writer = CsvWriter::new(Arc::clone(&self.format));
        writer.open(target)?;
        self.write_header(&mut writer, &source.columns())?;

        let mut rows = 0u64;
        let outcome = loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break CopyOutcome::Cancelled(rows),
                row = source.next_row() => match row? {
                    Some(values) => {
                        writer.write_row(&values)?;
                        rows += 1;
                        self.progress.record(rows);
                    }
                    None => break CopyOutcome::Completed(rows),
                },
            }
        };

        writer.close()?;
        if let CopyOutcome::Cancelled(rows) = outcome {
            tracing::debug!(rows, "copy cancelled");
        }
        self.progress.notify(rows);
        Ok(outcome)
    }

    fn write_header(&self, writer: &mut CsvWriter<'_>, columns: &[Column]) -> TableResult<()> {
        if self.format.with_header() {
            writer.write_columns(columns)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for CursorCopier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorCopier")
            .field("format", &self.format)
            .field("progress", &self.progress)
            .finish()
    }
}
