use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use parquet::basic::Compression;

use crate::encoding::{DefaultPageProperties, PageProperties};
use crate::schema::{MessageSchema, SchemaPath};
use crate::types::{EngineType, Value};

use super::builder::get_column_writers;
use super::column::ColumnWriter;
use super::config::WriterConfig;
use super::error::{Result, WriterError};
use super::page::{ColumnChunk, EncodedPage};
use super::stats::WriterStats;

/// Writer for one output target: the top-level column writers of a schema.
///
/// Rows are checked for arity before any column is touched. Once a column
/// has accepted part of a batch, any failure leaves the columns out of step
/// with each other; the writer then poisons itself and every later call
/// returns [`WriterError::Poisoned`].
#[derive(Debug)]
pub struct TableWriter {
    columns: Vec<ColumnWriter>,
    poisoned: bool,
    rows_written: usize,
    flushed_pages: usize,
    flushed_bytes: usize,
}

impl TableWriter {
    /// Build a writer from a configuration, using the default encoders
    pub fn try_new(
        schema: &MessageSchema,
        types: &HashMap<SchemaPath, EngineType>,
        config: &WriterConfig,
    ) -> Result<Self> {
        config.validate()?;
        let properties: Arc<dyn PageProperties> = Arc::new(DefaultPageProperties::from_config(config));
        Self::with_properties(schema, types, properties, config.compression.to_parquet())
    }

    /// Build a writer with caller-supplied page properties
    pub fn with_properties(
        schema: &MessageSchema,
        types: &HashMap<SchemaPath, EngineType>,
        properties: Arc<dyn PageProperties>,
        compression: Compression,
    ) -> Result<Self> {
        let columns = get_column_writers(schema, types, properties, compression)?;
        debug!(
            "Table writer for {} with {} columns, {} leaves",
            schema.name,
            columns.len(),
            schema.leaf_count()
        );
        Ok(Self {
            columns,
            poisoned: false,
            rows_written: 0,
            flushed_pages: 0,
            flushed_bytes: 0,
        })
    }

    /// Top-level column writers
    pub fn columns(&self) -> &[ColumnWriter] {
        &self.columns
    }

    /// Number of top-level columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Rows accepted so far
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Whether an earlier failure poisoned the writer
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    fn check_poisoned(&self) -> Result<()> {
        if self.poisoned {
            Err(WriterError::Poisoned)
        } else {
            Ok(())
        }
    }

    /// Write a single row
    pub fn write_row(&mut self, row: &[Value]) -> Result<()> {
        self.write_rows(&[row])
    }

    /// Write a batch of rows, each with one value per top-level column
    pub fn write_rows<R: AsRef<[Value]>>(&mut self, rows: &[R]) -> Result<()> {
        self.check_poisoned()?;
        let expected = self.columns.len();
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.as_ref().len() != expected)
        {
            return Err(WriterError::structural(
                &SchemaPath::root(),
                format!(
                    "row {index} has {} values, schema has {expected} columns",
                    row.as_ref().len()
                ),
            ));
        }

        let result = self
            .columns
            .iter_mut()
            .enumerate()
            .try_for_each(|(i, column)| column.write(rows.iter().map(|row| &row.as_ref()[i])));
        self.settle(result, rows.len())
    }

    /// Write a batch given column by column; every column must hold the
    /// same number of rows
    pub fn write_columns<C: AsRef<[Value]>>(&mut self, columns: &[C]) -> Result<()> {
        self.check_poisoned()?;
        if columns.len() != self.columns.len() {
            return Err(WriterError::structural(
                &SchemaPath::root(),
                format!(
                    "batch has {} columns, schema has {}",
                    columns.len(),
                    self.columns.len()
                ),
            ));
        }
        let rows = columns.first().map_or(0, |column| column.as_ref().len());
        if let Some(column) = columns.iter().find(|column| column.as_ref().len() != rows) {
            return Err(WriterError::structural(
                &SchemaPath::root(),
                format!(
                    "column lengths differ: {} and {rows}",
                    column.as_ref().len()
                ),
            ));
        }

        let result = self
            .columns
            .iter_mut()
            .zip(columns)
            .try_for_each(|(writer, values)| writer.write(values.as_ref()));
        self.settle(result, rows)
    }

    /// Write an Arrow record batch whose columns follow the schema order
    #[cfg(feature = "arrow-ingest")]
    pub fn write_record_batch(&mut self, batch: &arrow::record_batch::RecordBatch) -> Result<()> {
        self.check_poisoned()?;
        let columns = crate::ingest::batch::record_batch_columns(batch)?;
        self.write_columns(&columns)
    }

    fn settle(&mut self, result: Result<()>, rows: usize) -> Result<()> {
        match result {
            Ok(()) => {
                self.rows_written += rows;
                Ok(())
            }
            Err(e) => {
                self.poisoned = true;
                Err(e)
            }
        }
    }

    /// Estimated bytes buffered across all columns
    pub fn buffered_size(&self) -> usize {
        self.columns.iter().map(ColumnWriter::buffered_size).sum()
    }

    /// Rows written since the last `flush_page`
    pub fn buffered_rows(&self) -> usize {
        self.columns.first().map_or(0, ColumnWriter::buffered_rows)
    }

    /// Cut a page on every leaf and hand out all pages cut so far
    pub fn flush_page(&mut self) -> Result<Vec<EncodedPage>> {
        self.check_poisoned()?;
        let pages: Vec<EncodedPage> = self
            .columns
            .iter_mut()
            .flat_map(ColumnWriter::flush_page)
            .collect();
        self.flushed_pages += pages.len();
        self.flushed_bytes += pages.iter().map(|page| page.uncompressed_size).sum::<usize>();
        Ok(pages)
    }

    /// Finish every column, returning one chunk per leaf and the write statistics
    pub fn close(self) -> Result<(Vec<ColumnChunk>, WriterStats)> {
        self.check_poisoned()?;
        let mut stats = WriterStats {
            rows_written: self.rows_written,
            columns: self.columns.len(),
            pages_written: self.flushed_pages,
            page_bytes: self.flushed_bytes,
            ..WriterStats::default()
        };
        let chunks: Vec<ColumnChunk> = self.columns.into_iter().flat_map(ColumnWriter::close).collect();
        stats.add_chunks(&chunks);
        debug!("{stats}");
        Ok((chunks, stats))
    }
}
