use log::trace;
use parquet::basic::Compression;

use crate::encoding::{LevelEncoder, PageProperties};
use crate::schema::{ColumnDescriptor, SchemaPath};
use crate::types::{EngineType, Value};

use super::error::{Result, WriterError};
use super::page::{page_format, ColumnChunk, DataPageFormat, EncodedPage, PageContent};
use super::value_writer::ValueWriter;

/// Writer for one primitive leaf.
///
/// Every call records exactly one definition and one repetition level; a
/// value is encoded only when the definition level equals the leaf maximum.
pub struct PrimitiveColumnWriter {
    descriptor: ColumnDescriptor,
    engine_type: EngineType,
    nullable: bool,
    value_writer: ValueWriter,
    definition_levels: Box<dyn LevelEncoder>,
    repetition_levels: Box<dyn LevelEncoder>,
    page_format: Box<dyn DataPageFormat>,
    compression: Compression,
    page_size_threshold: usize,

    // Current page
    page_values: usize,
    page_nulls: usize,
    page_rows: usize,

    /// Rows not yet handed out by `flush_page`
    unflushed_rows: usize,
    pages: Vec<EncodedPage>,

    total_values: usize,
    total_nulls: usize,
    total_rows: usize,
}

impl std::fmt::Debug for PrimitiveColumnWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimitiveColumnWriter")
            .field("path", &self.descriptor.path)
            .field("engine_type", &self.engine_type)
            .field("version", &self.page_format.version())
            .field("page_values", &self.page_values)
            .field("pages", &self.pages.len())
            .finish()
    }
}

impl PrimitiveColumnWriter {
    /// Create a leaf writer with level encoders and page format taken from
    /// `properties`
    pub fn new(
        descriptor: ColumnDescriptor,
        engine_type: EngineType,
        nullable: bool,
        value_writer: ValueWriter,
        properties: &dyn PageProperties,
        compression: Compression,
    ) -> Self {
        Self {
            definition_levels: properties.new_definition_level_encoder(&descriptor),
            repetition_levels: properties.new_repetition_level_encoder(&descriptor),
            page_format: page_format(properties.writer_version()),
            page_size_threshold: properties.page_size_threshold(),
            descriptor,
            engine_type,
            nullable,
            value_writer,
            compression,
            page_values: 0,
            page_nulls: 0,
            page_rows: 0,
            unflushed_rows: 0,
            pages: Vec::new(),
            total_values: 0,
            total_nulls: 0,
            total_rows: 0,
        }
    }

    /// Leaf descriptor
    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    /// Leaf path
    pub fn path(&self) -> &SchemaPath {
        &self.descriptor.path
    }

    /// Engine type of the leaf
    pub fn engine_type(&self) -> &EngineType {
        &self.engine_type
    }

    /// Value writer strategy
    pub fn value_writer(&self) -> &ValueWriter {
        &self.value_writer
    }

    /// Whether the leaf itself may be null
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Write a value (or a null of this leaf) at repetition level `rep`
    pub fn write_value(&mut self, value: &Value, rep: u16) -> Result<()> {
        if value.is_null() {
            if !self.nullable {
                return Err(WriterError::NullInRequiredField {
                    path: self.descriptor.path.clone(),
                });
            }
            return self.write_null(self.descriptor.max_definition_level - 1, rep);
        }
        self.check_repetition(rep)?;
        self.value_writer.write(value)?;
        self.definition_levels.put(self.descriptor.max_definition_level)?;
        self.repetition_levels.put(rep)?;
        self.record(rep, false);
        Ok(())
    }

    /// Record a null or an absent ancestor at definition level `def`
    pub fn write_null(&mut self, def: u16, rep: u16) -> Result<()> {
        if def >= self.descriptor.max_definition_level {
            return Err(WriterError::structural(
                &self.descriptor.path,
                format!(
                    "null definition level {def} must be below {}",
                    self.descriptor.max_definition_level
                ),
            ));
        }
        self.check_repetition(rep)?;
        self.definition_levels.put(def)?;
        self.repetition_levels.put(rep)?;
        self.record(rep, true);
        Ok(())
    }

    fn check_repetition(&self, rep: u16) -> Result<()> {
        if rep > self.descriptor.max_repetition_level {
            return Err(WriterError::structural(
                &self.descriptor.path,
                format!(
                    "repetition level {rep} exceeds maximum {}",
                    self.descriptor.max_repetition_level
                ),
            ));
        }
        Ok(())
    }

    fn record(&mut self, rep: u16, null: bool) {
        self.page_values += 1;
        if null {
            self.page_nulls += 1;
        }
        if rep == 0 {
            self.page_rows += 1;
            self.unflushed_rows += 1;
        }
    }

    /// Estimated bytes of the current page
    pub fn buffered_size(&self) -> usize {
        self.value_writer.estimated_size()
            + self.definition_levels.estimated_size()
            + self.repetition_levels.estimated_size()
    }

    /// Level records in the current page
    pub fn buffered_values(&self) -> usize {
        self.page_values
    }

    /// Rows written since the last `flush_page`
    pub fn buffered_rows(&self) -> usize {
        self.unflushed_rows
    }

    /// Pages cut but not yet handed out
    pub fn pending_pages(&self) -> usize {
        self.pages.len()
    }

    /// Cut a page if the current one reached the size threshold
    pub fn cut_page_if_full(&mut self) {
        if self.buffered_size() >= self.page_size_threshold {
            self.cut_page();
        }
    }

    /// Close the current page, if it holds any records
    pub fn cut_page(&mut self) {
        if self.page_values == 0 {
            return;
        }
        let content = PageContent {
            repetition_levels: self.repetition_levels.flush_buffer(),
            definition_levels: self.definition_levels.flush_buffer(),
            values: self.value_writer.flush_buffer(),
            num_values: self.page_values,
            num_nulls: self.page_nulls,
            num_rows: self.page_rows,
            encoding: self.value_writer.encoding(),
            level_encoding: self.definition_levels.encoding(),
        };
        let page = self.page_format.assemble(content, self.compression);
        trace!(
            "Cut {} page for {}: {} values, {} bytes",
            self.page_format.version(),
            self.descriptor.path,
            page.num_values(),
            page.uncompressed_size
        );

        self.total_values += self.page_values;
        self.total_nulls += self.page_nulls;
        self.total_rows += self.page_rows;
        self.page_values = 0;
        self.page_nulls = 0;
        self.page_rows = 0;
        self.pages.push(page);
    }

    /// Cut the current page and hand out every page cut so far
    pub fn flush_page(&mut self) -> Vec<EncodedPage> {
        self.cut_page();
        self.unflushed_rows = 0;
        std::mem::take(&mut self.pages)
    }

    /// Cut the last page and produce the column chunk
    pub fn close(mut self) -> ColumnChunk {
        self.cut_page();
        let mut encodings = vec![self.value_writer.encoding()];
        for encoding in [self.definition_levels.encoding(), self.repetition_levels.encoding()] {
            if !encodings.contains(&encoding) {
                encodings.push(encoding);
            }
        }
        ColumnChunk {
            descriptor: self.descriptor,
            pages: self.pages,
            compression: self.compression,
            num_values: self.total_values,
            num_nulls: self.total_nulls,
            num_rows: self.total_rows,
            encodings,
        }
    }
}
