use parquet::basic::Type as PhysicalType;

use super::plain::PlainEncoder;
use super::rle::{RleBooleanEncoder, RleLevelEncoder};
use super::{LevelEncoder, ValuesEncoder};
use crate::schema::ColumnDescriptor;
use crate::writer::{WriterConfig, WriterVersion};

/// Per-file page configuration and encoder factory.
///
/// Shared read-only between all writers of one output target, hence
/// `Send + Sync`.
pub trait PageProperties: Send + Sync {
    /// Selected page format generation
    fn writer_version(&self) -> WriterVersion;

    /// Buffered size in bytes at which a leaf cuts a page
    fn page_size_threshold(&self) -> usize;

    /// Value encoder for a leaf column
    fn new_values_encoder(&self, descriptor: &ColumnDescriptor) -> Box<dyn ValuesEncoder>;

    /// Definition level encoder for a leaf column
    fn new_definition_level_encoder(&self, descriptor: &ColumnDescriptor) -> Box<dyn LevelEncoder>;

    /// Repetition level encoder for a leaf column
    fn new_repetition_level_encoder(&self, descriptor: &ColumnDescriptor) -> Box<dyn LevelEncoder>;
}

/// Encoders shipped with the crate.
///
/// | | V1 | V2 |
/// |---|---|---|
/// | values | PLAIN | PLAIN, RLE for BOOLEAN |
/// | levels | RLE, length-prefixed | RLE, bare |
#[derive(Debug, Clone)]
pub struct DefaultPageProperties {
    writer_version: WriterVersion,
    page_size_threshold: usize,
}

impl DefaultPageProperties {
    /// Properties for a writer version with an explicit threshold
    pub fn new(writer_version: WriterVersion, page_size_threshold: usize) -> Self {
        Self {
            writer_version,
            page_size_threshold,
        }
    }

    /// Properties described by a writer configuration
    pub fn from_config(config: &WriterConfig) -> Self {
        Self::new(config.writer_version, config.page_size_threshold)
    }

    fn level_encoder(&self, max_level: u16) -> Box<dyn LevelEncoder> {
        match self.writer_version {
            WriterVersion::V1 => Box::new(RleLevelEncoder::v1(max_level)),
            WriterVersion::V2 => Box::new(RleLevelEncoder::v2(max_level)),
        }
    }
}

impl Default for DefaultPageProperties {
    fn default() -> Self {
        Self::from_config(&WriterConfig::default())
    }
}

impl PageProperties for DefaultPageProperties {
    fn writer_version(&self) -> WriterVersion {
        self.writer_version
    }

    fn page_size_threshold(&self) -> usize {
        self.page_size_threshold
    }

    fn new_values_encoder(&self, descriptor: &ColumnDescriptor) -> Box<dyn ValuesEncoder> {
        match (self.writer_version, descriptor.physical_type) {
            (WriterVersion::V2, PhysicalType::BOOLEAN) => Box::new(RleBooleanEncoder::new()),
            (_, physical_type) => Box::new(PlainEncoder::new(
                physical_type,
                usize::try_from(descriptor.type_length).unwrap_or(0),
            )),
        }
    }

    fn new_definition_level_encoder(&self, descriptor: &ColumnDescriptor) -> Box<dyn LevelEncoder> {
        self.level_encoder(descriptor.max_definition_level)
    }

    fn new_repetition_level_encoder(&self, descriptor: &ColumnDescriptor) -> Box<dyn LevelEncoder> {
        self.level_encoder(descriptor.max_repetition_level)
    }
}
