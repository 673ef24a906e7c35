//! Data page assembly for both writer versions.
//!
//! ## Data page V1
//!
//! ```text
//! [rep levels: u32 len + RLE][def levels: u32 len + RLE][values]
//! ```
//!
//! The whole buffer is one compression unit. Null and row counts are not
//! recorded in the header.
//!
//! ## Data page V2
//!
//! ```text
//! [rep levels: RLE][def levels: RLE][values]
//! ```
//!
//! Level sections are bare, their byte lengths live in the header and only
//! the values section is subject to compression. The header also records
//! `num_nulls` and `num_rows`, so a V2 page always starts on a row boundary.

use bytes::{Bytes, BytesMut};
use parquet::basic::{Compression, Encoding};

use crate::schema::ColumnDescriptor;

use super::config::WriterVersion;

/// Header fields of an encoded data page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageHeader {
    /// Data page V1
    V1 {
        /// Number of level records, nulls included
        num_values: usize,
        /// Value encoding
        encoding: Encoding,
        /// Definition level encoding
        definition_level_encoding: Encoding,
        /// Repetition level encoding
        repetition_level_encoding: Encoding,
    },
    /// Data page V2
    V2 {
        /// Number of level records, nulls included
        num_values: usize,
        /// Number of records with a definition level below the maximum
        num_nulls: usize,
        /// Number of records with repetition level 0
        num_rows: usize,
        /// Value encoding
        encoding: Encoding,
        /// Byte length of the definition level section
        definition_levels_byte_length: usize,
        /// Byte length of the repetition level section
        repetition_levels_byte_length: usize,
        /// Whether the values section is to be compressed by the sink
        is_compressed: bool,
    },
}

/// A finished data page, ready to be compressed and written by a page sink.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPage {
    /// Page header fields
    pub header: PageHeader,
    /// Page body, levels first
    pub data: Bytes,
    /// Size of `data` before compression
    pub uncompressed_size: usize,
    /// Codec the sink applies to the compressible part of `data`
    pub compression: Compression,
}

impl EncodedPage {
    /// Format generation of this page
    pub fn version(&self) -> WriterVersion {
        match self.header {
            PageHeader::V1 { .. } => WriterVersion::V1,
            PageHeader::V2 { .. } => WriterVersion::V2,
        }
    }

    /// Number of level records
    pub fn num_values(&self) -> usize {
        match self.header {
            PageHeader::V1 { num_values, .. } | PageHeader::V2 { num_values, .. } => num_values,
        }
    }

    /// Value encoding
    pub fn encoding(&self) -> Encoding {
        match self.header {
            PageHeader::V1 { encoding, .. } | PageHeader::V2 { encoding, .. } => encoding,
        }
    }

    /// Null count, recorded only by V2 pages
    pub fn num_nulls(&self) -> Option<usize> {
        match self.header {
            PageHeader::V1 { .. } => None,
            PageHeader::V2 { num_nulls, .. } => Some(num_nulls),
        }
    }

    /// Row count, recorded only by V2 pages
    pub fn num_rows(&self) -> Option<usize> {
        match self.header {
            PageHeader::V1 { .. } => None,
            PageHeader::V2 { num_rows, .. } => Some(num_rows),
        }
    }
}

/// Buffers of one page as flushed from the encoders
#[derive(Debug, Clone)]
pub struct PageContent {
    /// Encoded repetition levels, as produced by the level encoder
    pub repetition_levels: Bytes,
    /// Encoded definition levels, as produced by the level encoder
    pub definition_levels: Bytes,
    /// Encoded values
    pub values: Bytes,
    /// Number of level records
    pub num_values: usize,
    /// Number of null records
    pub num_nulls: usize,
    /// Number of rows
    pub num_rows: usize,
    /// Value encoding
    pub encoding: Encoding,
    /// Level encoding
    pub level_encoding: Encoding,
}

/// Assembles page buffers into one page of a given format generation.
pub trait DataPageFormat: Send {
    /// Generation produced by this format
    fn version(&self) -> WriterVersion;

    /// Concatenate the page sections and fill in the header
    fn assemble(&self, content: PageContent, compression: Compression) -> EncodedPage;
}

/// Data page V1 assembly
#[derive(Debug, Clone, Copy, Default)]
pub struct DataPageV1;

/// Data page V2 assembly
#[derive(Debug, Clone, Copy, Default)]
pub struct DataPageV2;

fn concat(content: &PageContent) -> Bytes {
    let mut buffer = BytesMut::with_capacity(
        content.repetition_levels.len() + content.definition_levels.len() + content.values.len(),
    );
    buffer.extend_from_slice(&content.repetition_levels);
    buffer.extend_from_slice(&content.definition_levels);
    buffer.extend_from_slice(&content.values);
    buffer.freeze()
}

impl DataPageFormat for DataPageV1 {
    fn version(&self) -> WriterVersion {
        WriterVersion::V1
    }

    fn assemble(&self, content: PageContent, compression: Compression) -> EncodedPage {
        let data = concat(&content);
        EncodedPage {
            header: PageHeader::V1 {
                num_values: content.num_values,
                encoding: content.encoding,
                definition_level_encoding: content.level_encoding,
                repetition_level_encoding: content.level_encoding,
            },
            uncompressed_size: data.len(),
            data,
            compression,
        }
    }
}

impl DataPageFormat for DataPageV2 {
    fn version(&self) -> WriterVersion {
        WriterVersion::V2
    }

    fn assemble(&self, content: PageContent, compression: Compression) -> EncodedPage {
        let data = concat(&content);
        EncodedPage {
            header: PageHeader::V2 {
                num_values: content.num_values,
                num_nulls: content.num_nulls,
                num_rows: content.num_rows,
                encoding: content.encoding,
                definition_levels_byte_length: content.definition_levels.len(),
                repetition_levels_byte_length: content.repetition_levels.len(),
                is_compressed: compression != Compression::UNCOMPRESSED,
            },
            uncompressed_size: data.len(),
            data,
            compression,
        }
    }
}

/// Page format for a writer version
pub fn page_format(version: WriterVersion) -> Box<dyn DataPageFormat> {
    match version {
        WriterVersion::V1 => Box::new(DataPageV1),
        WriterVersion::V2 => Box::new(DataPageV2),
    }
}

/// All pages and totals of one leaf column
#[derive(Debug, Clone)]
pub struct ColumnChunk {
    /// Leaf the chunk belongs to
    pub descriptor: ColumnDescriptor,
    /// Pages not already handed out by `flush_page`
    pub pages: Vec<EncodedPage>,
    /// Codec recorded on every page
    pub compression: Compression,
    /// Level records over the whole chunk
    pub num_values: usize,
    /// Null records over the whole chunk
    pub num_nulls: usize,
    /// Rows over the whole chunk
    pub num_rows: usize,
    /// Every encoding used by the chunk
    pub encodings: Vec<Encoding>,
}

impl ColumnChunk {
    /// Uncompressed bytes of the pages still held by the chunk
    pub fn buffered_bytes(&self) -> usize {
        self.pages.iter().map(|page| page.uncompressed_size).sum()
    }
}
