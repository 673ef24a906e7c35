//! # Column Writers
//!
//! This module compiles a logical schema into a tree of column writers and
//! drives values through it.
//!
//! ## Design Principles
//!
//! 1. **Static levels**: every node knows its maximum definition and
//!    repetition level at construction; writing never inspects the schema.
//!
//! 2. **Strategy per leaf**: the [type mapper](value_writer_kind) selects a
//!    value writer once per leaf, bound to one engine type and one physical
//!    type.
//!
//! 3. **Version as a strategy**: V1 and V2 differ only in the injected page
//!    format and level encoders; composite writers never see the difference.
//!
//! 4. **No partial trees**: construction fails before any writer escapes.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use nestwrite::encoding::DefaultPageProperties;
//! use nestwrite::schema::{MessageSchema, SchemaNode, SchemaPath};
//! use nestwrite::types::{EngineType, Value};
//! use nestwrite::writer::{get_column_writers, WriterVersion};
//! use parquet::basic::{Compression, Type as PhysicalType};
//!
//! let schema = MessageSchema::new("m", vec![
//!     SchemaNode::primitive("id", PhysicalType::INT32).optional(),
//! ]);
//! let types = HashMap::from([(SchemaPath::from(["id"]), EngineType::Integer)]);
//! let properties = Arc::new(DefaultPageProperties::new(WriterVersion::V2, 1 << 20));
//!
//! let mut writers = get_column_writers(&schema, &types, properties, Compression::UNCOMPRESSED)?;
//! writers[0].write(&[Value::Integer(1), Value::Null])?;
//! let pages = writers[0].flush_page();
//! assert_eq!(pages[0].num_nulls(), Some(1));
//! # Ok::<(), nestwrite::writer::WriterError>(())
//! ```

mod builder;
mod column;
mod composite;
mod config;
mod error;
mod page;
mod primitive;
mod stats;
mod table;
mod type_mapper;
mod value_writer;

#[cfg(test)]
mod tests;

pub use builder::get_column_writers;
pub use column::ColumnWriter;
pub use composite::{ArrayColumnWriter, MapColumnWriter, NodeLevels, StructColumnWriter};
pub use config::{CompressionType, WriterConfig, WriterVersion, DEFAULT_PAGE_SIZE_THRESHOLD};
pub use error::{Result, WriterError};
pub use page::{
    page_format, ColumnChunk, DataPageFormat, DataPageV1, DataPageV2, EncodedPage, PageContent,
    PageHeader,
};
pub use primitive::PrimitiveColumnWriter;
pub use stats::WriterStats;
pub use table::TableWriter;
pub use type_mapper::{value_writer_kind, ValueWriterKind, MAX_DECIMAL_PRECISION};
pub use value_writer::{max_precision_for_length, ValueWriter};
