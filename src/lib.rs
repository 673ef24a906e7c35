//! # nestwrite - Nested Columnar Page Writers
//!
//! `nestwrite` turns row-oriented engine values into Parquet-style column
//! pages. Given a nested logical schema and the engine type of every leaf,
//! it compiles a tree of column writers that tracks definition and
//! repetition levels through structs, lists and maps, narrows each value to
//! its physical representation and assembles data pages in either the V1 or
//! the V2 page format.
//!
//! ## Key Features
//!
//! - **Nested levels**: Dremel-style definition / repetition levels, identical
//!   to the ones the `parquet` crate derives for the same schema.
//!
//! - **Typed strategies**: one value writer per engine type, bound once per
//!   leaf, with range checks for narrow integers, decimals and time units.
//!
//! - **Two page generations**: data page V1 (length-prefixed levels) and
//!   V2 (bare levels, null and row counts in the header), selected per file.
//!
//! - **Pluggable encoders**: value and level encoders come from a
//!   [`PageProperties`](encoding::PageProperties) implementation; PLAIN and
//!   RLE / bit-packed hybrid encoders are included.
//!
//! ## Quick Start
//!
//! ```rust
//! use nestwrite::prelude::*;
//!
//! let converted = convert_columns("example", &[
//!     EngineColumn::required("id", EngineType::BigInt),
//!     EngineColumn::new("tags", EngineType::array(EngineType::Varchar)),
//! ])?;
//!
//! let mut writer = TableWriter::try_new(&converted.schema, &converted.types, &WriterConfig::default())?;
//! writer.write_row(&[Value::from(1_i64), Value::Array(vec![Value::from("a"), Value::from("b")])])?;
//! writer.write_row(&[Value::from(2_i64), Value::Null])?;
//!
//! let (chunks, stats) = writer.close()?;
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(stats.rows_written, 2);
//! # Ok::<(), nestwrite::writer::WriterError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`types`]: engine types and values
//! - [`schema`]: logical schema, paths, column descriptors, validation
//! - [`encoding`]: value / level encoder traits and default encoders
//! - [`writer`]: type mapper, value writers, column writers, compiler, pages
//! - [`ingest`]: JSON and Arrow adapters producing values

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod encoding;
pub mod ingest;
pub mod schema;
pub mod types;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::encoding::{DefaultPageProperties, PageProperties};
    pub use crate::schema::{
        convert_columns, ColumnDescriptor, ConvertedSchema, EngineColumn, LogicalAnnotation,
        MessageSchema, SchemaNode, SchemaPath, TimeUnit,
    };
    pub use crate::types::{EngineType, RowField, TimestampWithTimeZone, Value};
    pub use crate::writer::{
        get_column_writers, ColumnChunk, ColumnWriter, CompressionType, EncodedPage, TableWriter,
        WriterConfig, WriterError, WriterStats, WriterVersion,
    };
}
