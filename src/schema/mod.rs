//! # Logical Schema
//!
//! The nested logical schema that drives writer construction.
//!
//! A [`MessageSchema`] is an ordered list of [`SchemaNode`]s. Each node is a
//! primitive leaf, a struct, a list or a map; lists and maps always use the
//! standard three-level Parquet layout:
//!
//! ```text
//! optional group tags (LIST) {
//!   repeated group list {
//!     optional binary element (STRING);
//!   }
//! }
//! optional group attrs (MAP) {
//!   repeated group key_value {
//!     required binary key (STRING);
//!     optional int64 value;
//!   }
//! }
//! ```
//!
//! Leaves are addressed by [`SchemaPath`], which includes the synthetic
//! `list` / `key_value` group names (`tags.list.element`).

pub mod convert;
mod descriptor;
mod node;
mod parquet_schema;
mod path;
mod validation;


pub use convert::{convert_columns, ConvertedSchema, EngineColumn};
pub use descriptor::ColumnDescriptor;
pub use node::{
    LogicalAnnotation, MessageSchema, NodeKind, PrimitiveNode, SchemaNode, TimeUnit,
    LIST_GROUP_NAME, MAP_GROUP_NAME,
};
pub use path::SchemaPath;
pub use validation::{validate_schema, SchemaValidationError};
