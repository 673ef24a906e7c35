//! # Engine Types and Values
//!
//! The query-engine side of the writer: the semantic type of every column
//! ([`EngineType`]) and the row-oriented values ([`Value`]) that flow into
//! the column writers.

mod engine_type;
mod value;

pub use engine_type::{EngineType, RowField};
pub use value::{TimestampWithTimeZone, Value};
