//! # Ingest Adapters
//!
//! Turn external data into the [`Value`](crate::types::Value)s consumed by
//! the column writers.
//!
//! - [`json`]: JSON documents guided by [`EngineType`](crate::types::EngineType)
//! - [`batch`]: Arrow arrays and record batches (feature `arrow-ingest`)

#[cfg(feature = "arrow-ingest")]
pub mod batch;
pub mod json;

/// Errors raised while converting input data
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The input has the wrong JSON shape for the engine type
    #[error("Expected {expected} for {engine_type}, found {found}")]
    TypeMismatch {
        /// SQL name of the target engine type
        engine_type: String,
        /// Expected input shape
        expected: &'static str,
        /// Offending input
        found: String,
    },

    /// A literal could not be parsed
    #[error("Invalid {engine_type} literal {literal:?}: {details}")]
    InvalidLiteral {
        /// SQL name of the target engine type
        engine_type: String,
        /// Offending literal
        literal: String,
        /// Parser message
        details: String,
    },

    /// The engine type has no value representation
    #[error("Cannot ingest values of type {0}")]
    UnsupportedType(String),

    /// The Arrow data type has no value representation
    #[error("Unsupported Arrow data type: {0}")]
    UnsupportedArrowType(String),

    /// A positional row has the wrong number of values
    #[error("Row {row} has {found} values, expected {expected}")]
    RowArity {
        /// Row index
        row: usize,
        /// Number of columns
        expected: usize,
        /// Number of values supplied
        found: usize,
    },
}
