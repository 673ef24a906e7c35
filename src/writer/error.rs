use crate::encoding::EncodingError;
use crate::schema::{SchemaPath, SchemaValidationError};

/// Errors that can occur while building or driving column writers.
///
/// None of these are retryable; a writer tree that returned a structural
/// error mid-row is left inconsistent and must be discarded.
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// A primitive leaf has no entry in the engine type mapping
    #[error("No engine type mapped for column {path}")]
    SchemaMapping {
        /// Path of the unmapped leaf
        path: SchemaPath,
    },

    /// The engine type has no value writer strategy
    #[error("Unsupported engine type: {engine_type}")]
    UnsupportedType {
        /// SQL name of the engine type
        engine_type: String,
    },

    /// The requested writer version is not V1 or V2
    #[error("Unsupported writer version: {0}")]
    UnsupportedWriterVersion(String),

    /// The physical column cannot hold values of the engine type
    #[error("Column {path} of type {physical_type} cannot store {engine_type}: {details}")]
    IncompatibleSchema {
        /// Leaf path
        path: SchemaPath,
        /// SQL name of the engine type
        engine_type: String,
        /// Physical type of the leaf
        physical_type: String,
        /// What is incompatible
        details: String,
    },

    /// A value's shape does not match the schema node it was written to
    #[error("Structural mismatch at {path}: {details}")]
    StructuralMismatch {
        /// Node path
        path: SchemaPath,
        /// What was expected and found
        details: String,
    },

    /// A null was written to a required node
    #[error("Null value written to required column {path}")]
    NullInRequiredField {
        /// Node path
        path: SchemaPath,
    },

    /// A primitive leaf received a value of the wrong variant
    #[error("Column {path} expects {expected} values, found {found}")]
    ValueTypeMismatch {
        /// Leaf path
        path: SchemaPath,
        /// Expected value kind
        expected: &'static str,
        /// Supplied value kind
        found: &'static str,
    },

    /// An integer does not fit the declared width
    #[error("Value {value} out of range for {bit_width}-bit column {path}")]
    IntegerOverflow {
        /// Leaf path
        path: SchemaPath,
        /// Rejected value
        value: i64,
        /// Declared width
        bit_width: u8,
    },

    /// An unscaled decimal has more digits than the declared precision
    #[error("Unscaled value {unscaled} exceeds precision {precision} of column {path}")]
    DecimalOverflow {
        /// Leaf path
        path: SchemaPath,
        /// Rejected unscaled value
        unscaled: i128,
        /// Declared precision
        precision: u8,
    },

    /// Converting a time or timestamp to the column unit overflowed
    #[error("Temporal value {value} overflows column {path} in unit {unit}")]
    TemporalOverflow {
        /// Leaf path
        path: SchemaPath,
        /// Rejected value in milliseconds
        value: i64,
        /// Target unit
        unit: crate::schema::TimeUnit,
    },

    /// Error from a low-level encoder
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// The logical schema failed validation
    #[error("Invalid schema: {0}")]
    InvalidSchema(#[from] SchemaValidationError),

    /// Error from the Parquet library while deriving schema descriptors
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The table writer failed part-way through a row earlier
    #[error("Writer is poisoned by an earlier failure and must be discarded")]
    Poisoned,

    /// Invalid writer configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while reading schemas or rows
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input values could not be converted
    #[error("Ingest error: {0}")]
    Ingest(#[from] crate::ingest::IngestError),

    /// Error from the Arrow library during ingest
    #[cfg(feature = "arrow-ingest")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// Result type of the writer module
pub type Result<T> = std::result::Result<T, WriterError>;

impl WriterError {
    pub(crate) fn structural(path: &SchemaPath, details: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            path: path.clone(),
            details: details.into(),
        }
    }

    /// True for errors raised while writing that leave a tree inconsistent
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::StructuralMismatch { .. }
                | Self::NullInRequiredField { .. }
                | Self::ValueTypeMismatch { .. }
                | Self::IntegerOverflow { .. }
                | Self::DecimalOverflow { .. }
                | Self::TemporalOverflow { .. }
                | Self::Encoding(_)
        )
    }
}
