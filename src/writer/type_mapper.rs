//! Engine type → value writer strategy.

use std::fmt;

use crate::types::EngineType;

use super::error::{Result, WriterError};

/// Maximum decimal precision any strategy supports
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Strategy selected for a primitive leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueWriterKind {
    /// BOOLEAN
    Boolean,
    /// Narrow integer stored in INT32
    Integer {
        /// Declared width: 8, 16 or 32
        bit_width: u8,
    },
    /// 64-bit integer
    BigInt,
    /// Unscaled decimal
    Decimal {
        /// Total digits
        precision: u8,
        /// Fractional digits
        scale: u8,
    },
    /// Days since epoch
    Date,
    /// Time of day
    Time,
    /// Local date-time
    Timestamp,
    /// Instant with an original offset
    TimestampWithTimeZone,
    /// 16-byte UUID
    Uuid,
    /// 32-bit float
    Real,
    /// 64-bit float
    Double,
    /// Strings and binary
    Binary,
}

impl fmt::Display for ValueWriterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Integer { bit_width } => write!(f, "int{bit_width}"),
            Self::BigInt => write!(f, "bigint"),
            Self::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            Self::Date => write!(f, "date"),
            Self::Time => write!(f, "time"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::TimestampWithTimeZone => write!(f, "timestamp_tz"),
            Self::Uuid => write!(f, "uuid"),
            Self::Real => write!(f, "real"),
            Self::Double => write!(f, "double"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// Select the strategy for an engine type.
///
/// Composite types and engine types without a storage layout (json,
/// intervals, ip addresses) fail with `UnsupportedType`, as does a decimal
/// outside `1..=38` digits or with a scale larger than its precision.
pub fn value_writer_kind(engine_type: &EngineType) -> Result<ValueWriterKind> {
    let kind = match engine_type {
        EngineType::Boolean => ValueWriterKind::Boolean,
        EngineType::TinyInt => ValueWriterKind::Integer { bit_width: 8 },
        EngineType::SmallInt => ValueWriterKind::Integer { bit_width: 16 },
        EngineType::Integer => ValueWriterKind::Integer { bit_width: 32 },
        EngineType::BigInt => ValueWriterKind::BigInt,
        EngineType::Decimal { precision, scale }
            if (1..=MAX_DECIMAL_PRECISION).contains(precision) && scale <= precision =>
        {
            ValueWriterKind::Decimal {
                precision: *precision,
                scale: *scale,
            }
        }
        EngineType::Date => ValueWriterKind::Date,
        EngineType::Time => ValueWriterKind::Time,
        EngineType::Timestamp => ValueWriterKind::Timestamp,
        EngineType::TimestampWithTimeZone => ValueWriterKind::TimestampWithTimeZone,
        EngineType::Uuid => ValueWriterKind::Uuid,
        EngineType::Real => ValueWriterKind::Real,
        EngineType::Double => ValueWriterKind::Double,
        EngineType::Varchar | EngineType::Char(_) | EngineType::Varbinary => ValueWriterKind::Binary,
        other => {
            return Err(WriterError::UnsupportedType {
                engine_type: other.to_string(),
            })
        }
    };
    Ok(kind)
}
