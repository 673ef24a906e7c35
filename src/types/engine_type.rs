use std::fmt;

use serde::{Deserialize, Serialize};

/// A named field of a `row(...)` engine type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowField {
    /// Field name
    pub name: String,
    /// Field type
    #[serde(rename = "type")]
    pub engine_type: EngineType,
}

impl RowField {
    /// Create a new row field
    pub fn new(name: impl Into<String>, engine_type: EngineType) -> Self {
        Self {
            name: name.into(),
            engine_type,
        }
    }
}

/// Semantic type of a column as seen by the query engine.
///
/// Only the primitive families have a value writer strategy. Composite types
/// (`array`, `map`, `row`) describe nesting and are translated into schema
/// groups; the remaining engine types exist so that callers can describe
/// their full catalog and get a precise `UnsupportedType` error back.
///
/// In JSON the primitive types are plain strings (`"bigint"`), parameterized
/// types are single-key objects (`{"decimal": {"precision": 10, "scale": 2}}`,
/// `{"array": "integer"}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    /// 1-bit boolean
    Boolean,
    /// 8-bit signed integer
    TinyInt,
    /// 16-bit signed integer
    SmallInt,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInt,
    /// IEEE 754 single precision
    Real,
    /// IEEE 754 double precision
    Double,
    /// Fixed precision decimal
    Decimal {
        /// Total number of decimal digits (1..=38)
        precision: u8,
        /// Digits after the decimal point
        scale: u8,
    },
    /// Days since the Unix epoch
    Date,
    /// Milliseconds since midnight
    Time,
    /// Milliseconds since the Unix epoch, no zone
    Timestamp,
    /// UTC instant in milliseconds plus the original zone offset
    #[serde(rename = "timestamp_with_time_zone")]
    TimestampWithTimeZone,
    /// 128-bit identifier
    Uuid,
    /// Variable length character data
    Varchar,
    /// Fixed length character data
    Char(u32),
    /// Variable length binary data
    Varbinary,
    /// Ordered sequence of elements
    Array(Box<EngineType>),
    /// Key/value pairs
    Map {
        /// Key type
        key: Box<EngineType>,
        /// Value type
        value: Box<EngineType>,
    },
    /// Named fields
    Row(Vec<RowField>),
    /// JSON document
    Json,
    /// Day-to-second interval
    #[serde(rename = "interval_day_to_second")]
    IntervalDayToSecond,
    /// Year-to-month interval
    #[serde(rename = "interval_year_to_month")]
    IntervalYearToMonth,
    /// IPv4/IPv6 address
    IpAddress,
}

impl EngineType {
    /// Decimal type constructor
    pub fn decimal(precision: u8, scale: u8) -> Self {
        Self::Decimal { precision, scale }
    }

    /// Array type constructor
    pub fn array(element: EngineType) -> Self {
        Self::Array(Box::new(element))
    }

    /// Map type constructor
    pub fn map(key: EngineType, value: EngineType) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Row type constructor
    pub fn row(fields: Vec<RowField>) -> Self {
        Self::Row(fields)
    }

    /// True for `array`, `map` and `row`
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Map { .. } | Self::Row(_))
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::TinyInt => write!(f, "tinyint"),
            Self::SmallInt => write!(f, "smallint"),
            Self::Integer => write!(f, "integer"),
            Self::BigInt => write!(f, "bigint"),
            Self::Real => write!(f, "real"),
            Self::Double => write!(f, "double"),
            Self::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            Self::Date => write!(f, "date"),
            Self::Time => write!(f, "time"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::TimestampWithTimeZone => write!(f, "timestamp with time zone"),
            Self::Uuid => write!(f, "uuid"),
            Self::Varchar => write!(f, "varchar"),
            Self::Char(length) => write!(f, "char({length})"),
            Self::Varbinary => write!(f, "varbinary"),
            Self::Array(element) => write!(f, "array({element})"),
            Self::Map { key, value } => write!(f, "map({key}, {value})"),
            Self::Row(fields) => {
                write!(f, "row(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", field.name, field.engine_type)?;
                }
                write!(f, ")")
            }
            Self::Json => write!(f, "json"),
            Self::IntervalDayToSecond => write!(f, "interval day to second"),
            Self::IntervalYearToMonth => write!(f, "interval year to month"),
            Self::IpAddress => write!(f, "ipaddress"),
        }
    }
}
