/// A timestamp with time zone: the UTC instant plus the zone it was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimestampWithTimeZone {
    /// Milliseconds since the Unix epoch, UTC
    pub millis_utc: i64,
    /// Offset of the original zone from UTC, in minutes
    pub offset_minutes: i16,
}

impl TimestampWithTimeZone {
    /// Create a new zoned timestamp
    pub fn new(millis_utc: i64, offset_minutes: i16) -> Self {
        Self {
            millis_utc,
            offset_minutes,
        }
    }
}

/// A single engine value for one position of one column.
///
/// Every integer family (`tinyint` through `bigint`) is carried as `Integer`;
/// the column's engine type decides the width it is narrowed to.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,
    /// Boolean
    Boolean(bool),
    /// Any integer family
    Integer(i64),
    /// Single precision float
    Real(f32),
    /// Double precision float
    Double(f64),
    /// Unscaled decimal; the column type carries precision and scale
    Decimal(i128),
    /// Days since the Unix epoch
    Date(i32),
    /// Milliseconds since midnight
    Time(i64),
    /// Milliseconds since the Unix epoch
    Timestamp(i64),
    /// Zoned timestamp
    TimestampWithTimeZone(TimestampWithTimeZone),
    /// 128-bit identifier, big-endian interpretation
    Uuid(u128),
    /// Character data
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Struct instance, one entry per declared field
    Row(Vec<Value>),
    /// Array instance
    Array(Vec<Value>),
    /// Map instance as ordered key/value pairs
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Short name of the variant, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Double(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampWithTimeZone(_) => "timestamp with time zone",
            Value::Uuid(_) => "uuid",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Row(_) => "row",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Returns true for `Value::Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Real(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
