//! Value writer strategies.
//!
//! A [`ValueWriter`] is bound at construction to one engine type and one
//! physical column. It narrows engine [`Value`]s to the physical
//! representation and hands them to the column's [`ValuesEncoder`].
//!
//! # Physical targets
//!
//! | Kind | Physical type | Written as |
//! |------|---------------|------------|
//! | Integer | INT32 | range-checked against the declared width |
//! | Decimal | INT32 / INT64 | unscaled value |
//! | Decimal | FIXED_LEN_BYTE_ARRAY | big-endian two's complement, sign-extended |
//! | Decimal | BYTE_ARRAY | minimal big-endian two's complement |
//! | Time | INT32 | milliseconds |
//! | Time | INT64 | micros (default) or nanos |
//! | Timestamp | INT64 | millis (default), micros or nanos |
//! | Uuid | FIXED_LEN_BYTE_ARRAY(16) | 16 big-endian bytes |

use parquet::basic::Type as PhysicalType;

use crate::encoding::ValuesEncoder;
use crate::schema::{ColumnDescriptor, LogicalAnnotation, SchemaPath, TimeUnit};
use crate::types::{EngineType, Value};

use super::error::{Result, WriterError};
use super::type_mapper::{ValueWriterKind, MAX_DECIMAL_PRECISION};

/// Physical representation chosen for a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Boolean,
    Int32 { bit_width: u8 },
    Int64,
    DecimalInt32 { precision: u8 },
    DecimalInt64 { precision: u8 },
    DecimalFixed { precision: u8, length: usize },
    DecimalBinary { precision: u8 },
    Date,
    TimeMillis,
    Time64 { unit: TimeUnit },
    Timestamp { unit: TimeUnit },
    TimestampUtc { unit: TimeUnit },
    Uuid,
    Float,
    Double,
    Binary,
}

impl Target {
    fn expected(self) -> &'static str {
        match self {
            Target::Boolean => "boolean",
            Target::Int32 { .. } | Target::Int64 => "integer",
            Target::DecimalInt32 { .. }
            | Target::DecimalInt64 { .. }
            | Target::DecimalFixed { .. }
            | Target::DecimalBinary { .. } => "decimal",
            Target::Date => "date",
            Target::TimeMillis | Target::Time64 { .. } => "time",
            Target::Timestamp { .. } => "timestamp",
            Target::TimestampUtc { .. } => "timestamp with time zone",
            Target::Uuid => "uuid",
            Target::Float => "real",
            Target::Double => "double",
            Target::Binary => "string or bytes",
        }
    }
}

/// Largest decimal precision a FIXED_LEN_BYTE_ARRAY of `length` bytes holds
pub fn max_precision_for_length(length: usize) -> u8 {
    if length == 0 {
        return 0;
    }
    let bits = (8 * length - 1) as f64;
    let digits = (bits * std::f64::consts::LOG10_2).floor();
    if digits >= f64::from(MAX_DECIMAL_PRECISION) {
        MAX_DECIMAL_PRECISION
    } else {
        digits as u8
    }
}

/// Strategy writing the values of one primitive leaf.
pub struct ValueWriter {
    kind: ValueWriterKind,
    target: Target,
    path: SchemaPath,
    encoder: Box<dyn ValuesEncoder>,
}

impl std::fmt::Debug for ValueWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueWriter")
            .field("kind", &self.kind)
            .field("target", &self.target)
            .field("path", &self.path)
            .field("encoding", &self.encoder.encoding())
            .finish()
    }
}

impl ValueWriter {
    /// Bind a strategy to a leaf, checking that the physical column can
    /// hold the engine type.
    pub fn new(
        kind: ValueWriterKind,
        engine_type: &EngineType,
        descriptor: &ColumnDescriptor,
        encoder: Box<dyn ValuesEncoder>,
    ) -> Result<Self> {
        let target = resolve_target(kind, descriptor).map_err(|details| {
            WriterError::IncompatibleSchema {
                path: descriptor.path.clone(),
                engine_type: engine_type.to_string(),
                physical_type: descriptor.physical_type.to_string(),
                details,
            }
        })?;
        Ok(Self {
            kind,
            target,
            path: descriptor.path.clone(),
            encoder,
        })
    }

    /// Strategy kind
    pub fn kind(&self) -> ValueWriterKind {
        self.kind
    }

    /// Encoding of the underlying encoder
    pub fn encoding(&self) -> parquet::basic::Encoding {
        self.encoder.encoding()
    }

    /// Bytes buffered since the last page
    pub fn estimated_size(&self) -> usize {
        self.encoder.estimated_size()
    }

    /// Take the encoded values of the current page
    pub fn flush_buffer(&mut self) -> bytes::Bytes {
        self.encoder.flush_buffer()
    }

    /// Narrow and encode one non-null value
    pub fn write(&mut self, value: &Value) -> Result<()> {
        match (self.target, value) {
            (Target::Boolean, Value::Boolean(v)) => self.encoder.put_boolean(*v)?,
            (Target::Int32 { bit_width }, Value::Integer(v)) => {
                let narrowed = narrow(*v, bit_width).ok_or_else(|| WriterError::IntegerOverflow {
                    path: self.path.clone(),
                    value: *v,
                    bit_width,
                })?;
                self.encoder.put_i32(narrowed)?
            }
            (Target::Int64, Value::Integer(v)) => self.encoder.put_i64(*v)?,
            (Target::DecimalInt32 { precision }, Value::Decimal(v)) => {
                self.check_precision(*v, precision)?;
                // Precision <= 9 fits in i32.
                self.encoder.put_i32(*v as i32)?
            }
            (Target::DecimalInt64 { precision }, Value::Decimal(v)) => {
                self.check_precision(*v, precision)?;
                self.encoder.put_i64(*v as i64)?
            }
            (Target::DecimalFixed { precision, length }, Value::Decimal(v)) => {
                self.check_precision(*v, precision)?;
                self.encoder.put_fixed(&decimal_to_fixed(*v, length))?
            }
            (Target::DecimalBinary { precision }, Value::Decimal(v)) => {
                self.check_precision(*v, precision)?;
                self.encoder.put_bytes(&decimal_to_minimal(*v))?
            }
            (Target::Date, Value::Date(days)) => self.encoder.put_i32(*days)?,
            (Target::TimeMillis, Value::Time(millis)) => {
                let millis = i32::try_from(*millis).map_err(|_| self.temporal(*millis, TimeUnit::Millis))?;
                self.encoder.put_i32(millis)?
            }
            (Target::Time64 { unit }, Value::Time(millis))
            | (Target::Timestamp { unit }, Value::Timestamp(millis)) => {
                let scaled = self.scale(*millis, unit)?;
                self.encoder.put_i64(scaled)?
            }
            (Target::TimestampUtc { unit }, Value::TimestampWithTimeZone(ts)) => {
                let scaled = self.scale(ts.millis_utc, unit)?;
                self.encoder.put_i64(scaled)?
            }
            (Target::Uuid, Value::Uuid(uuid)) => self.encoder.put_fixed(&uuid.to_be_bytes())?,
            (Target::Float, Value::Real(v)) => self.encoder.put_f32(*v)?,
            (Target::Double, Value::Double(v)) => self.encoder.put_f64(*v)?,
            (Target::Binary, Value::String(s)) => self.encoder.put_bytes(s.as_bytes())?,
            (Target::Binary, Value::Bytes(b)) => self.encoder.put_bytes(b)?,
            (target, other) => {
                return Err(WriterError::ValueTypeMismatch {
                    path: self.path.clone(),
                    expected: target.expected(),
                    found: other.kind_name(),
                })
            }
        }
        Ok(())
    }

    fn check_precision(&self, unscaled: i128, precision: u8) -> Result<()> {
        if unscaled.unsigned_abs() < 10u128.pow(u32::from(precision)) {
            Ok(())
        } else {
            Err(WriterError::DecimalOverflow {
                path: self.path.clone(),
                unscaled,
                precision,
            })
        }
    }

    fn scale(&self, millis: i64, unit: TimeUnit) -> Result<i64> {
        millis
            .checked_mul(unit.per_milli())
            .ok_or_else(|| self.temporal(millis, unit))
    }

    fn temporal(&self, value: i64, unit: TimeUnit) -> WriterError {
        WriterError::TemporalOverflow {
            path: self.path.clone(),
            value,
            unit,
        }
    }
}

fn narrow(value: i64, bit_width: u8) -> Option<i32> {
    let min = -(1i64 << (bit_width - 1));
    let max = (1i64 << (bit_width - 1)) - 1;
    if (min..=max).contains(&value) {
        i32::try_from(value).ok()
    } else {
        None
    }
}

/// Big-endian two's complement, sign-extended (or truncated) to `length` bytes.
///
/// Truncation only drops sign bytes because the precision was checked
/// against the length at construction.
fn decimal_to_fixed(unscaled: i128, length: usize) -> Vec<u8> {
    let bytes = unscaled.to_be_bytes();
    if length >= bytes.len() {
        let sign = if unscaled < 0 { 0xFF } else { 0x00 };
        let mut out = vec![sign; length - bytes.len()];
        out.extend_from_slice(&bytes);
        out
    } else {
        bytes[bytes.len() - length..].to_vec()
    }
}

/// Shortest big-endian two's complement encoding of `unscaled`
fn decimal_to_minimal(unscaled: i128) -> Vec<u8> {
    let bytes = unscaled.to_be_bytes();
    let sign = if unscaled < 0 { 0xFF } else { 0x00 };
    let mut start = 0;
    while start < bytes.len() - 1
        && bytes[start] == sign
        && (bytes[start + 1] & 0x80 == sign & 0x80)
    {
        start += 1;
    }
    bytes[start..].to_vec()
}

fn resolve_target(
    kind: ValueWriterKind,
    descriptor: &ColumnDescriptor,
) -> std::result::Result<Target, String> {
    let physical = descriptor.physical_type;
    let logical = descriptor.logical;
    let target = match kind {
        ValueWriterKind::Boolean => expect_physical(physical, PhysicalType::BOOLEAN, Target::Boolean)?,
        ValueWriterKind::Integer { bit_width } => {
            expect_physical(physical, PhysicalType::INT32, Target::Int32 { bit_width })?
        }
        ValueWriterKind::BigInt => expect_physical(physical, PhysicalType::INT64, Target::Int64)?,
        ValueWriterKind::Decimal { precision, scale } => {
            match logical {
                None => {}
                Some(LogicalAnnotation::Decimal {
                    precision: p,
                    scale: s,
                }) if p == precision && s == scale => {}
                Some(other) => {
                    return Err(format!(
                        "annotation {other} does not match decimal({precision},{scale})"
                    ))
                }
            }
            match physical {
                PhysicalType::INT32 if precision <= 9 => Target::DecimalInt32 { precision },
                PhysicalType::INT64 if precision <= 18 => Target::DecimalInt64 { precision },
                PhysicalType::FIXED_LEN_BYTE_ARRAY => {
                    let length = usize::try_from(descriptor.type_length).unwrap_or(0);
                    let max = max_precision_for_length(length);
                    if precision > max {
                        return Err(format!(
                            "{length} bytes hold at most {max} digits, precision is {precision}"
                        ));
                    }
                    Target::DecimalFixed { precision, length }
                }
                PhysicalType::BYTE_ARRAY => Target::DecimalBinary { precision },
                PhysicalType::INT32 | PhysicalType::INT64 => {
                    return Err(format!("precision {precision} too large for {physical}"))
                }
                _ => return Err("decimals need INT32, INT64 or a byte array".to_string()),
            }
        }
        ValueWriterKind::Date => expect_physical(physical, PhysicalType::INT32, Target::Date)?,
        ValueWriterKind::Time => {
            let unit = match logical {
                None => None,
                Some(LogicalAnnotation::Time { unit, .. }) => Some(unit),
                Some(other) => return Err(format!("annotation {other} is not a time")),
            };
            match physical {
                PhysicalType::INT32 if matches!(unit, None | Some(TimeUnit::Millis)) => {
                    Target::TimeMillis
                }
                PhysicalType::INT64 => Target::Time64 {
                    unit: unit.unwrap_or(TimeUnit::Micros),
                },
                _ => return Err("time needs INT32 millis or INT64".to_string()),
            }
        }
        ValueWriterKind::Timestamp => {
            let unit = match logical {
                None => TimeUnit::Millis,
                Some(LogicalAnnotation::Timestamp { unit, .. }) => unit,
                Some(other) => return Err(format!("annotation {other} is not a timestamp")),
            };
            expect_physical(physical, PhysicalType::INT64, Target::Timestamp { unit })?
        }
        ValueWriterKind::TimestampWithTimeZone => {
            let unit = match logical {
                None => TimeUnit::Millis,
                Some(LogicalAnnotation::Timestamp {
                    unit,
                    adjusted_to_utc: true,
                }) => unit,
                Some(other) => {
                    return Err(format!("annotation {other} is not an instant adjusted to UTC"))
                }
            };
            expect_physical(physical, PhysicalType::INT64, Target::TimestampUtc { unit })?
        }
        ValueWriterKind::Uuid => {
            if physical != PhysicalType::FIXED_LEN_BYTE_ARRAY || descriptor.type_length != 16 {
                return Err("uuid needs FIXED_LEN_BYTE_ARRAY(16)".to_string());
            }
            Target::Uuid
        }
        ValueWriterKind::Real => expect_physical(physical, PhysicalType::FLOAT, Target::Float)?,
        ValueWriterKind::Double => expect_physical(physical, PhysicalType::DOUBLE, Target::Double)?,
        ValueWriterKind::Binary => expect_physical(physical, PhysicalType::BYTE_ARRAY, Target::Binary)?,
    };
    Ok(target)
}

fn expect_physical(
    physical: PhysicalType,
    expected: PhysicalType,
    target: Target,
) -> std::result::Result<Target, String> {
    if physical == expected {
        Ok(target)
    } else {
        Err(format!("expected {expected}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_precision_for_length() {
        assert_eq!(max_precision_for_length(1), 2);
        assert_eq!(max_precision_for_length(4), 9);
        assert_eq!(max_precision_for_length(8), 18);
        assert_eq!(max_precision_for_length(16), 38);
        assert_eq!(max_precision_for_length(32), 38);
    }

    #[test]
    fn test_decimal_to_fixed_sign_extends() {
        assert_eq!(decimal_to_fixed(1, 4), vec![0, 0, 0, 1]);
        assert_eq!(decimal_to_fixed(-1, 4), vec![0xFF; 4]);
        let wide = decimal_to_fixed(-2, 18);
        assert_eq!(wide.len(), 18);
        assert_eq!(wide[17], 0xFE);
        assert!(wide[..17].iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn test_decimal_to_minimal() {
        assert_eq!(decimal_to_minimal(0), vec![0x00]);
        assert_eq!(decimal_to_minimal(127), vec![0x7F]);
        assert_eq!(decimal_to_minimal(128), vec![0x00, 0x80]);
        assert_eq!(decimal_to_minimal(-1), vec![0xFF]);
        assert_eq!(decimal_to_minimal(-128), vec![0x80]);
        assert_eq!(decimal_to_minimal(-129), vec![0xFF, 0x7F]);
    }

    #[test]
    fn test_narrow() {
        assert_eq!(narrow(127, 8), Some(127));
        assert_eq!(narrow(128, 8), None);
        assert_eq!(narrow(-32768, 16), Some(-32768));
        assert_eq!(narrow(i64::from(i32::MAX) + 1, 32), None);
    }
}
