//! Arrow arrays → [`Value`]s.
//!
//! Supports booleans, signed and small unsigned integers, floats, UTF-8 and
//! binary strings, `Date32`, `Time32(ms)`, `Time64(µs)`, timestamps of every
//! unit (converted to milliseconds), `Decimal128`, lists, maps and structs.
//! Timestamps carrying a time zone become zoned values with a zero offset.

use arrow::array::{
    Array, BinaryArray, BooleanArray, Date32Array, Decimal128Array, FixedSizeBinaryArray, Float32Array,
    Float64Array, Int16Array, Int32Array, Int64Array, Int8Array, LargeBinaryArray, LargeListArray,
    LargeStringArray, ListArray, MapArray, StringArray, StructArray, Time32MillisecondArray,
    Time64MicrosecondArray, TimestampMicrosecondArray, TimestampMillisecondArray,
    TimestampNanosecondArray, TimestampSecondArray, UInt16Array, UInt32Array, UInt8Array,
};
use arrow::datatypes::{DataType, TimeUnit as ArrowTimeUnit};
use arrow::record_batch::RecordBatch;

use crate::types::{TimestampWithTimeZone, Value};

use super::IngestError;

/// Convert every column of a batch, column-major
pub fn record_batch_columns(batch: &RecordBatch) -> Result<Vec<Vec<Value>>, IngestError> {
    batch
        .columns()
        .iter()
        .map(|column| array_values(column.as_ref()))
        .collect()
}

/// Convert every slot of an array
pub fn array_values(array: &dyn Array) -> Result<Vec<Value>, IngestError> {
    (0..array.len()).map(|index| array_value(array, index)).collect()
}

fn downcast<'a, T: 'static>(array: &'a dyn Array) -> Result<&'a T, IngestError> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| IngestError::UnsupportedArrowType(array.data_type().to_string()))
}

/// Convert one slot of an array
pub fn array_value(array: &dyn Array, index: usize) -> Result<Value, IngestError> {
    if array.is_null(index) {
        return Ok(Value::Null);
    }
    let value = match array.data_type() {
        DataType::Boolean => Value::Boolean(downcast::<BooleanArray>(array)?.value(index)),
        DataType::Int8 => Value::Integer(i64::from(downcast::<Int8Array>(array)?.value(index))),
        DataType::Int16 => Value::Integer(i64::from(downcast::<Int16Array>(array)?.value(index))),
        DataType::Int32 => Value::Integer(i64::from(downcast::<Int32Array>(array)?.value(index))),
        DataType::Int64 => Value::Integer(downcast::<Int64Array>(array)?.value(index)),
        DataType::UInt8 => Value::Integer(i64::from(downcast::<UInt8Array>(array)?.value(index))),
        DataType::UInt16 => Value::Integer(i64::from(downcast::<UInt16Array>(array)?.value(index))),
        DataType::UInt32 => Value::Integer(i64::from(downcast::<UInt32Array>(array)?.value(index))),
        DataType::Float32 => Value::Real(downcast::<Float32Array>(array)?.value(index)),
        DataType::Float64 => Value::Double(downcast::<Float64Array>(array)?.value(index)),
        DataType::Utf8 => Value::String(downcast::<StringArray>(array)?.value(index).to_string()),
        DataType::LargeUtf8 => {
            Value::String(downcast::<LargeStringArray>(array)?.value(index).to_string())
        }
        DataType::Binary => Value::Bytes(downcast::<BinaryArray>(array)?.value(index).to_vec()),
        DataType::LargeBinary => {
            Value::Bytes(downcast::<LargeBinaryArray>(array)?.value(index).to_vec())
        }
        DataType::FixedSizeBinary(_) => {
            Value::Bytes(downcast::<FixedSizeBinaryArray>(array)?.value(index).to_vec())
        }
        DataType::Date32 => Value::Date(downcast::<Date32Array>(array)?.value(index)),
        DataType::Time32(ArrowTimeUnit::Millisecond) => {
            Value::Time(i64::from(downcast::<Time32MillisecondArray>(array)?.value(index)))
        }
        DataType::Time64(ArrowTimeUnit::Microsecond) => {
            Value::Time(downcast::<Time64MicrosecondArray>(array)?.value(index).div_euclid(1_000))
        }
        DataType::Timestamp(unit, zone) => {
            let millis = match unit {
                ArrowTimeUnit::Second => downcast::<TimestampSecondArray>(array)?
                    .value(index)
                    .checked_mul(1_000)
                    .ok_or_else(|| IngestError::UnsupportedArrowType("timestamp out of range".to_string()))?,
                ArrowTimeUnit::Millisecond => downcast::<TimestampMillisecondArray>(array)?.value(index),
                ArrowTimeUnit::Microsecond => {
                    downcast::<TimestampMicrosecondArray>(array)?.value(index).div_euclid(1_000)
                }
                ArrowTimeUnit::Nanosecond => {
                    downcast::<TimestampNanosecondArray>(array)?.value(index).div_euclid(1_000_000)
                }
            };
            match zone {
                Some(_) => Value::TimestampWithTimeZone(TimestampWithTimeZone::new(millis, 0)),
                None => Value::Timestamp(millis),
            }
        }
        DataType::Decimal128(_, _) => Value::Decimal(downcast::<Decimal128Array>(array)?.value(index)),
        DataType::List(_) => {
            let list = downcast::<ListArray>(array)?;
            Value::Array(array_values(list.value(index).as_ref())?)
        }
        DataType::LargeList(_) => {
            let list = downcast::<LargeListArray>(array)?;
            Value::Array(array_values(list.value(index).as_ref())?)
        }
        DataType::Map(_, _) => {
            let entries = downcast::<MapArray>(array)?.value(index);
            let keys = array_values(entries.column(0).as_ref())?;
            let values = array_values(entries.column(1).as_ref())?;
            Value::Map(keys.into_iter().zip(values).collect())
        }
        DataType::Struct(_) => {
            let row = downcast::<StructArray>(array)?;
            Value::Row(
                row.columns()
                    .iter()
                    .map(|column| array_value(column.as_ref(), index))
                    .collect::<Result<_, _>>()?,
            )
        }
        other => return Err(IngestError::UnsupportedArrowType(other.to_string())),
    };
    Ok(value)
}
