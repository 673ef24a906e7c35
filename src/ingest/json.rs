//! JSON → [`Value`] conversion.
//!
//! | Engine type | Accepted JSON |
//! |-------------|---------------|
//! | integers | number |
//! | real, double | number |
//! | decimal(p,s) | string or number, at most `s` fractional digits |
//! | date | `"YYYY-MM-DD"` or days since epoch |
//! | time | `"HH:MM:SS[.fff]"` or millis of day |
//! | timestamp | `"YYYY-MM-DD HH:MM:SS[.fff]"` (or `T`) or epoch millis |
//! | timestamp with time zone | RFC 3339 string or epoch millis (UTC) |
//! | uuid | hyphenated string |
//! | varchar, char | string |
//! | varbinary | string (UTF-8 bytes) or array of bytes |
//! | array | array |
//! | map | object, or array of `[key, value]` pairs |
//! | row | object by field name, or positional array |
//!
//! `null` converts to [`Value::Null`] for every type.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde_json::Value as JsonValue;

use crate::schema::EngineColumn;
use crate::types::{EngineType, TimestampWithTimeZone, Value};

use super::IngestError;

/// Convert one JSON value to an engine value of `engine_type`
pub fn value_from_json(json: &JsonValue, engine_type: &EngineType) -> Result<Value, IngestError> {
    if json.is_null() {
        return Ok(Value::Null);
    }
    let value = match engine_type {
        EngineType::Boolean => Value::Boolean(
            json.as_bool()
                .ok_or_else(|| mismatch(engine_type, "boolean", json))?,
        ),
        EngineType::TinyInt | EngineType::SmallInt | EngineType::Integer | EngineType::BigInt => {
            Value::Integer(integer(json, engine_type)?)
        }
        EngineType::Real => Value::Real(number(json, engine_type)? as f32),
        EngineType::Double => Value::Double(number(json, engine_type)?),
        EngineType::Decimal { scale, .. } => {
            let literal = match json {
                JsonValue::String(s) => s.clone(),
                JsonValue::Number(n) => n.to_string(),
                other => return Err(mismatch(engine_type, "decimal string or number", other)),
            };
            Value::Decimal(parse_decimal(&literal, *scale).map_err(|details| invalid(engine_type, &literal, details))?)
        }
        EngineType::Date => match json {
            JsonValue::String(s) => {
                let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|e| invalid(engine_type, s, e.to_string()))?;
                Value::Date(date.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
            }
            other => {
                let days = integer(other, engine_type)?;
                Value::Date(
                    i32::try_from(days).map_err(|e| invalid(engine_type, &days.to_string(), e.to_string()))?,
                )
            }
        },
        EngineType::Time => match json {
            JsonValue::String(s) => {
                let time = NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
                    .map_err(|e| invalid(engine_type, s, e.to_string()))?;
                Value::Time(
                    i64::from(time.num_seconds_from_midnight()) * 1000
                        + i64::from(time.nanosecond() / 1_000_000),
                )
            }
            other => Value::Time(integer(other, engine_type)?),
        },
        EngineType::Timestamp => match json {
            JsonValue::String(s) => {
                let parsed = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
                    .map_err(|e| invalid(engine_type, s, e.to_string()))?;
                Value::Timestamp(parsed.and_utc().timestamp_millis())
            }
            other => Value::Timestamp(integer(other, engine_type)?),
        },
        EngineType::TimestampWithTimeZone => match json {
            JsonValue::String(s) => {
                let parsed = DateTime::parse_from_rfc3339(s)
                    .map_err(|e| invalid(engine_type, s, e.to_string()))?;
                let offset_minutes = parsed.offset().local_minus_utc() / 60;
                Value::TimestampWithTimeZone(TimestampWithTimeZone::new(
                    parsed.timestamp_millis(),
                    // Offsets are bounded by a day, well within i16.
                    offset_minutes as i16,
                ))
            }
            other => Value::TimestampWithTimeZone(TimestampWithTimeZone::new(integer(other, engine_type)?, 0)),
        },
        EngineType::Uuid => {
            let s = json
                .as_str()
                .ok_or_else(|| mismatch(engine_type, "uuid string", json))?;
            let uuid = uuid::Uuid::parse_str(s).map_err(|e| invalid(engine_type, s, e.to_string()))?;
            Value::Uuid(uuid.as_u128())
        }
        EngineType::Varchar | EngineType::Char(_) => Value::String(
            json.as_str()
                .ok_or_else(|| mismatch(engine_type, "string", json))?
                .to_string(),
        ),
        EngineType::Varbinary => match json {
            JsonValue::String(s) => Value::Bytes(s.as_bytes().to_vec()),
            JsonValue::Array(items) => Value::Bytes(
                items
                    .iter()
                    .map(|item| {
                        item.as_u64()
                            .and_then(|b| u8::try_from(b).ok())
                            .ok_or_else(|| mismatch(engine_type, "byte", item))
                    })
                    .collect::<Result<Vec<u8>, _>>()?,
            ),
            other => return Err(mismatch(engine_type, "string or byte array", other)),
        },
        EngineType::Array(element) => {
            let items = json
                .as_array()
                .ok_or_else(|| mismatch(engine_type, "array", json))?;
            Value::Array(
                items
                    .iter()
                    .map(|item| value_from_json(item, element))
                    .collect::<Result<_, _>>()?,
            )
        }
        EngineType::Map { key, value } => map_from_json(json, engine_type, key, value)?,
        EngineType::Row(fields) => match json {
            JsonValue::Object(object) => Value::Row(
                fields
                    .iter()
                    .map(|field| {
                        value_from_json(object.get(&field.name).unwrap_or(&JsonValue::Null), &field.engine_type)
                    })
                    .collect::<Result<_, _>>()?,
            ),
            JsonValue::Array(items) if items.len() == fields.len() => Value::Row(
                items
                    .iter()
                    .zip(fields)
                    .map(|(item, field)| value_from_json(item, &field.engine_type))
                    .collect::<Result<_, _>>()?,
            ),
            other => return Err(mismatch(engine_type, "object or positional array", other)),
        },
        other => return Err(IngestError::UnsupportedType(other.to_string())),
    };
    Ok(value)
}

/// Convert a JSON array of rows for the given columns.
///
/// Each row is either a positional array with one entry per column or an
/// object keyed by column name, where missing columns are null.
pub fn rows_from_json(json: &JsonValue, columns: &[EngineColumn]) -> Result<Vec<Vec<Value>>, IngestError> {
    let rows = json.as_array().ok_or_else(|| IngestError::TypeMismatch {
        engine_type: "row".to_string(),
        expected: "array of rows",
        found: summarize(json),
    })?;
    rows.iter()
        .enumerate()
        .map(|(index, row)| match row {
            JsonValue::Array(values) => {
                if values.len() != columns.len() {
                    return Err(IngestError::RowArity {
                        row: index,
                        expected: columns.len(),
                        found: values.len(),
                    });
                }
                values
                    .iter()
                    .zip(columns)
                    .map(|(value, column)| value_from_json(value, &column.engine_type))
                    .collect()
            }
            JsonValue::Object(object) => columns
                .iter()
                .map(|column| {
                    value_from_json(object.get(&column.name).unwrap_or(&JsonValue::Null), &column.engine_type)
                })
                .collect(),
            other => Err(IngestError::TypeMismatch {
                engine_type: "row".to_string(),
                expected: "array or object",
                found: summarize(other),
            }),
        })
        .collect()
}

fn map_from_json(
    json: &JsonValue,
    engine_type: &EngineType,
    key_type: &EngineType,
    value_type: &EngineType,
) -> Result<Value, IngestError> {
    let entries = match json {
        JsonValue::Object(object) => object
            .iter()
            .map(|(key, value)| Ok((map_key(key, key_type)?, value_from_json(value, value_type)?)))
            .collect::<Result<Vec<_>, IngestError>>()?,
        JsonValue::Array(pairs) => pairs
            .iter()
            .map(|pair| match pair.as_array().map(Vec::as_slice) {
                Some([key, value]) => Ok((value_from_json(key, key_type)?, value_from_json(value, value_type)?)),
                _ => Err(mismatch(engine_type, "[key, value] pair", pair)),
            })
            .collect::<Result<Vec<_>, IngestError>>()?,
        other => return Err(mismatch(engine_type, "object or array of pairs", other)),
    };
    Ok(Value::Map(entries))
}

/// Object keys are always strings; non-string key types are parsed as JSON
fn map_key(key: &str, key_type: &EngineType) -> Result<Value, IngestError> {
    match key_type {
        EngineType::Varchar | EngineType::Char(_) | EngineType::Varbinary | EngineType::Uuid
        | EngineType::Date | EngineType::Time | EngineType::Timestamp
        | EngineType::TimestampWithTimeZone => {
            value_from_json(&JsonValue::String(key.to_string()), key_type)
        }
        _ => {
            let parsed: JsonValue =
                serde_json::from_str(key).map_err(|e| invalid(key_type, key, e.to_string()))?;
            value_from_json(&parsed, key_type)
        }
    }
}

/// Parse a decimal literal into its unscaled value at `scale`.
///
/// Fractional digits beyond the scale are rejected rather than rounded.
pub fn parse_decimal(literal: &str, scale: u8) -> Result<i128, String> {
    let trimmed = literal.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err("no digits".to_string());
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err("expected digits with an optional decimal point".to_string());
    }
    if fraction.len() > usize::from(scale) {
        return Err(format!("{} fractional digits exceed scale {scale}", fraction.len()));
    }

    let mut unscaled: i128 = 0;
    let padding = usize::from(scale) - fraction.len();
    for digit in whole
        .bytes()
        .chain(fraction.bytes())
        .chain(std::iter::repeat(b'0').take(padding))
    {
        unscaled = unscaled
            .checked_mul(10)
            .and_then(|v| v.checked_add(i128::from(digit - b'0')))
            .ok_or_else(|| "too many digits".to_string())?;
    }
    Ok(if negative { -unscaled } else { unscaled })
}

/// 1970-01-01 counted in days from 0001-01-01 (day 1)
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn integer(json: &JsonValue, engine_type: &EngineType) -> Result<i64, IngestError> {
    json.as_i64()
        .ok_or_else(|| mismatch(engine_type, "integer", json))
}

fn number(json: &JsonValue, engine_type: &EngineType) -> Result<f64, IngestError> {
    json.as_f64()
        .ok_or_else(|| mismatch(engine_type, "number", json))
}

fn mismatch(engine_type: &EngineType, expected: &'static str, found: &JsonValue) -> IngestError {
    IngestError::TypeMismatch {
        engine_type: engine_type.to_string(),
        expected,
        found: summarize(found),
    }
}

fn invalid(engine_type: &EngineType, literal: &str, details: String) -> IngestError {
    IngestError::InvalidLiteral {
        engine_type: engine_type.to_string(),
        literal: literal.to_string(),
        details,
    }
}

fn summarize(json: &JsonValue) -> String {
    let text = json.to_string();
    if text.len() > 40 {
        format!("{}...", text.chars().take(40).collect::<String>())
    } else {
        text
    }
}
