//! Engine-typed column lists to logical schemas.
//!
//! Produces both halves of the compiler input: the [`MessageSchema`] and the
//! path → engine type mapping, with the physical layout the writer expects
//! for every engine type.

use std::collections::HashMap;

use parquet::basic::{Repetition, Type as PhysicalType};
use serde::{Deserialize, Serialize};

use crate::types::EngineType;
use crate::writer::WriterError;

use super::{LogicalAnnotation, MessageSchema, SchemaNode, SchemaPath, TimeUnit};

/// Name given to list elements
pub const ELEMENT_NAME: &str = "element";
/// Name given to map keys
pub const KEY_NAME: &str = "key";
/// Name given to map values
pub const VALUE_NAME: &str = "value";

fn default_nullable() -> bool {
    true
}

/// A top-level column described by its engine type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineColumn {
    /// Column name
    pub name: String,
    /// Engine type
    #[serde(rename = "type")]
    pub engine_type: EngineType,
    /// Whether the column may be null (default: true)
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

impl EngineColumn {
    /// Nullable column
    pub fn new(name: impl Into<String>, engine_type: EngineType) -> Self {
        Self {
            name: name.into(),
            engine_type,
            nullable: true,
        }
    }

    /// Non-nullable column
    pub fn required(name: impl Into<String>, engine_type: EngineType) -> Self {
        Self {
            nullable: false,
            ..Self::new(name, engine_type)
        }
    }
}

/// Output of [`convert_columns`]
#[derive(Debug, Clone)]
pub struct ConvertedSchema {
    /// Logical schema
    pub schema: MessageSchema,
    /// Engine type of every primitive leaf
    pub types: HashMap<SchemaPath, EngineType>,
}

/// Translate engine-typed columns into a schema plus the leaf type mapping.
///
/// Nested fields (array elements, map values, row fields) are nullable, map
/// keys are required. Engine types with no storage layout fail with
/// `UnsupportedType`.
pub fn convert_columns(
    schema_name: &str,
    columns: &[EngineColumn],
) -> Result<ConvertedSchema, WriterError> {
    let mut types = HashMap::new();
    let mut path = SchemaPath::root();
    let mut fields = Vec::with_capacity(columns.len());
    for column in columns {
        let repetition = if column.nullable {
            Repetition::OPTIONAL
        } else {
            Repetition::REQUIRED
        };
        fields.push(convert_type(
            &column.name,
            &column.engine_type,
            repetition,
            &mut path,
            &mut types,
        )?);
    }
    Ok(ConvertedSchema {
        schema: MessageSchema::new(schema_name, fields),
        types,
    })
}

fn convert_type(
    name: &str,
    engine_type: &EngineType,
    repetition: Repetition,
    path: &mut SchemaPath,
    types: &mut HashMap<SchemaPath, EngineType>,
) -> Result<SchemaNode, WriterError> {
    path.push(name);
    let node = match engine_type {
        EngineType::Array(element) => {
            path.push(super::LIST_GROUP_NAME);
            let element = convert_type(ELEMENT_NAME, element, Repetition::OPTIONAL, path, types)?;
            path.pop();
            SchemaNode::list(name, element)
        }
        EngineType::Map { key, value } => {
            path.push(super::MAP_GROUP_NAME);
            let key = convert_type(KEY_NAME, key, Repetition::REQUIRED, path, types)?;
            let value = convert_type(VALUE_NAME, value, Repetition::OPTIONAL, path, types)?;
            path.pop();
            SchemaNode::map(name, key, value)
        }
        EngineType::Row(fields) => {
            let children = fields
                .iter()
                .map(|field| {
                    convert_type(&field.name, &field.engine_type, Repetition::OPTIONAL, path, types)
                })
                .collect::<Result<Vec<_>, _>>()?;
            SchemaNode::structure(name, children)
        }
        primitive => {
            types.insert(path.clone(), primitive.clone());
            primitive_node(name, primitive)?
        }
    };
    path.pop();
    Ok(node.with_repetition(repetition))
}

fn primitive_node(name: &str, engine_type: &EngineType) -> Result<SchemaNode, WriterError> {
    let node = match engine_type {
        EngineType::Boolean => SchemaNode::primitive(name, PhysicalType::BOOLEAN),
        EngineType::TinyInt => integer(name, 8),
        EngineType::SmallInt => integer(name, 16),
        EngineType::Integer => SchemaNode::primitive(name, PhysicalType::INT32),
        EngineType::BigInt => SchemaNode::primitive(name, PhysicalType::INT64),
        EngineType::Real => SchemaNode::primitive(name, PhysicalType::FLOAT),
        EngineType::Double => SchemaNode::primitive(name, PhysicalType::DOUBLE),
        EngineType::Decimal { precision, scale } => {
            let annotation = LogicalAnnotation::Decimal {
                precision: *precision,
                scale: *scale,
            };
            let node = if *precision <= 9 {
                SchemaNode::primitive(name, PhysicalType::INT32)
            } else if *precision <= 18 {
                SchemaNode::primitive(name, PhysicalType::INT64)
            } else {
                SchemaNode::primitive(name, PhysicalType::FIXED_LEN_BYTE_ARRAY).with_length(16)
            };
            node.with_logical(annotation)
        }
        EngineType::Date => {
            SchemaNode::primitive(name, PhysicalType::INT32).with_logical(LogicalAnnotation::Date)
        }
        EngineType::Time => SchemaNode::primitive(name, PhysicalType::INT64).with_logical(
            LogicalAnnotation::Time {
                unit: TimeUnit::Micros,
                adjusted_to_utc: false,
            },
        ),
        EngineType::Timestamp => SchemaNode::primitive(name, PhysicalType::INT64).with_logical(
            LogicalAnnotation::Timestamp {
                unit: TimeUnit::Millis,
                adjusted_to_utc: false,
            },
        ),
        EngineType::TimestampWithTimeZone => SchemaNode::primitive(name, PhysicalType::INT64)
            .with_logical(LogicalAnnotation::Timestamp {
                unit: TimeUnit::Millis,
                adjusted_to_utc: true,
            }),
        EngineType::Uuid => SchemaNode::primitive(name, PhysicalType::FIXED_LEN_BYTE_ARRAY)
            .with_length(16)
            .with_logical(LogicalAnnotation::Uuid),
        EngineType::Varchar | EngineType::Char(_) => SchemaNode::primitive(name, PhysicalType::BYTE_ARRAY)
            .with_logical(LogicalAnnotation::String),
        EngineType::Varbinary => SchemaNode::primitive(name, PhysicalType::BYTE_ARRAY),
        // Stored as text; the writer itself has no strategy for json.
        EngineType::Json => SchemaNode::primitive(name, PhysicalType::BYTE_ARRAY)
            .with_logical(LogicalAnnotation::Json),
        other => {
            return Err(WriterError::UnsupportedType {
                engine_type: other.to_string(),
            })
        }
    };
    Ok(node)
}

fn integer(name: &str, bit_width: u8) -> SchemaNode {
    SchemaNode::primitive(name, PhysicalType::INT32).with_logical(LogicalAnnotation::Integer {
        bit_width,
        signed: true,
    })
}
