use std::collections::HashSet;

use parquet::basic::{Repetition, Type as PhysicalType};

use super::{LogicalAnnotation, MessageSchema, NodeKind, PrimitiveNode, SchemaNode, SchemaPath};

/// Validates the structural rules the column writers rely on.
///
/// - sibling names are unique and non-empty
/// - structs have at least one field
/// - `REPEATED` only appears through list and map nodes
/// - map keys are required
/// - FIXED_LEN_BYTE_ARRAY leaves have a positive length (16 for UUID)
/// - decimal annotations have `1 <= precision <= 38` and `scale <= precision`
pub fn validate_schema(schema: &MessageSchema) -> Result<(), SchemaValidationError> {
    if schema.fields.is_empty() {
        return Err(SchemaValidationError::EmptyGroup(schema.name.clone()));
    }
    let mut path = SchemaPath::root();
    validate_siblings(&schema.fields, &path)?;
    for field in &schema.fields {
        validate_node(field, &mut path)?;
    }
    Ok(())
}

fn validate_siblings(fields: &[SchemaNode], parent: &SchemaPath) -> Result<(), SchemaValidationError> {
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if field.name.is_empty() {
            return Err(SchemaValidationError::EmptyName(parent.to_string()));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaValidationError::DuplicateField(parent.child(&field.name)));
        }
    }
    Ok(())
}

fn validate_node(node: &SchemaNode, path: &mut SchemaPath) -> Result<(), SchemaValidationError> {
    path.push(&node.name);
    if node.repetition == Repetition::REPEATED {
        return Err(SchemaValidationError::BareRepeated(path.clone()));
    }
    match &node.kind {
        NodeKind::Primitive(primitive) => validate_primitive(primitive, path)?,
        NodeKind::Struct { fields } => {
            if fields.is_empty() {
                return Err(SchemaValidationError::EmptyGroup(path.to_string()));
            }
            validate_siblings(fields, path)?;
            for field in fields {
                validate_node(field, path)?;
            }
        }
        NodeKind::List { element } => {
            path.push(super::LIST_GROUP_NAME);
            validate_node(element, path)?;
            path.pop();
        }
        NodeKind::Map { key, value } => {
            path.push(super::MAP_GROUP_NAME);
            if key.repetition != Repetition::REQUIRED {
                return Err(SchemaValidationError::OptionalMapKey(path.child(&key.name)));
            }
            if key.name == value.name {
                return Err(SchemaValidationError::DuplicateField(path.child(&value.name)));
            }
            validate_node(key, path)?;
            validate_node(value, path)?;
            path.pop();
        }
    }
    path.pop();
    Ok(())
}

fn validate_primitive(primitive: &PrimitiveNode, path: &SchemaPath) -> Result<(), SchemaValidationError> {
    if primitive.physical_type == PhysicalType::FIXED_LEN_BYTE_ARRAY && primitive.type_length <= 0 {
        return Err(SchemaValidationError::InvalidLength {
            path: path.clone(),
            length: primitive.type_length,
        });
    }
    match primitive.logical {
        Some(LogicalAnnotation::Uuid) if primitive.type_length != 16 => {
            Err(SchemaValidationError::InvalidLength {
                path: path.clone(),
                length: primitive.type_length,
            })
        }
        Some(LogicalAnnotation::Decimal { precision, scale })
            if precision == 0 || precision > 38 || scale > precision =>
        {
            Err(SchemaValidationError::InvalidDecimal {
                path: path.clone(),
                precision,
                scale,
            })
        }
        _ => Ok(()),
    }
}

/// Errors that can occur during schema validation
#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    /// A struct or the message itself has no fields
    #[error("Group '{0}' has no fields")]
    EmptyGroup(String),

    /// A field has an empty name
    #[error("Empty field name under '{0}'")]
    EmptyName(String),

    /// Two siblings share a name
    #[error("Duplicate field: {0}")]
    DuplicateField(SchemaPath),

    /// A node is REPEATED outside of a list or map
    #[error("Repeated field '{0}' must be expressed as a list or map")]
    BareRepeated(SchemaPath),

    /// A map key is not required
    #[error("Map key '{0}' must be required")]
    OptionalMapKey(SchemaPath),

    /// A fixed length column has an invalid length
    #[error("Invalid fixed length {length} for column '{path}'")]
    InvalidLength {
        /// Column path
        path: SchemaPath,
        /// Declared length
        length: i32,
    },

    /// A decimal annotation is out of range
    #[error("Invalid decimal({precision},{scale}) annotation for column '{path}'")]
    InvalidDecimal {
        /// Column path
        path: SchemaPath,
        /// Declared precision
        precision: u8,
        /// Declared scale
        scale: u8,
    },
}
