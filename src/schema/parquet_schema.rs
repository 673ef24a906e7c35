use std::sync::Arc;

use parquet::basic::{ConvertedType, Repetition, Type as PhysicalType};
use parquet::errors::ParquetError;
use parquet::schema::types::{SchemaDescriptor, Type, TypePtr};

use super::{LogicalAnnotation, MessageSchema, NodeKind, PrimitiveNode, SchemaNode, TimeUnit};

impl MessageSchema {
    /// Build the equivalent `parquet` crate schema tree.
    ///
    /// Lists and maps use the standard three-level layout with legacy
    /// converted-type annotations, which every Parquet reader understands.
    pub fn to_parquet_type(&self) -> Result<TypePtr, ParquetError> {
        let fields = self
            .fields
            .iter()
            .map(node_to_parquet)
            .collect::<Result<Vec<_>, _>>()?;
        let root = Type::group_type_builder(&self.name).with_fields(fields).build()?;
        Ok(Arc::new(root))
    }

    /// Build a `parquet` crate `SchemaDescriptor` for this schema
    pub fn to_parquet_schema(&self) -> Result<SchemaDescriptor, ParquetError> {
        Ok(SchemaDescriptor::new(self.to_parquet_type()?))
    }
}

fn node_to_parquet(node: &SchemaNode) -> Result<TypePtr, ParquetError> {
    let built = match &node.kind {
        NodeKind::Primitive(primitive) => primitive_to_parquet(&node.name, node.repetition, primitive)?,
        NodeKind::Struct { fields } => {
            let fields = fields.iter().map(node_to_parquet).collect::<Result<Vec<_>, _>>()?;
            Type::group_type_builder(&node.name)
                .with_repetition(node.repetition)
                .with_fields(fields)
                .build()?
        }
        NodeKind::List { element } => {
            let repeated = Type::group_type_builder(super::LIST_GROUP_NAME)
                .with_repetition(Repetition::REPEATED)
                .with_fields(vec![node_to_parquet(element)?])
                .build()?;
            Type::group_type_builder(&node.name)
                .with_repetition(node.repetition)
                .with_converted_type(ConvertedType::LIST)
                .with_fields(vec![Arc::new(repeated)])
                .build()?
        }
        NodeKind::Map { key, value } => {
            let repeated = Type::group_type_builder(super::MAP_GROUP_NAME)
                .with_repetition(Repetition::REPEATED)
                .with_fields(vec![node_to_parquet(key)?, node_to_parquet(value)?])
                .build()?;
            Type::group_type_builder(&node.name)
                .with_repetition(node.repetition)
                .with_converted_type(ConvertedType::MAP)
                .with_fields(vec![Arc::new(repeated)])
                .build()?
        }
    };
    Ok(Arc::new(built))
}

fn primitive_to_parquet(
    name: &str,
    repetition: Repetition,
    primitive: &PrimitiveNode,
) -> Result<Type, ParquetError> {
    let mut builder = Type::primitive_type_builder(name, primitive.physical_type)
        .with_repetition(repetition)
        .with_converted_type(converted_type(primitive));
    if primitive.physical_type == PhysicalType::FIXED_LEN_BYTE_ARRAY {
        builder = builder.with_length(primitive.type_length);
    }
    if let Some(LogicalAnnotation::Decimal { precision, scale }) = primitive.logical {
        builder = builder
            .with_precision(i32::from(precision))
            .with_scale(i32::from(scale));
    }
    builder.build()
}

fn converted_type(primitive: &PrimitiveNode) -> ConvertedType {
    let Some(logical) = primitive.logical else {
        return ConvertedType::NONE;
    };
    match logical {
        LogicalAnnotation::String => ConvertedType::UTF8,
        LogicalAnnotation::Json => ConvertedType::JSON,
        LogicalAnnotation::Enum => ConvertedType::ENUM,
        LogicalAnnotation::Date => ConvertedType::DATE,
        LogicalAnnotation::Decimal { .. } => ConvertedType::DECIMAL,
        LogicalAnnotation::Time { unit, .. } => match unit {
            TimeUnit::Millis => ConvertedType::TIME_MILLIS,
            TimeUnit::Micros => ConvertedType::TIME_MICROS,
            TimeUnit::Nanos => ConvertedType::NONE,
        },
        LogicalAnnotation::Timestamp { unit, .. } => match unit {
            TimeUnit::Millis => ConvertedType::TIMESTAMP_MILLIS,
            TimeUnit::Micros => ConvertedType::TIMESTAMP_MICROS,
            TimeUnit::Nanos => ConvertedType::NONE,
        },
        LogicalAnnotation::Integer { bit_width, signed } => match (bit_width, signed) {
            (8, true) => ConvertedType::INT_8,
            (16, true) => ConvertedType::INT_16,
            (32, true) => ConvertedType::INT_32,
            (64, true) => ConvertedType::INT_64,
            (8, false) => ConvertedType::UINT_8,
            (16, false) => ConvertedType::UINT_16,
            (32, false) => ConvertedType::UINT_32,
            (64, false) => ConvertedType::UINT_64,
            _ => ConvertedType::NONE,
        },
        LogicalAnnotation::Uuid => ConvertedType::NONE,
    }
}
