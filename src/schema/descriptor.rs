use parquet::basic::Type as PhysicalType;

use super::{LogicalAnnotation, PrimitiveNode, SchemaPath};

/// Everything an encoder needs to know about one leaf column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Full path of the leaf
    pub path: SchemaPath,
    /// Physical storage type
    pub physical_type: PhysicalType,
    /// Logical annotation, if any
    pub logical: Option<LogicalAnnotation>,
    /// FIXED_LEN_BYTE_ARRAY length, 0 otherwise
    pub type_length: i32,
    /// Number of optional or repeated nodes on the path
    pub max_definition_level: u16,
    /// Number of repeated nodes on the path
    pub max_repetition_level: u16,
}

impl ColumnDescriptor {
    pub(crate) fn new(
        path: SchemaPath,
        primitive: &PrimitiveNode,
        max_definition_level: u16,
        max_repetition_level: u16,
    ) -> Self {
        Self {
            path,
            physical_type: primitive.physical_type,
            logical: primitive.logical,
            type_length: primitive.type_length,
            max_definition_level,
            max_repetition_level,
        }
    }
}
