//! Schema → writer tree compiler.
//!
//! Walks the logical schema depth first, tracking the current path and the
//! running definition / repetition levels:
//!
//! - an OPTIONAL node adds one definition level
//! - the repeated group of a list or map adds one definition level and one
//!   repetition level
//!
//! Children are compiled before their parent, so a failure anywhere aborts
//! construction before any writer escapes.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace};
use parquet::basic::Compression;

use crate::encoding::PageProperties;
use crate::schema::{
    validate_schema, ColumnDescriptor, MessageSchema, NodeKind, PrimitiveNode, SchemaNode,
    SchemaPath, LIST_GROUP_NAME, MAP_GROUP_NAME,
};
use crate::types::EngineType;

use super::column::ColumnWriter;
use super::composite::{ArrayColumnWriter, MapColumnWriter, NodeLevels, StructColumnWriter};
use super::error::{Result, WriterError};
use super::primitive::PrimitiveColumnWriter;
use super::type_mapper::value_writer_kind;
use super::value_writer::ValueWriter;

/// Build one writer per top-level field of `schema`, in schema order.
///
/// `types` maps the path of every primitive leaf to its engine type.
///
/// # Errors
///
/// - `InvalidSchema` if the schema fails validation
/// - `SchemaMapping` for a leaf missing from `types`
/// - `UnsupportedType` for an engine type without a strategy
/// - `IncompatibleSchema` when a leaf's physical type cannot hold its engine type
pub fn get_column_writers(
    schema: &MessageSchema,
    types: &HashMap<SchemaPath, EngineType>,
    properties: Arc<dyn PageProperties>,
    compression: Compression,
) -> Result<Vec<ColumnWriter>> {
    validate_schema(schema)?;

    let mut compiler = Compiler {
        types,
        properties: properties.as_ref(),
        compression,
        path: SchemaPath::root(),
    };
    let mut writers = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        let writer = compiler.compile(field, 0, 0)?;
        debug!(
            "Compiled column {} ({} leaves, {})",
            writer.path(),
            field.leaf_count(),
            properties.writer_version()
        );
        writers.push(writer);
    }
    Ok(writers)
}

struct Compiler<'a> {
    types: &'a HashMap<SchemaPath, EngineType>,
    properties: &'a dyn PageProperties,
    compression: Compression,
    path: SchemaPath,
}

impl Compiler<'_> {
    fn compile(&mut self, node: &SchemaNode, parent_def: u16, parent_rep: u16) -> Result<ColumnWriter> {
        self.path.push(&node.name);
        let result = self.compile_node(node, parent_def, parent_rep);
        self.path.pop();
        result
    }

    fn compile_node(&mut self, node: &SchemaNode, parent_def: u16, parent_rep: u16) -> Result<ColumnWriter> {
        let levels = NodeLevels {
            max_definition_level: parent_def + u16::from(node.is_optional()),
            max_repetition_level: parent_rep,
            nullable: node.is_optional(),
        };
        let def = levels.max_definition_level;
        let rep = levels.max_repetition_level;

        let writer = match &node.kind {
            NodeKind::Primitive(primitive) => {
                ColumnWriter::Primitive(self.compile_leaf(primitive, levels)?)
            }
            NodeKind::Struct { fields } => {
                let children = fields
                    .iter()
                    .map(|field| self.compile(field, def, rep))
                    .collect::<Result<Vec<_>>>()?;
                ColumnWriter::Struct(StructColumnWriter::new(self.path.clone(), levels, children))
            }
            NodeKind::List { element } => {
                self.path.push(LIST_GROUP_NAME);
                let element = self.compile(element, def + 1, rep + 1);
                self.path.pop();
                ColumnWriter::Array(ArrayColumnWriter::new(self.path.clone(), levels, element?))
            }
            NodeKind::Map { key, value } => {
                self.path.push(MAP_GROUP_NAME);
                let key = self.compile(key, def + 1, rep + 1);
                let value = self.compile(value, def + 1, rep + 1);
                self.path.pop();
                ColumnWriter::Map(MapColumnWriter::new(self.path.clone(), levels, key?, value?))
            }
        };
        Ok(writer)
    }

    fn compile_leaf(&mut self, primitive: &PrimitiveNode, levels: NodeLevels) -> Result<PrimitiveColumnWriter> {
        let engine_type = self
            .types
            .get(&self.path)
            .ok_or_else(|| WriterError::SchemaMapping {
                path: self.path.clone(),
            })?;
        let kind = value_writer_kind(engine_type)?;
        let descriptor = ColumnDescriptor::new(
            self.path.clone(),
            primitive,
            levels.max_definition_level,
            levels.max_repetition_level,
        );
        let encoder = self.properties.new_values_encoder(&descriptor);
        let value_writer = ValueWriter::new(kind, engine_type, &descriptor, encoder)?;

        trace!(
            "Leaf {}: {} as {} on {} (def {}, rep {})",
            descriptor.path,
            engine_type,
            kind,
            descriptor.physical_type,
            descriptor.max_definition_level,
            descriptor.max_repetition_level
        );

        Ok(PrimitiveColumnWriter::new(
            descriptor,
            engine_type.clone(),
            levels.nullable,
            value_writer,
            self.properties,
            self.compression,
        ))
    }
}
