//! Struct, array and map writers.
//!
//! Composites own their children and translate one nested value into level
//! records on every descendant leaf:
//!
//! - a null composite sends `max_def - 1` to every descendant
//! - an empty array or map sends one record at `max_def` ("present but empty")
//! - the first element of an array or map inherits the incoming repetition
//!   level, the following ones use the level of the repeated group

use crate::schema::SchemaPath;
use crate::types::Value;

use super::column::ColumnWriter;
use super::error::{Result, WriterError};

/// Levels and nullability of a composite node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLevels {
    /// Definition level of the node itself
    pub max_definition_level: u16,
    /// Repetition level of the node itself
    pub max_repetition_level: u16,
    /// Whether the node may be null
    pub nullable: bool,
}

impl NodeLevels {
    fn null_definition_level(&self, path: &SchemaPath) -> Result<u16> {
        if self.nullable {
            Ok(self.max_definition_level - 1)
        } else {
            Err(WriterError::NullInRequiredField { path: path.clone() })
        }
    }
}

/// Writer for a struct: one child per field
#[derive(Debug)]
pub struct StructColumnWriter {
    path: SchemaPath,
    levels: NodeLevels,
    fields: Vec<ColumnWriter>,
}

impl StructColumnWriter {
    /// Create a struct writer over its field writers, in declaration order
    pub fn new(path: SchemaPath, levels: NodeLevels, fields: Vec<ColumnWriter>) -> Self {
        Self {
            path,
            levels,
            fields,
        }
    }

    /// Node path
    pub fn path(&self) -> &SchemaPath {
        &self.path
    }

    /// Node levels
    pub fn levels(&self) -> NodeLevels {
        self.levels
    }

    /// Field writers
    pub fn fields(&self) -> &[ColumnWriter] {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [ColumnWriter] {
        &mut self.fields
    }

    pub(crate) fn into_fields(self) -> Vec<ColumnWriter> {
        self.fields
    }

    /// Write a row value (or null) at repetition level `rep`
    pub fn write_value(&mut self, value: &Value, rep: u16) -> Result<()> {
        match value {
            Value::Null => {
                let def = self.levels.null_definition_level(&self.path)?;
                self.write_null(def, rep)
            }
            Value::Row(values) => {
                if values.len() != self.fields.len() {
                    return Err(WriterError::structural(
                        &self.path,
                        format!(
                            "row has {} values, struct has {} fields",
                            values.len(),
                            self.fields.len()
                        ),
                    ));
                }
                for (field, value) in self.fields.iter_mut().zip(values) {
                    field.write_value(value, rep)?;
                }
                Ok(())
            }
            other => Err(WriterError::structural(
                &self.path,
                format!("expected row, found {}", other.kind_name()),
            )),
        }
    }

    /// Propagate a null to every field
    pub fn write_null(&mut self, def: u16, rep: u16) -> Result<()> {
        for field in &mut self.fields {
            field.write_null(def, rep)?;
        }
        Ok(())
    }
}

/// Writer for a three-level list
#[derive(Debug)]
pub struct ArrayColumnWriter {
    path: SchemaPath,
    levels: NodeLevels,
    element: Box<ColumnWriter>,
}

impl ArrayColumnWriter {
    /// Create an array writer over its element writer
    pub fn new(path: SchemaPath, levels: NodeLevels, element: ColumnWriter) -> Self {
        Self {
            path,
            levels,
            element: Box::new(element),
        }
    }

    /// Node path
    pub fn path(&self) -> &SchemaPath {
        &self.path
    }

    /// Node levels
    pub fn levels(&self) -> NodeLevels {
        self.levels
    }

    /// Repetition level of every element after the first
    pub fn element_repetition_level(&self) -> u16 {
        self.levels.max_repetition_level + 1
    }

    /// Element writer
    pub fn element(&self) -> &ColumnWriter {
        &self.element
    }

    pub(crate) fn element_mut(&mut self) -> &mut ColumnWriter {
        &mut self.element
    }

    pub(crate) fn into_element(self) -> ColumnWriter {
        *self.element
    }

    /// Write an array value (or null) at repetition level `rep`
    pub fn write_value(&mut self, value: &Value, rep: u16) -> Result<()> {
        match value {
            Value::Null => {
                let def = self.levels.null_definition_level(&self.path)?;
                self.element.write_null(def, rep)
            }
            Value::Array(items) if items.is_empty() => {
                self.element.write_null(self.levels.max_definition_level, rep)
            }
            Value::Array(items) => {
                let repeated = self.element_repetition_level();
                for (i, item) in items.iter().enumerate() {
                    let level = if i == 0 { rep } else { repeated };
                    self.element.write_value(item, level)?;
                }
                Ok(())
            }
            other => Err(WriterError::structural(
                &self.path,
                format!("expected array, found {}", other.kind_name()),
            )),
        }
    }

    /// Propagate a null to the element
    pub fn write_null(&mut self, def: u16, rep: u16) -> Result<()> {
        self.element.write_null(def, rep)
    }
}

/// Writer for a three-level map
#[derive(Debug)]
pub struct MapColumnWriter {
    path: SchemaPath,
    levels: NodeLevels,
    key: Box<ColumnWriter>,
    value: Box<ColumnWriter>,
}

impl MapColumnWriter {
    /// Create a map writer over its key and value writers
    pub fn new(path: SchemaPath, levels: NodeLevels, key: ColumnWriter, value: ColumnWriter) -> Self {
        Self {
            path,
            levels,
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Node path
    pub fn path(&self) -> &SchemaPath {
        &self.path
    }

    /// Node levels
    pub fn levels(&self) -> NodeLevels {
        self.levels
    }

    /// Repetition level of every entry after the first
    pub fn entry_repetition_level(&self) -> u16 {
        self.levels.max_repetition_level + 1
    }

    /// Key writer
    pub fn key(&self) -> &ColumnWriter {
        &self.key
    }

    /// Value writer
    pub fn value(&self) -> &ColumnWriter {
        &self.value
    }

    pub(crate) fn children_mut(&mut self) -> [&mut ColumnWriter; 2] {
        [&mut *self.key, &mut *self.value]
    }

    pub(crate) fn into_children(self) -> (ColumnWriter, ColumnWriter) {
        (*self.key, *self.value)
    }

    /// Write a map value (or null) at repetition level `rep`
    pub fn write_value(&mut self, value: &Value, rep: u16) -> Result<()> {
        match value {
            Value::Null => {
                let def = self.levels.null_definition_level(&self.path)?;
                self.write_null(def, rep)
            }
            Value::Map(entries) if entries.is_empty() => {
                self.write_null(self.levels.max_definition_level, rep)
            }
            Value::Map(entries) => {
                // Reject null keys before any entry is written.
                if entries.iter().any(|(key, _)| key.is_null()) {
                    return Err(WriterError::NullInRequiredField {
                        path: self.key.path().clone(),
                    });
                }
                let repeated = self.entry_repetition_level();
                for (i, (key, value)) in entries.iter().enumerate() {
                    let level = if i == 0 { rep } else { repeated };
                    self.key.write_value(key, level)?;
                    self.value.write_value(value, level)?;
                }
                Ok(())
            }
            other => Err(WriterError::structural(
                &self.path,
                format!("expected map, found {}", other.kind_name()),
            )),
        }
    }

    /// Propagate a null to key and value
    pub fn write_null(&mut self, def: u16, rep: u16) -> Result<()> {
        self.key.write_null(def, rep)?;
        self.value.write_null(def, rep)
    }
}
