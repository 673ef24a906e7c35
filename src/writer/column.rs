use crate::schema::SchemaPath;
use crate::types::Value;

use super::composite::{ArrayColumnWriter, MapColumnWriter, StructColumnWriter};
use super::error::Result;
use super::page::{ColumnChunk, EncodedPage};
use super::primitive::PrimitiveColumnWriter;

/// A node of the writer tree.
///
/// The compiler returns one `ColumnWriter` per top-level schema field.
/// Values are written row by row through [`ColumnWriter::write`]; pages
/// are cut per leaf, either when a leaf reaches the page size threshold
/// after a batch or explicitly through [`ColumnWriter::flush_page`].
#[derive(Debug)]
pub enum ColumnWriter {
    /// Primitive leaf
    Primitive(PrimitiveColumnWriter),
    /// Struct of fields
    Struct(StructColumnWriter),
    /// Three-level list
    Array(ArrayColumnWriter),
    /// Three-level map
    Map(MapColumnWriter),
}

impl ColumnWriter {
    /// Path of the node
    pub fn path(&self) -> &SchemaPath {
        match self {
            ColumnWriter::Primitive(w) => w.path(),
            ColumnWriter::Struct(w) => w.path(),
            ColumnWriter::Array(w) => w.path(),
            ColumnWriter::Map(w) => w.path(),
        }
    }

    /// Write one value per row, then cut pages of leaves that reached the
    /// size threshold
    pub fn write<'a, I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        for value in values {
            self.write_value(value, 0)?;
        }
        self.for_each_leaf_mut(&mut |leaf| leaf.cut_page_if_full());
        Ok(())
    }

    /// Write a value (or null) of this node at repetition level `rep`
    pub fn write_value(&mut self, value: &Value, rep: u16) -> Result<()> {
        match self {
            ColumnWriter::Primitive(w) => w.write_value(value, rep),
            ColumnWriter::Struct(w) => w.write_value(value, rep),
            ColumnWriter::Array(w) => w.write_value(value, rep),
            ColumnWriter::Map(w) => w.write_value(value, rep),
        }
    }

    /// Record an absent value at definition level `def` on every leaf
    pub fn write_null(&mut self, def: u16, rep: u16) -> Result<()> {
        match self {
            ColumnWriter::Primitive(w) => w.write_null(def, rep),
            ColumnWriter::Struct(w) => w.write_null(def, rep),
            ColumnWriter::Array(w) => w.write_null(def, rep),
            ColumnWriter::Map(w) => w.write_null(def, rep),
        }
    }

    /// Estimated bytes buffered in the current pages of all leaves
    pub fn buffered_size(&self) -> usize {
        self.leaves().iter().map(|leaf| leaf.buffered_size()).sum()
    }

    /// Rows written since the last `flush_page`
    pub fn buffered_rows(&self) -> usize {
        // Every row produces exactly one record with repetition level 0 on
        // each leaf, so any leaf will do.
        self.leaves().first().map_or(0, |leaf| leaf.buffered_rows())
    }

    /// Cut the current page of every leaf and hand out all pages cut so far
    pub fn flush_page(&mut self) -> Vec<EncodedPage> {
        let mut pages = Vec::new();
        self.for_each_leaf_mut(&mut |leaf| pages.extend(leaf.flush_page()));
        pages
    }

    /// Finish every leaf, yielding one chunk per leaf in depth-first order
    pub fn close(self) -> Vec<ColumnChunk> {
        let mut leaves = Vec::new();
        self.into_leaves(&mut leaves);
        leaves.into_iter().map(PrimitiveColumnWriter::close).collect()
    }

    /// Leaf writers in depth-first order
    pub fn leaves(&self) -> Vec<&PrimitiveColumnWriter> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a PrimitiveColumnWriter>) {
        match self {
            ColumnWriter::Primitive(w) => out.push(w),
            ColumnWriter::Struct(w) => {
                for field in w.fields() {
                    field.collect_leaves(out);
                }
            }
            ColumnWriter::Array(w) => w.element().collect_leaves(out),
            ColumnWriter::Map(w) => {
                w.key().collect_leaves(out);
                w.value().collect_leaves(out);
            }
        }
    }

    pub(crate) fn for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut PrimitiveColumnWriter)) {
        match self {
            ColumnWriter::Primitive(w) => f(w),
            ColumnWriter::Struct(w) => {
                for field in w.fields_mut() {
                    field.for_each_leaf_mut(f);
                }
            }
            ColumnWriter::Array(w) => w.element_mut().for_each_leaf_mut(f),
            ColumnWriter::Map(w) => {
                for child in w.children_mut() {
                    child.for_each_leaf_mut(f);
                }
            }
        }
    }

    fn into_leaves(self, out: &mut Vec<PrimitiveColumnWriter>) {
        match self {
            ColumnWriter::Primitive(w) => out.push(w),
            ColumnWriter::Struct(w) => {
                for field in w.into_fields() {
                    field.into_leaves(out);
                }
            }
            ColumnWriter::Array(w) => w.into_element().into_leaves(out),
            ColumnWriter::Map(w) => {
                let (key, value) = w.into_children();
                key.into_leaves(out);
                value.into_leaves(out);
            }
        }
    }
}
