use std::fmt;

use super::page::ColumnChunk;

/// Statistics from a completed table write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Number of rows written
    pub rows_written: usize,
    /// Number of top-level columns
    pub columns: usize,
    /// Number of primitive leaves
    pub leaf_columns: usize,
    /// Pages produced, including those handed out by `flush_page`
    pub pages_written: usize,
    /// Uncompressed page bytes, including those handed out by `flush_page`
    pub page_bytes: usize,
    /// Level records over all leaves
    pub values_written: usize,
    /// Null records over all leaves
    pub nulls_written: usize,
}

impl WriterStats {
    pub(crate) fn add_chunks(&mut self, chunks: &[ColumnChunk]) {
        self.leaf_columns += chunks.len();
        for chunk in chunks {
            self.pages_written += chunk.pages.len();
            self.page_bytes += chunk.buffered_bytes();
            self.values_written += chunk.num_values;
            self.nulls_written += chunk.num_nulls;
        }
    }
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} rows into {} leaf columns ({} pages, {} bytes, {} nulls)",
            self.rows_written, self.leaf_columns, self.pages_written, self.page_bytes, self.nulls_written
        )
    }
}
