//! JSON schema files.
//!
//! ```json
//! {
//!   "name": "events",
//!   "columns": [
//!     {"name": "id", "type": "bigint", "nullable": false},
//!     {"name": "tags", "type": {"array": "varchar"}},
//!     {"name": "price", "type": {"decimal": {"precision": 10, "scale": 2}}}
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use nestwrite::schema::{convert_columns, ConvertedSchema, EngineColumn};

fn default_name() -> String {
    "schema".to_string()
}

/// Engine-typed column list loaded from disk.
#[derive(Debug, Deserialize)]
pub struct SchemaFile {
    /// Schema name
    #[serde(default = "default_name")]
    pub name: String,
    /// Top-level columns
    pub columns: Vec<EngineColumn>,
}

impl SchemaFile {
    /// Load and parse a schema file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse schema file: {}", path.display()))
    }

    /// Build the logical schema and leaf type mapping.
    pub fn convert(&self) -> Result<ConvertedSchema> {
        convert_columns(&self.name, &self.columns).context("Failed to convert schema columns")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestwrite::types::EngineType;

    #[test]
    fn test_parse_schema_file() {
        let json = r#"{
            "name": "events",
            "columns": [
                {"name": "id", "type": "bigint", "nullable": false},
                {"name": "tags", "type": {"array": "varchar"}}
            ]
        }"#;
        let file: SchemaFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.name, "events");
        assert_eq!(file.columns[1].engine_type, EngineType::array(EngineType::Varchar));
        assert!(file.columns[1].nullable);

        let converted = file.convert().unwrap();
        assert_eq!(converted.schema.leaf_count(), 2);
    }
}
