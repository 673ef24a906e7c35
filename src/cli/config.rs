//! TOML configuration file support.
//!
//! Writer settings can be kept in a config file instead of flags:
//!
//! ```toml
//! # nestwrite.toml
//! [writer]
//! writer_version = "v2"
//! page_size_threshold = 65536
//! compression = "zstd:9"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use nestwrite::writer::WriterConfig;

/// Root configuration structure for nestwrite.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Writer settings.
    #[serde(default)]
    pub writer: WriterConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML configuration")?;
        config.writer.validate().context("Invalid writer configuration")?;
        Ok(config)
    }

    /// Load the file if one was given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }
}
