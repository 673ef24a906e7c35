use std::fmt;
use std::path::Path;
use std::str::FromStr;

use parquet::basic::{Compression, ZstdLevel};
use serde::Deserialize;

use super::error::{Result, WriterError};

/// Data page format generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum WriterVersion {
    /// Data page V1: levels length-prefixed and compressed with the values
    #[default]
    V1,
    /// Data page V2: levels stored uncompressed, null and row counts in the header
    V2,
}

impl FromStr for WriterVersion {
    type Err = WriterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "v1" | "V1" | "PARQUET_1_0" | "1.0" => Ok(Self::V1),
            "v2" | "V2" | "PARQUET_2_0" | "2.0" => Ok(Self::V2),
            other => Err(WriterError::UnsupportedWriterVersion(other.to_string())),
        }
    }
}

impl TryFrom<String> for WriterVersion {
    type Error = WriterError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for WriterVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "PARQUET_1_0"),
            Self::V2 => write!(f, "PARQUET_2_0"),
        }
    }
}

impl From<WriterVersion> for parquet::file::properties::WriterVersion {
    fn from(version: WriterVersion) -> Self {
        match version {
            WriterVersion::V1 => Self::PARQUET_1_0,
            WriterVersion::V2 => Self::PARQUET_2_0,
        }
    }
}

/// Compression codec recorded on every page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum CompressionType {
    /// ZSTD at the given level
    Zstd(i32),
    /// Snappy
    Snappy,
    /// No compression
    Uncompressed,
}

impl Default for CompressionType {
    fn default() -> Self {
        Self::Uncompressed
    }
}

impl CompressionType {
    /// Balanced ZSTD level
    pub fn balanced() -> Self {
        Self::Zstd(3)
    }

    /// Codec identifier understood by Parquet readers
    pub fn to_parquet(self) -> Compression {
        match self {
            Self::Zstd(level) => Compression::ZSTD(ZstdLevel::try_new(level).unwrap_or_default()),
            Self::Snappy => Compression::SNAPPY,
            Self::Uncompressed => Compression::UNCOMPRESSED,
        }
    }
}

impl FromStr for CompressionType {
    type Err = WriterError;

    /// Accepts `uncompressed`, `none`, `snappy`, `zstd` and `zstd:<level>`
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "uncompressed" | "none" => Ok(Self::Uncompressed),
            "snappy" => Ok(Self::Snappy),
            "zstd" => Ok(Self::balanced()),
            other => match other.strip_prefix("zstd:") {
                Some(level) => level
                    .parse()
                    .map(Self::Zstd)
                    .map_err(|_| WriterError::Config(format!("invalid zstd level: {level}"))),
                None => Err(WriterError::Config(format!("unknown compression: {s}"))),
            },
        }
    }
}

impl TryFrom<String> for CompressionType {
    type Error = WriterError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Default page size threshold: 1 MiB
pub const DEFAULT_PAGE_SIZE_THRESHOLD: usize = 1024 * 1024;

/// Configuration for one output target
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Data page format generation
    pub writer_version: WriterVersion,

    /// A leaf cuts a page once its buffered size reaches this many bytes
    pub page_size_threshold: usize,

    /// Codec identifier carried on every page
    pub compression: CompressionType,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            writer_version: WriterVersion::V1,
            page_size_threshold: DEFAULT_PAGE_SIZE_THRESHOLD,
            compression: CompressionType::Uncompressed,
        }
    }
}

impl WriterConfig {
    /// Data page V2 with default sizes
    pub fn v2() -> Self {
        Self {
            writer_version: WriterVersion::V2,
            ..Self::default()
        }
    }

    /// Tiny pages, mostly useful to exercise page cutting
    pub fn small_pages() -> Self {
        Self {
            page_size_threshold: 1024,
            ..Self::default()
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| WriterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check the configuration for values no writer can use
    pub fn validate(&self) -> Result<()> {
        if self.page_size_threshold == 0 {
            return Err(WriterError::Config(
                "page_size_threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
