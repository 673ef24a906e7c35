use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

use nestwrite::ingest::json::rows_from_json;
use nestwrite::writer::{EncodedPage, TableWriter, WriterVersion};

use super::config::Config;
use super::schema_file::SchemaFile;

/// Flags that override the config file
#[derive(Debug, Default)]
pub struct Overrides {
    /// Writer version string (`v1`, `v2`, `PARQUET_2_0`, ...)
    pub writer_version: Option<String>,
    /// Page size threshold in bytes
    pub page_size: Option<usize>,
}

/// Encode a JSON row file and print page and chunk statistics
pub fn run(schema: PathBuf, rows: PathBuf, config: Option<PathBuf>, overrides: Overrides) -> Result<()> {
    let mut config = Config::load(config.as_deref())?;
    if let Some(version) = overrides.writer_version {
        config.writer.writer_version = version.parse::<WriterVersion>()?;
    }
    if let Some(page_size) = overrides.page_size {
        config.writer.page_size_threshold = page_size;
    }

    let schema_file = SchemaFile::from_file(&schema)?;
    let converted = schema_file.convert()?;

    let content = std::fs::read_to_string(&rows)
        .with_context(|| format!("Failed to read rows file: {}", rows.display()))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse rows file: {}", rows.display()))?;
    let rows = rows_from_json(&json, &schema_file.columns).context("Failed to convert rows")?;
    info!("Loaded {} rows", rows.len());

    let mut writer = TableWriter::try_new(&converted.schema, &converted.types, &config.writer)
        .context("Failed to build table writer")?;
    writer.write_rows(&rows).context("Failed to write rows")?;
    debug!("Buffered {} bytes before close", writer.buffered_size());

    let (chunks, stats) = writer.close().context("Failed to close table writer")?;

    println!("Schema: {}", schema_file.name);
    println!("Writer version: {}", config.writer.writer_version);
    println!();
    for chunk in &chunks {
        println!(
            "{}: {} values, {} nulls, {} rows, encodings {:?}",
            chunk.descriptor.path, chunk.num_values, chunk.num_nulls, chunk.num_rows, chunk.encodings
        );
        for (i, page) in chunk.pages.iter().enumerate() {
            println!("  page {i}: {}", describe_page(page));
        }
    }
    println!();
    println!("{stats}");

    Ok(())
}

fn describe_page(page: &EncodedPage) -> String {
    let mut line = format!(
        "{} {} values, {} bytes, {:?}",
        page.version(),
        page.num_values(),
        page.uncompressed_size,
        page.encoding()
    );
    if let (Some(nulls), Some(rows)) = (page.num_nulls(), page.num_rows()) {
        line.push_str(&format!(", {nulls} nulls, {rows} rows"));
    }
    line
}
