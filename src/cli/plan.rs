use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use nestwrite::encoding::{DefaultPageProperties, PageProperties};
use nestwrite::writer::get_column_writers;

use super::config::Config;
use super::schema_file::SchemaFile;

/// Print the compiled writer tree: one line per leaf with its levels and strategy
pub fn run(schema: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config.as_deref())?;
    let schema_file = SchemaFile::from_file(&schema)?;
    let converted = schema_file.convert()?;

    let properties = Arc::new(DefaultPageProperties::from_config(&config.writer));
    info!(
        "Compiling {} ({} columns) for {}",
        schema_file.name,
        schema_file.columns.len(),
        properties.writer_version()
    );
    let writers = get_column_writers(
        &converted.schema,
        &converted.types,
        properties,
        config.writer.compression.to_parquet(),
    )
    .context("Failed to compile column writers")?;

    println!("Schema: {}", schema_file.name);
    println!("Writer version: {}", config.writer.writer_version);
    println!();
    println!(
        "  {:<32} {:<22} {:<26} {:<18} {:>3} {:>3}",
        "path", "engine type", "physical", "strategy", "def", "rep"
    );
    for writer in &writers {
        for leaf in writer.leaves() {
            let descriptor = leaf.descriptor();
            let physical = match descriptor.logical {
                Some(logical) => format!("{} ({logical})", descriptor.physical_type),
                None => descriptor.physical_type.to_string(),
            };
            println!(
                "  {:<32} {:<22} {:<26} {:<18} {:>3} {:>3}",
                descriptor.path.to_string(),
                leaf.engine_type().to_string(),
                physical,
                leaf.value_writer().kind().to_string(),
                descriptor.max_definition_level,
                descriptor.max_repetition_level
            );
        }
    }

    Ok(())
}
