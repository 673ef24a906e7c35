use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod encode;
mod plan;
mod schema_file;

/// nestwrite - nested columnar page writer
#[derive(Parser)]
#[command(name = "nestwrite")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a schema and print every leaf with its levels and strategy
    Plan {
        /// JSON schema file
        #[arg(short, long, value_name = "FILE")]
        schema: PathBuf,

        /// Load writer settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Encode a JSON row file and print page and chunk statistics
    Encode {
        /// JSON schema file
        #[arg(short, long, value_name = "FILE")]
        schema: PathBuf,

        /// JSON array of rows
        #[arg(short, long, value_name = "FILE")]
        rows: PathBuf,

        /// Load writer settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Writer version (v1, v2, PARQUET_1_0, PARQUET_2_0)
        #[arg(short = 'w', long)]
        writer_version: Option<String>,

        /// Page size threshold in bytes
        #[arg(short = 'p', long)]
        page_size: Option<usize>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Plan { schema, config } => plan::run(schema, config),
        Commands::Encode {
            schema,
            rows,
            config,
            writer_version,
            page_size,
        } => encode::run(
            schema,
            rows,
            config,
            encode::Overrides {
                writer_version,
                page_size,
            },
        ),
    }
}
