//! # nestwrite
//!
//! Command-line front end for the nested column writers.
//!
//! ## Usage
//!
//! ```bash
//! # Show the compiled leaves with their levels and strategies
//! nestwrite plan --schema schema.json
//!
//! # Encode rows and print page statistics
//! nestwrite encode --schema schema.json --rows rows.json --config nestwrite.toml
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
