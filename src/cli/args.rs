//! CLI argument definitions using clap
//!
//! Commands:
//! - modelschema validate --schema <path> [--partial] [--config <path>]
//! - modelschema update --schema <path> --where <json> [--operator <op>] [--config <path>]
//! - modelschema fields --schema <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// modelschema - schema-driven record validation and UPDATE fragments
#[derive(Parser, Debug)]
#[command(name = "modelschema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one JSON record read from stdin
    Validate {
        /// Path to the schema document
        #[arg(long)]
        schema: PathBuf,

        /// Only check the fields present in the record
        #[arg(long)]
        partial: bool,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Build UPDATE fragments for the JSON record read from stdin
    Update {
        /// Path to the schema document
        #[arg(long)]
        schema: PathBuf,

        /// JSON object with the WHERE conditions
        #[arg(long = "where")]
        conditions: String,

        /// Comparison operator for the WHERE conditions
        #[arg(long, default_value = "=")]
        operator: String,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the schema's field names in declaration order
    Fields {
        /// Path to the schema document
        #[arg(long)]
        schema: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
