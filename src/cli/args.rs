//! CLI argument definitions using clap
//!
//! Commands:
//! - studentdb serve [--config <path>] [--host] [--port] [--store-url]
//! - studentdb validate [--input <path>|-]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// studentdb - A student records service over a pluggable document store
#[derive(Parser, Debug)]
#[command(name = "studentdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to an optional JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Store connection string ("memory://" or "file://<path>")
        #[arg(long, env = "STORE_URL")]
        store_url: Option<String>,

        /// Log output format
        #[arg(long, value_enum, default_value_t = LogFormat::Json)]
        log_format: LogFormat,
    },

    /// Validate a single student record and print the result
    Validate {
        /// JSON file holding the record, or "-" for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable lines
    Pretty,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
