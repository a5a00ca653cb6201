//! CLI module for studentdb
//!
//! Provides command-line interface for:
//! - serve: Open the store and run the HTTP server
//! - validate: Check one student record without a store

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, LogFormat};
pub use commands::{build_config, check_record, run, run_command, serve, validate, ConfigOverrides};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_input, read_input, write_error, write_response};
