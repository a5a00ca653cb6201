//! Observability subsystem for studentdb
//!
//! Structured logging through `tracing`. Request spans come from the
//! `TraceLayer` on the HTTP router; everything else logs through the
//! `tracing` macros with key/value fields.
//!
//! # Usage
//!
//! ```ignore
//! use studentdb::cli::LogFormat;
//! use studentdb::observability::init_logging;
//!
//! init_logging(LogFormat::Json);
//! tracing::info!(port = 3000, "server is ready");
//! ```

mod logger;

pub use logger::{env_filter, init_logging, DEFAULT_FILTER};
