//! CLI command implementations
//!
//! `serve` layers configuration (file, then environment and flags), opens
//! the store client, and runs the HTTP server until shutdown. `validate`
//! runs the student validator over one JSON record.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::http_server::{HttpServer, ServerConfig};
use crate::observability::init_logging;
use crate::schema::{validate_value, ValidationErrors};

use super::args::{Cli, Command};
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{read_input, write_error, write_response};

/// Values from flags or environment that override the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub store_url: Option<String>,
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command).await
}

/// Run the appropriate command based on CLI args
pub async fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            host,
            port,
            store_url,
            log_format,
        } => {
            init_logging(log_format);
            let overrides = ConfigOverrides {
                host,
                port,
                store_url,
            };
            let config = build_config(config.as_deref(), overrides)?;
            serve(config).await
        }
        Command::Validate { input } => validate(&input),
    }
}

/// Load the config file (if any) and apply overrides on top
pub fn build_config(path: Option<&Path>, overrides: ConfigOverrides) -> CliResult<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    if let Some(host) = overrides.host {
        config.host = host;
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }
    if let Some(url) = overrides.store_url {
        config.store_url = Some(url);
    }

    Ok(config)
}

/// Open the store and run the HTTP server until Ctrl-C
pub async fn serve(config: ServerConfig) -> CliResult<()> {
    info!(
        host = %config.host,
        port = config.port,
        store_url = config.store_url.as_deref().unwrap_or(""),
        "starting studentdb"
    );

    let server = HttpServer::connect(config).await;
    server
        .start()
        .await
        .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
}

/// Validate one record read from `input` and print the outcome
pub fn validate(input: &str) -> CliResult<()> {
    let candidate = read_input(input)?;

    match check_record(&candidate) {
        Ok(student) => write_response(student),
        Err(errors) => {
            let code = CliErrorCode::ValidationFailed.code();
            write_error(code, &errors.to_string(), errors.errors())?;
            Err(CliError::validation_failed(errors.to_string()))
        }
    }
}

/// Validate a candidate and return the cast record as JSON
pub fn check_record(candidate: &Value) -> Result<Value, ValidationErrors> {
    let student = validate_value(candidate)?;
    Ok(Value::Object(student.into_fields()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(None, ConfigOverrides::default()).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("studentdb.json");
        std::fs::write(
            &path,
            r#"{"host": "127.0.0.1", "port": 4000, "store_url": "memory://"}"#,
        )
        .unwrap();

        let overrides = ConfigOverrides {
            port: Some(5000),
            store_url: Some("file://data/students.json".into()),
            ..Default::default()
        };
        let config = build_config(Some(&path), overrides).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.store_url.as_deref(), Some("file://data/students.json"));
    }

    #[test]
    fn test_check_record_casts() {
        let record = check_record(&json!({
            "firstName": " Lakshya ",
            "age": "20",
            "country": "India"
        }))
        .unwrap();

        assert_eq!(record["firstName"], "Lakshya");
        assert_eq!(record["lastName"], "N/A");
        assert_eq!(record["age"], 20);
    }

    #[test]
    fn test_check_record_errors() {
        let errors = check_record(&json!({"firstName": "Al"})).unwrap_err();
        assert!(errors.has("firstName", "length"));
        assert!(errors.has("age", "required"));
        assert!(errors.has("country", "required"));
    }
}
