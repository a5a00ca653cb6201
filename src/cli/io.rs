//! JSON I/O handling for CLI
//!
//! - Input: single JSON object from a file or stdin
//! - Output: single JSON line on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};

use serde_json::Value;

use crate::schema::FieldError;

use super::errors::{CliError, CliResult};

/// Read a JSON value from `path`, or from stdin when `path` is "-"
pub fn read_input(path: &str) -> CliResult<Value> {
    let content = if path == "-" {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)
            .map_err(|e| CliError::io_error(format!("Failed to read '{}': {}", path, e)))?
    };

    parse_input(&content)
}

/// Parse input text as JSON
pub fn parse_input(content: &str) -> CliResult<Value> {
    if content.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    let value: Value = serde_json::from_str(content)?;
    Ok(value)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&serde_json::json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str, errors: &[FieldError]) -> CliResult<()> {
    let mut response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });
    if !errors.is_empty() {
        response["errors"] = serde_json::to_value(errors)?;
    }

    write_line(&response)
}

fn write_line(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_empty_input() {
        let err = parse_input("  \n").unwrap_err();
        assert_eq!(err.message(), "Empty input");
    }

    #[test]
    fn test_read_input_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("student.json");
        fs::write(&path, r#"{"firstName": "Lakshya"}"#).unwrap();

        let value = read_input(path.to_str().unwrap()).unwrap();
        assert_eq!(value["firstName"], "Lakshya");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_input("/nonexistent/student.json").unwrap_err();
        assert!(err.message().starts_with("Failed to read"));
    }
}
