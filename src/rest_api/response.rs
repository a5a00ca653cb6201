//! # Response Envelopes
//!
//! Every JSON response carries `status: "SUCCESS" | "FAILED"`.

use serde::Serialize;

use crate::schema::FieldError;

use super::errors::RestError;

/// Envelope status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Success,
    Failed,
}

/// `{status, data}` for list responses
#[derive(Debug, Clone, Serialize)]
pub struct ListEnvelope<T: Serialize> {
    pub status: Status,
    pub data: Vec<T>,
}

impl<T: Serialize> ListEnvelope<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            status: Status::Success,
            data,
        }
    }
}

/// `{status, message, result}` for writes; `result` is `null` when absent
#[derive(Debug, Clone, Serialize)]
pub struct ResultEnvelope<T: Serialize> {
    pub status: Status,
    pub message: &'static str,
    pub result: Option<T>,
}

impl<T: Serialize> ResultEnvelope<T> {
    pub fn new(message: &'static str, result: Option<T>) -> Self {
        Self {
            status: Status::Success,
            message,
            result,
        }
    }
}

/// `{status: "FAILED", message, error, errors?}`
#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub status: Status,
    pub message: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl FailureEnvelope {
    pub fn new(message: &'static str, error: &RestError) -> Self {
        Self {
            status: Status::Failed,
            message,
            error: error.to_string(),
            errors: error
                .validation_errors()
                .map(|e| e.errors().to_vec())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidationErrors;
    use crate::storage::StoreError;
    use serde_json::json;

    #[test]
    fn test_list_envelope() {
        let value = serde_json::to_value(ListEnvelope::new(vec![json!({"_id": "a"})])).unwrap();
        assert_eq!(value, json!({"status": "SUCCESS", "data": [{"_id": "a"}]}));
    }

    #[test]
    fn test_absent_result_is_null() {
        let value =
            serde_json::to_value(ResultEnvelope::<serde_json::Value>::new("done", None)).unwrap();
        assert_eq!(
            value,
            json!({"status": "SUCCESS", "message": "done", "result": null})
        );
    }

    #[test]
    fn test_failure_envelope_for_store_error() {
        let envelope = FailureEnvelope::new("Error fetching students", &StoreError::Closed.into());
        let value = serde_json::to_value(envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "status": "FAILED",
                "message": "Error fetching students",
                "error": "Store client is closed"
            })
        );
    }

    #[test]
    fn test_failure_envelope_lists_field_errors() {
        let error = RestError::from(ValidationErrors::new(vec![FieldError::required(
            "country",
            "Country is required",
        )]));
        let value = serde_json::to_value(FailureEnvelope::new("Error creating students", &error))
            .unwrap();
        assert_eq!(value["errors"][0]["field"], "country");
        assert_eq!(value["errors"][0]["kind"], "required");
    }
}
