//! Error response DTOs.

use serde::Serialize;

/// Standard error response format.
///
/// `message` is always safe to show to a caller; internal causes never end
/// up here.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response with code and message.
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            request_id: None,
        }
    }

    /// Adds structured details to the error response.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Adds a request ID to the error response for correlation.
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let response = ErrorResponse::new("NOT_FOUND", "Could not find place.");
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"message\":\"Could not find place.\""));
        assert!(!json.contains("details"));
        assert!(!json.contains("request_id"));
    }

    #[test]
    fn details_and_request_id_serialize_when_present() {
        let response = ErrorResponse::new("VALIDATION_ERROR", "Invalid inputs")
            .with_details(serde_json::json!([{"field": "title"}]))
            .with_request_id("req-1");
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"request_id\":\"req-1\""));
        assert!(json.contains("\"field\":\"title\""));
    }
}
