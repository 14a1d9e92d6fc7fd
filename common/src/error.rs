//! Client-side error taxonomy.
//!
//! Every failure a view can observe is an `ApiError`. Transport failures and
//! non-2xx responses are surfaced as-is (nothing is retried), while
//! `Validation` errors are raised locally before a request is ever built.
//! A job that ends in `FAILED` is *not* an error: it is a terminal status that
//! carries its own server-supplied message on the `Job` itself.

use serde_json::Value;

/// Message shown when a response body carries no usable `detail`.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("{0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// A 2xx body could not be decoded into the expected shape.
    #[error("{0}")]
    Decode(String),

    /// Rejected locally, no request was sent.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Builds the error for a non-2xx response, extracting the human message
    /// from the body's `detail` field.
    pub fn from_response(status: u16, body: &str) -> Self {
        ApiError::Status {
            status,
            message: normalize_error_message(body),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// The text a view renders inline.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(format!("Invalid response from server: {err}"))
    }
}

/// Extracts a readable message from an error body.
///
/// The backend reports errors as `{"detail": "..."}`; request validation
/// failures arrive as `{"detail": [{"msg": "..."}, ...]}`. Anything else
/// (HTML error pages, empty bodies, other shapes) yields the generic message.
pub fn normalize_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return GENERIC_ERROR_MESSAGE.to_string();
    };

    match value.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => detail.clone(),
        Some(Value::Array(entries)) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .filter(|msg| !msg.trim().is_empty())
                .collect();
            if messages.is_empty() {
                GENERIC_ERROR_MESSAGE.to_string()
            } else {
                messages.join("; ")
            }
        }
        _ => GENERIC_ERROR_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_becomes_message() {
        let err = ApiError::from_response(404, r#"{"detail":"Job not found"}"#);
        assert_eq!(err.message(), "Job not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn validation_detail_list_is_joined() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email"},{"msg":"field required"}]}"#;
        assert_eq!(
            normalize_error_message(body),
            "value is not a valid email; field required"
        );
    }

    #[test]
    fn missing_detail_falls_back_to_generic() {
        assert_eq!(normalize_error_message(""), GENERIC_ERROR_MESSAGE);
        assert_eq!(normalize_error_message("<html>502</html>"), GENERIC_ERROR_MESSAGE);
        assert_eq!(normalize_error_message(r#"{"error":"x"}"#), GENERIC_ERROR_MESSAGE);
        assert_eq!(normalize_error_message(r#"{"detail":"  "}"#), GENERIC_ERROR_MESSAGE);
        assert_eq!(normalize_error_message(r#"{"detail":[]}"#), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn unauthorized_is_flagged() {
        let err = ApiError::from_response(401, r#"{"detail":"Could not validate credentials"}"#);
        assert!(err.is_unauthorized());
        assert!(!ApiError::Network("offline".into()).is_unauthorized());
    }
}
