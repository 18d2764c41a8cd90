//! Error types
//!
//! Everything returns `anyhow::Result`; these types sit inside the
//! `anyhow::Error` so callers can `downcast_ref` when they need to branch.

use reqwest::StatusCode;
use serde_json::Value;

/// The API answered with a non-success status
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API request failed: {status}")]
    Status { status: StatusCode, body: Value },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Status { status, .. } => *status,
        }
    }

    /// Response body, parsed as JSON when possible
    pub fn body(&self) -> &Value {
        match self {
            ApiError::Status { body, .. } => body,
        }
    }
}

/// A call could not be turned into a request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    #[error("method {0} is declared more than once")]
    DuplicateMethod(String),
    #[error("{method}: missing identifier for parent resource {resource}")]
    MissingPathArgument { method: String, resource: String },
    #[error("{method}: unexpected path argument {segment:?}")]
    UnexpectedPathArgument { method: String, segment: String },
    #[error("{method}: expected at most {max} data/params arguments, got {count}")]
    TooManyArguments {
        method: String,
        max: usize,
        count: usize,
    },
    #[error("{method}: query parameters must be a JSON object")]
    InvalidParams { method: String },
    #[error("{method}: {value} is neither a path segment nor a JSON object")]
    InvalidArgument { method: String, value: String },
}

/// Format an API error for display
pub fn format_api_error(error: &anyhow::Error) -> String {
    if let Some(api_error) = error.downcast_ref::<ApiError>() {
        return match api_error.status().as_u16() {
            400 => "Invalid request. Check your parameters.".to_string(),
            401 => "Authentication failed. Check your access token.".to_string(),
            403 => "Permission denied. Check the token's scopes.".to_string(),
            404 => "Resource not found.".to_string(),
            409 => "Resource conflict. The resource may already exist.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            500 | 502 | 503 => "Service temporarily unavailable. Please try again.".to_string(),
            _ => format!("Request failed with status {}.", api_error.status()),
        };
    }

    if let Some(call_error) = error.downcast_ref::<CallError>() {
        return call_error.to_string();
    }

    if error.downcast_ref::<reqwest::Error>().is_some() {
        return "Request failed. Check your network connection and try again.".to_string();
    }

    let error_str = error.to_string();
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_errors_map_to_messages() {
        let err: anyhow::Error = ApiError::Status {
            status: StatusCode::FORBIDDEN,
            body: json!({"error": {"code": 403}}),
        }
        .into();
        assert_eq!(format_api_error(&err), "Permission denied. Check the token's scopes.");
    }

    #[test]
    fn test_context_keeps_downcast() {
        let err = anyhow::Error::from(ApiError::Status {
            status: StatusCode::NOT_FOUND,
            body: Value::Null,
        })
        .context("listVideos");
        assert_eq!(format_api_error(&err), "Resource not found.");
    }

    #[test]
    fn test_call_errors_show_their_message() {
        let err: anyhow::Error = CallError::UnknownMethod("listFoo".to_string()).into();
        assert_eq!(format_api_error(&err), "unknown method: listFoo");
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let err = anyhow::anyhow!("{}", "x".repeat(200));
        let msg = format_api_error(&err);
        assert!(msg.ends_with("..."));
        assert_eq!(msg.len(), 83);
    }
}
