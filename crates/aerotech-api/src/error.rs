use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL `{url}`: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the backend's `detail` when it sent one.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error("unexpected response from {operation}: {message}")]
    Decode { operation: String, message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Human-readable message for a failed response body.
///
/// FastAPI-style bodies carry `detail` as either a string or a list of
/// validation errors with `msg` fields. Anything else falls back to
/// `"<operation> failed (<status>)"`.
pub(crate) fn error_message(operation: &str, status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());

    match detail {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                fallback(operation, status)
            } else {
                msgs.join("; ")
            }
        }
        _ => fallback(operation, status),
    }
}

fn fallback(operation: &str, status: StatusCode) -> String {
    format!("{operation} failed ({})", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used_verbatim() {
        let msg = error_message("Create work package", StatusCode::CONFLICT, r#"{"detail":"Work package WP-1 exists"}"#);
        assert_eq!(msg, "Work package WP-1 exists");
    }

    #[test]
    fn validation_errors_are_joined() {
        let body = r#"{"detail":[{"loc":["body","name"],"msg":"field required"},{"msg":"value is not a valid integer"}]}"#;
        let msg = error_message("Save personnel", StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(msg, "field required; value is not a valid integer");
    }

    #[test]
    fn non_json_body_falls_back() {
        let msg = error_message("Sprint start", StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(msg, "Sprint start failed (502)");
    }

    #[test]
    fn missing_or_odd_detail_falls_back() {
        assert_eq!(
            error_message("Plan", StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"x"}"#),
            "Plan failed (500)"
        );
        assert_eq!(
            error_message("Plan", StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail":42}"#),
            "Plan failed (500)"
        );
        assert_eq!(
            error_message("Plan", StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail":[]}"#),
            "Plan failed (500)"
        );
    }

    #[test]
    fn status_error_displays_message_only() {
        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: "Tool not found".into(),
        };
        assert_eq!(err.to_string(), "Tool not found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }
}
