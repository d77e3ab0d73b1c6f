use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Internal,
    Transport,
    Decode,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400 | 409 | 422 => Self::Validation,
            429 => Self::RateLimited,
            _ => Self::Internal,
        }
    }
}

/// Error payload returned by the backend on non-success responses.
///
/// `detail` is usually a string, but request validation failures carry a list
/// of `{loc, msg, type}` objects instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    pub fn from_bytes(raw: &[u8]) -> Self {
        serde_json::from_slice(raw).unwrap_or_default()
    }

    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
            Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string),
            _ => None,
        }
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.message().unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Debug, Clone, Error)]
#[error("{code:?}: {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiException {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status: None,
            message: message.into(),
        }
    }

    pub fn from_response(status: u16, body: &[u8], fallback: &str) -> Self {
        Self {
            code: ErrorCode::from_status(status),
            status: Some(status),
            message: ErrorBody::from_bytes(body).message_or(fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_string_detail_when_present() {
        let ex = ApiException::from_response(
            401,
            br#"{"detail":"Invalid credentials"}"#,
            "Login failed",
        );
        assert_eq!(ex.code, ErrorCode::Unauthorized);
        assert_eq!(ex.status, Some(401));
        assert_eq!(ex.message, "Invalid credentials");
    }

    #[test]
    fn falls_back_when_body_is_not_json() {
        let ex =
            ApiException::from_response(502, b"<html>bad gateway</html>", "Failed to get answer");
        assert_eq!(ex.code, ErrorCode::Internal);
        assert_eq!(ex.message, "Failed to get answer");
    }

    #[test]
    fn takes_first_message_from_validation_detail_list() {
        let body = br#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address","type":"value_error"}]}"#;
        let ex = ApiException::from_response(422, body, "Signup failed");
        assert_eq!(ex.code, ErrorCode::Validation);
        assert_eq!(ex.message, "value is not a valid email address");
    }

    #[test]
    fn blank_detail_uses_fallback() {
        assert_eq!(
            ErrorBody::from_bytes(br#"{"detail":"  "}"#).message_or("Login failed"),
            "Login failed"
        );
    }
}
