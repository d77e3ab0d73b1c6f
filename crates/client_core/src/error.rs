//! Error kinds surfaced by the assistant client.

use shared::error::{ApiException, ErrorCode};
use thiserror::Error;

pub const LOGIN_FAILED: &str = "Login failed";
pub const SIGNUP_FAILED: &str = "Signup failed";
pub const QUERY_FAILED: &str = "Failed to get answer";
pub const QUESTION_TOO_SHORT: &str = "Question too short";

/// Every variant displays as exactly one human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Local precondition failure; nothing was sent.
    #[error("{0}")]
    Validation(String),
    /// Login or signup rejected, or the auth round-trip failed.
    #[error("{message}")]
    Auth {
        code: ErrorCode,
        status: Option<u16>,
        message: String,
    },
    /// Ask-question rejected, or the round-trip failed.
    #[error("{message}")]
    Query {
        code: ErrorCode,
        status: Option<u16>,
        message: String,
    },
}

impl ClientError {
    pub fn auth(ex: ApiException) -> Self {
        Self::Auth {
            code: ex.code,
            status: ex.status,
            message: ex.message,
        }
    }

    pub fn query(ex: ApiException) -> Self {
        Self::Query {
            code: ex.code,
            status: ex.status,
            message: ex.message,
        }
    }

    /// A 2xx auth response that carried no usable access token.
    pub fn missing_token(fallback: &str) -> Self {
        Self::Auth {
            code: ErrorCode::Decode,
            status: None,
            message: fallback.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message) => message,
            Self::Auth { message, .. } | Self::Query { message, .. } => message,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Validation,
            Self::Auth { code, .. } | Self::Query { code, .. } => *code,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation(_) => None,
            Self::Auth { status, .. } | Self::Query { status, .. } => *status,
        }
    }

    /// True when the backend never produced a response.
    pub fn is_transport(&self) -> bool {
        self.code() == ErrorCode::Transport
    }
}
