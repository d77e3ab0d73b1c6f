use serde::{Deserialize, Serialize};

use crate::domain::{AnswerResult, Confidence, SourceRef};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
}

/// What a successful login or signup hands back to the caller for persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthOutcome {
    pub access_token: Option<String>,
    pub user_name: Option<String>,
}

impl From<AuthResponse> for AuthOutcome {
    fn from(value: AuthResponse) -> Self {
        Self {
            access_token: value.access_token.filter(|token| !token.is_empty()),
            user_name: value
                .user
                .and_then(|user| user.name)
                .filter(|name| !name.is_empty()),
        }
    }
}

/// Query string of `POST /rag/ask`. The request has no body.
#[derive(Debug, Clone, Serialize)]
pub struct AskQuery<'a> {
    pub question: &'a str,
    pub top_k: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Option<Vec<SourceRef>>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub trace_id: Option<String>,
}

impl From<AskResponse> for AnswerResult {
    fn from(value: AskResponse) -> Self {
        Self {
            answer: value.answer,
            sources: value.sources.unwrap_or_default(),
            confidence: value.confidence.as_deref().and_then(Confidence::parse),
            status: value.status,
            trace_id: value.trace_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    #[serde(default)]
    pub documents_indexed: u64,
}

impl ReadinessResponse {
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
