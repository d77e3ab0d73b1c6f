//! Request/response contract with the assistant backend.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::AnswerResult,
    error::{ApiException, ErrorCode},
    protocol::{
        AskQuery, AskResponse, AuthOutcome, AuthResponse, HealthResponse, LoginRequest,
        ReadinessResponse, SignupRequest,
    },
};
use tracing::{debug, info, warn};

use crate::{
    config::{normalize_base_url, ClientSettings},
    error::{ClientError, LOGIN_FAILED, QUERY_FAILED, QUESTION_TOO_SHORT, SIGNUP_FAILED},
};

/// Minimum number of characters in a trimmed question.
pub const MIN_QUESTION_CHARS: usize = 5;

/// The three remote operations the client depends on. None of them retry.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, ClientError>;

    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, ClientError>;

    async fn ask_question(&self, question: &str, top_k: u32)
        -> Result<AnswerResult, ClientError>;
}

pub fn validate_question(question: &str) -> Result<(), ClientError> {
    if question.trim().chars().count() < MIN_QUESTION_CHARS {
        return Err(ClientError::Validation(QUESTION_TOO_SHORT.to_string()));
    }
    Ok(())
}

pub struct HttpAssistantApi {
    http: Client,
    base_url: String,
}

impl HttpAssistantApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let base_url = normalize_base_url(&settings.api_base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let health = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(health)
    }

    pub async fn readiness(&self) -> Result<ReadinessResponse> {
        let response = self
            .http
            .get(format!("{}/ready", self.base_url))
            .send()
            .await
            .map_err(|e| anyhow!("readiness probe failed: {e}"))?
            .error_for_status()?;
        let readiness: ReadinessResponse = response.json().await?;
        info!(
            status = %readiness.status,
            documents_indexed = readiness.documents_indexed,
            "api: readiness probed"
        );
        Ok(readiness)
    }

    /// Sends one request and decodes a JSON body, mapping every failure to an
    /// [`ApiException`] whose message falls back to `fallback`.
    async fn exchange<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiException> {
        let response = request.send().await.map_err(|err| {
            warn!(operation, "api: transport failure: {err}");
            ApiException::new(ErrorCode::Transport, fallback)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            warn!(operation, status = status.as_u16(), "api: failed to read body: {err}");
            ApiException::new(ErrorCode::Transport, fallback)
        })?;

        if !status.is_success() {
            let ex = ApiException::from_response(status.as_u16(), &body, fallback);
            warn!(
                operation,
                status = status.as_u16(),
                code = ?ex.code,
                "api: request rejected: {}",
                ex.message
            );
            return Err(ex);
        }

        serde_json::from_slice(&body).map_err(|err| {
            warn!(operation, status = status.as_u16(), "api: invalid response payload: {err}");
            ApiException {
                code: ErrorCode::Decode,
                status: Some(status.as_u16()),
                message: fallback.to_string(),
            }
        })
    }
}

#[async_trait]
impl AssistantApi for HttpAssistantApi {
    async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, ClientError> {
        let request = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            });
        let response: AuthResponse = self
            .exchange("login", request, LOGIN_FAILED)
            .await
            .map_err(ClientError::auth)?;
        let outcome = AuthOutcome::from(response);
        info!(
            has_token = outcome.access_token.is_some(),
            has_name = outcome.user_name.is_some(),
            "api: login accepted"
        );
        Ok(outcome)
    }

    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, ClientError> {
        let request = self
            .http
            .post(format!("{}/auth/signup", self.base_url))
            .json(&SignupRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            });
        let response: AuthResponse = self
            .exchange("signup", request, SIGNUP_FAILED)
            .await
            .map_err(ClientError::auth)?;
        let outcome = AuthOutcome::from(response);
        info!(
            has_token = outcome.access_token.is_some(),
            has_name = outcome.user_name.is_some(),
            "api: signup accepted"
        );
        Ok(outcome)
    }

    async fn ask_question(
        &self,
        question: &str,
        top_k: u32,
    ) -> Result<AnswerResult, ClientError> {
        validate_question(question)?;

        // Anonymous, query-string only: no body, no content-type, no credentials.
        let request = self
            .http
            .post(format!("{}/rag/ask", self.base_url))
            .query(&AskQuery { question, top_k });
        let response: AskResponse = self
            .exchange("ask", request, QUERY_FAILED)
            .await
            .map_err(ClientError::query)?;
        let result = AnswerResult::from(response);
        debug!(
            sources = result.sources.len(),
            confidence = result.confidence.map(|c| c.as_str()),
            trace_id = result.trace_id.as_deref(),
            "api: answer received"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
