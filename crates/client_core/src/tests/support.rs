//! Scripted `AssistantApi` used by the unit tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use shared::{
    domain::{AnswerResult, Confidence, SourceRef},
    error::{ApiException, ErrorCode},
    protocol::AuthOutcome,
};
use tokio::sync::Notify;

use crate::{
    api::{validate_question, AssistantApi},
    error::{ClientError, LOGIN_FAILED, QUERY_FAILED},
};

/// Holds an ask call open until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct ScriptedApi {
    answers: Mutex<VecDeque<Result<AnswerResult, ClientError>>>,
    auth: Mutex<VecDeque<Result<AuthOutcome, ClientError>>>,
    asked: Mutex<Vec<(String, u32)>>,
    auth_calls: AtomicUsize,
    gate: Option<Arc<Gate>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Gate>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn push_answer(&self, answer: Result<AnswerResult, ClientError>) -> &Self {
        self.answers.lock().expect("answers").push_back(answer);
        self
    }

    pub fn push_auth(&self, outcome: Result<AuthOutcome, ClientError>) -> &Self {
        self.auth.lock().expect("auth").push_back(outcome);
        self
    }

    pub fn asked(&self) -> Vec<(String, u32)> {
        self.asked.lock().expect("asked").clone()
    }

    pub fn ask_calls(&self) -> usize {
        self.asked.lock().expect("asked").len()
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    fn next_auth(&self) -> Result<AuthOutcome, ClientError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        self.auth
            .lock()
            .expect("auth")
            .pop_front()
            .unwrap_or_else(|| Err(rejected_auth(401, LOGIN_FAILED)))
    }
}

#[async_trait]
impl AssistantApi for ScriptedApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<AuthOutcome, ClientError> {
        self.next_auth()
    }

    async fn signup(
        &self,
        _name: &str,
        _email: &str,
        _password: &str,
    ) -> Result<AuthOutcome, ClientError> {
        self.next_auth()
    }

    async fn ask_question(
        &self,
        question: &str,
        top_k: u32,
    ) -> Result<AnswerResult, ClientError> {
        validate_question(question)?;
        self.asked
            .lock()
            .expect("asked")
            .push((question.to_string(), top_k));
        let next = self.answers.lock().expect("answers").pop_front();

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        next.unwrap_or_else(|| Err(rejected_query(503, QUERY_FAILED)))
    }
}

pub fn source(title: &str, score: f64) -> SourceRef {
    SourceRef {
        title: title.to_string(),
        chunk_text: format!("excerpt from {title}"),
        score,
        doc_id: None,
        chunk_id: None,
    }
}

pub fn answer(
    text: &str,
    sources: Vec<SourceRef>,
    confidence: Option<Confidence>,
) -> AnswerResult {
    AnswerResult {
        answer: text.to_string(),
        sources,
        confidence,
        status: Some("ok".to_string()),
        trace_id: None,
    }
}

pub fn rejected_query(status: u16, detail: &str) -> ClientError {
    ClientError::query(ApiException::from_response(
        status,
        format!(r#"{{"detail":"{detail}"}}"#).as_bytes(),
        QUERY_FAILED,
    ))
}

pub fn rejected_auth(status: u16, detail: &str) -> ClientError {
    ClientError::auth(ApiException::from_response(
        status,
        format!(r#"{{"detail":"{detail}"}}"#).as_bytes(),
        LOGIN_FAILED,
    ))
}

pub fn transport_failure() -> ClientError {
    ClientError::query(ApiException::new(ErrorCode::Transport, QUERY_FAILED))
}

pub fn token(token: &str, name: Option<&str>) -> AuthOutcome {
    AuthOutcome {
        access_token: Some(token.to_string()),
        user_name: name.map(str::to_string),
    }
}
