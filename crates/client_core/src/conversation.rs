//! Transcript and in-flight question lifecycle of the chat view.

use shared::domain::{AnswerResult, ChatMessage, Confidence, SourceRef};
use tracing::{debug, info};

use crate::{api::AssistantApi, config::DEFAULT_TOP_K, error::ClientError};

/// Assistant reply appended when a question fails for any reason.
pub const FALLBACK_ANSWER: &str = "Something went wrong. Please try again.";

/// Ticket for the single outstanding question.
///
/// Identifies the controller instance and the submission it was issued for;
/// a result presented with a ticket that no longer matches is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuestion {
    instance: u64,
    generation: u64,
    question: String,
    top_k: u32,
}

impl PendingQuestion {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }
}

/// Read-only copy of the controller state for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSnapshot {
    pub transcript: Vec<ChatMessage>,
    pub input: String,
    pub awaiting_response: bool,
    pub sources: Vec<SourceRef>,
    pub confidence: Option<Confidence>,
}

#[derive(Debug)]
pub struct ConversationController {
    instance: u64,
    generation: u64,
    top_k: u32,
    transcript: Vec<ChatMessage>,
    input: String,
    awaiting_response: bool,
    sources: Vec<SourceRef>,
    confidence: Option<Confidence>,
}

impl Default for ConversationController {
    fn default() -> Self {
        Self::new(0, DEFAULT_TOP_K)
    }
}

impl ConversationController {
    pub fn new(instance: u64, top_k: u32) -> Self {
        Self {
            instance,
            generation: 0,
            top_k,
            transcript: Vec::new(),
            input: String::new(),
            awaiting_response: false,
            sources: Vec::new(),
            confidence: None,
        }
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    pub fn sources(&self) -> &[SourceRef] {
        &self.sources
    }

    pub fn confidence(&self) -> Option<Confidence> {
        self.confidence
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            transcript: self.transcript.clone(),
            input: self.input.clone(),
            awaiting_response: self.awaiting_response,
            sources: self.sources.clone(),
            confidence: self.confidence,
        }
    }

    /// Accepts a question and echoes it into the transcript.
    ///
    /// Returns `None` without touching any state when the text is blank or a
    /// question is already outstanding.
    pub fn begin_submit(&mut self, question: &str) -> Option<PendingQuestion> {
        if question.trim().is_empty() {
            debug!(instance = self.instance, "conversation: ignoring blank question");
            return None;
        }
        if self.awaiting_response {
            debug!(
                instance = self.instance,
                "conversation: ignoring submit while a question is in flight"
            );
            return None;
        }

        self.awaiting_response = true;
        self.generation += 1;
        self.transcript.push(ChatMessage::user(question));
        Some(PendingQuestion {
            instance: self.instance,
            generation: self.generation,
            question: question.to_string(),
            top_k: self.top_k,
        })
    }

    /// Applies the settled result of `pending`. Returns false if the ticket is
    /// stale and nothing was changed.
    pub fn complete(
        &mut self,
        pending: PendingQuestion,
        outcome: Result<AnswerResult, ClientError>,
    ) -> bool {
        if !self.awaiting_response
            || pending.instance != self.instance
            || pending.generation != self.generation
        {
            debug!(
                instance = self.instance,
                ticket_instance = pending.instance,
                "conversation: discarding stale answer"
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                info!(
                    instance = self.instance,
                    sources = result.sources.len(),
                    confidence = result.confidence.map(|c| c.as_str()),
                    "conversation: answer applied"
                );
                self.transcript.push(ChatMessage::assistant(result.answer));
                self.sources = result.sources;
                self.confidence = result.confidence;
            }
            Err(err) => {
                info!(
                    instance = self.instance,
                    code = ?err.code(),
                    "conversation: question failed: {err}"
                );
                self.transcript.push(ChatMessage::assistant(FALLBACK_ANSWER));
            }
        }

        self.input.clear();
        self.awaiting_response = false;
        true
    }

    /// Runs one full turn against `api`. Returns whether the question was accepted.
    pub async fn submit(&mut self, api: &dyn AssistantApi, question: &str) -> bool {
        let Some(pending) = self.begin_submit(question) else {
            return false;
        };
        let outcome = api.ask_question(pending.question(), pending.top_k()).await;
        self.complete(pending, outcome)
    }

    /// Submits the current input draft.
    pub async fn submit_input(&mut self, api: &dyn AssistantApi) -> bool {
        let question = self.input.clone();
        self.submit(api, &question).await
    }
}

#[cfg(test)]
#[path = "tests/conversation_tests.rs"]
mod tests;
