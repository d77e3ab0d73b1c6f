//! Async drivers that run API calls against a shared [`ViewOrchestrator`].
//!
//! The orchestrator lock is held only to read or apply state, never across a
//! network call, so the view stays renderable while a request is pending.

use std::sync::Arc;

use shared::protocol::AuthOutcome;
use storage::SessionStore;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    api::{AssistantApi, HttpAssistantApi},
    config::ClientSettings,
    conversation::ConversationSnapshot,
    error::ClientError,
    view::{View, ViewOrchestrator},
};

pub struct AssistantSession {
    api: Arc<dyn AssistantApi>,
    orchestrator: Mutex<ViewOrchestrator>,
}

impl AssistantSession {
    pub fn new(api: Arc<dyn AssistantApi>, session: SessionStore, top_k: u32) -> Arc<Self> {
        Arc::new(Self {
            api,
            orchestrator: Mutex::new(ViewOrchestrator::new(session, top_k)),
        })
    }

    /// HTTP backend and session store as described by `settings`.
    pub fn from_settings(settings: &ClientSettings) -> anyhow::Result<Arc<Self>> {
        let api = HttpAssistantApi::from_settings(settings)?;
        let session = settings.open_session_store()?;
        info!(base_url = api.base_url(), "session: assistant client configured");
        Ok(Self::new(Arc::new(api), session, settings.default_top_k))
    }

    pub async fn view(&self) -> View {
        self.orchestrator.lock().await.view()
    }

    pub async fn display_name(&self) -> String {
        self.orchestrator.lock().await.display_name()
    }

    pub async fn conversation(&self) -> Option<ConversationSnapshot> {
        self.orchestrator
            .lock()
            .await
            .conversation()
            .map(|conversation| conversation.snapshot())
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        if let Some(conversation) = self.orchestrator.lock().await.conversation_mut() {
            conversation.set_input(text);
        }
    }

    pub async fn show_signup(&self) {
        self.orchestrator.lock().await.show_signup();
    }

    pub async fn back_to_login(&self) {
        self.orchestrator.lock().await.back_to_login();
    }

    pub async fn logout(&self) {
        self.orchestrator.lock().await.logout();
    }

    /// Errors are returned for the caller to display; the view is unchanged.
    pub async fn login(&self, email: &str, password: &str) -> Result<View, ClientError> {
        let outcome = self.api.login(email, password).await;
        self.apply_auth(outcome, |orchestrator, outcome| {
            orchestrator.complete_login(outcome)
        })
        .await
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<View, ClientError> {
        let outcome = self.api.signup(name, email, password).await;
        self.apply_auth(outcome, |orchestrator, outcome| {
            orchestrator.complete_signup(outcome)
        })
        .await
    }

    async fn apply_auth(
        &self,
        outcome: Result<AuthOutcome, ClientError>,
        complete: impl FnOnce(&mut ViewOrchestrator, AuthOutcome) -> Result<View, ClientError>,
    ) -> Result<View, ClientError> {
        let outcome = outcome.inspect_err(|err| {
            info!(code = ?err.code(), "session: authentication failed: {err}");
        })?;
        let mut orchestrator = self.orchestrator.lock().await;
        complete(&mut *orchestrator, outcome)
    }

    /// Runs one question turn. Returns true only if its answer (or the
    /// fallback) was applied to the live conversation.
    pub async fn submit(&self, question: &str) -> bool {
        let pending = {
            let mut orchestrator = self.orchestrator.lock().await;
            orchestrator.begin_question(question)
        };
        let Some(pending) = pending else {
            return false;
        };

        let outcome = self
            .api
            .ask_question(pending.question(), pending.top_k())
            .await;

        let applied = self
            .orchestrator
            .lock()
            .await
            .finish_question(pending, outcome);
        if !applied {
            debug!("session: question settled after its conversation ended");
        }
        applied
    }

    /// Submits the current input draft of the chat view.
    pub async fn submit_input(&self) -> bool {
        let draft = {
            let orchestrator = self.orchestrator.lock().await;
            match orchestrator.conversation() {
                Some(conversation) => conversation.input().to_string(),
                None => return false,
            }
        };
        self.submit(&draft).await
    }
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
