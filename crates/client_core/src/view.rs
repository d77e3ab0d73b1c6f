//! Login / Signup / Chat view state machine.

use shared::{domain::AnswerResult, protocol::AuthOutcome};
use storage::SessionStore;
use tracing::{debug, info};

use crate::{
    conversation::{ConversationController, PendingQuestion},
    error::{ClientError, LOGIN_FAILED, SIGNUP_FAILED},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Signup,
    Chat,
}

/// The active view. Only `Chat` owns a conversation.
#[derive(Debug)]
pub enum ViewState {
    Login,
    Signup,
    Chat(ConversationController),
}

impl ViewState {
    pub fn view(&self) -> View {
        match self {
            Self::Login => View::Login,
            Self::Signup => View::Signup,
            Self::Chat(_) => View::Chat,
        }
    }

    pub fn on_show_signup(self) -> Self {
        match self {
            Self::Login => Self::Signup,
            other => other,
        }
    }

    pub fn on_back_to_login(self) -> Self {
        match self {
            Self::Signup => Self::Login,
            other => other,
        }
    }

    pub fn on_login_success(self, conversation: ConversationController) -> Self {
        match self {
            Self::Login => Self::Chat(conversation),
            other => other,
        }
    }

    pub fn on_signup_success(self, conversation: ConversationController) -> Self {
        match self {
            Self::Signup => Self::Chat(conversation),
            other => other,
        }
    }

    pub fn on_logout(self) -> Self {
        match self {
            Self::Chat(_) => Self::Login,
            other => other,
        }
    }
}

#[derive(Debug)]
pub struct ViewOrchestrator {
    session: SessionStore,
    state: ViewState,
    top_k: u32,
    conversations_started: u64,
}

impl ViewOrchestrator {
    /// Resumes straight into `Chat` when the store already holds a token.
    pub fn new(session: SessionStore, top_k: u32) -> Self {
        let mut orchestrator = Self {
            session,
            state: ViewState::Login,
            top_k,
            conversations_started: 0,
        };
        if orchestrator.session.has_token() {
            let conversation = orchestrator.next_conversation();
            orchestrator.state = ViewState::Chat(conversation);
            info!("view: resumed stored session");
        }
        orchestrator
    }

    pub fn view(&self) -> View {
        self.state.view()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn display_name(&self) -> String {
        self.session.display_name_or_default()
    }

    pub fn conversation(&self) -> Option<&ConversationController> {
        match &self.state {
            ViewState::Chat(conversation) => Some(conversation),
            _ => None,
        }
    }

    pub fn conversation_mut(&mut self) -> Option<&mut ConversationController> {
        match &mut self.state {
            ViewState::Chat(conversation) => Some(conversation),
            _ => None,
        }
    }

    fn next_conversation(&mut self) -> ConversationController {
        self.conversations_started += 1;
        ConversationController::new(self.conversations_started, self.top_k)
    }

    fn transition(&mut self, event: &'static str, apply: impl FnOnce(ViewState) -> ViewState) {
        let from = self.view();
        let state = std::mem::replace(&mut self.state, ViewState::Login);
        self.state = apply(state);
        let to = self.view();
        if from == to {
            debug!(event, view = ?from, "view: event ignored in current view");
        } else {
            info!(event, from = ?from, to = ?to, "view: transition");
        }
    }

    pub fn show_signup(&mut self) {
        self.transition("show_signup", ViewState::on_show_signup);
    }

    pub fn back_to_login(&mut self) {
        self.transition("back_to_login", ViewState::on_back_to_login);
    }

    /// Persists a usable login outcome and enters `Chat`.
    ///
    /// Outside the `Login` view the outcome is dropped unpersisted.
    pub fn complete_login(&mut self, outcome: AuthOutcome) -> Result<View, ClientError> {
        self.complete_auth(View::Login, outcome, LOGIN_FAILED)
    }

    pub fn complete_signup(&mut self, outcome: AuthOutcome) -> Result<View, ClientError> {
        self.complete_auth(View::Signup, outcome, SIGNUP_FAILED)
    }

    fn complete_auth(
        &mut self,
        expected: View,
        outcome: AuthOutcome,
        fallback: &str,
    ) -> Result<View, ClientError> {
        let Some(token) = outcome.access_token else {
            return Err(ClientError::missing_token(fallback));
        };
        if self.view() != expected {
            debug!(expected = ?expected, view = ?self.view(), "view: late auth result dropped");
            return Ok(self.view());
        }

        self.session.set_token(&token);
        if let Some(name) = outcome.user_name.as_deref() {
            self.session.set_display_name(name);
        }

        let conversation = self.next_conversation();
        match expected {
            View::Signup => {
                self.transition("signup_success", |s| s.on_signup_success(conversation))
            }
            _ => self.transition("login_success", |s| s.on_login_success(conversation)),
        }
        Ok(self.view())
    }

    /// Clears the stored session, then returns to `Login`. Dropping the
    /// conversation orphans any outstanding question ticket.
    pub fn logout(&mut self) {
        if self.view() != View::Chat {
            debug!(view = ?self.view(), "view: logout ignored outside chat");
            return;
        }
        self.session.clear();
        self.transition("logout", ViewState::on_logout);
    }

    pub fn begin_question(&mut self, question: &str) -> Option<PendingQuestion> {
        self.conversation_mut()?.begin_submit(question)
    }

    /// Returns false when the ticket belongs to a conversation that no longer exists.
    pub fn finish_question(
        &mut self,
        pending: PendingQuestion,
        outcome: Result<AnswerResult, ClientError>,
    ) -> bool {
        match self.conversation_mut() {
            Some(conversation) => conversation.complete(pending, outcome),
            None => {
                debug!(
                    ticket_instance = pending.instance(),
                    "view: answer arrived after logout, discarded"
                );
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
