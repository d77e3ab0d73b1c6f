//! Session and conversational-query core of the support assistant client.
//!
//! [`orchestration::AssistantSession`] is the entry point for embedders; the
//! lower layers are public for callers that drive the state machine directly.

pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod logging;
pub mod orchestration;
pub mod view;

pub use api::{AssistantApi, HttpAssistantApi};
pub use config::{load_settings, ClientSettings};
pub use conversation::{ConversationController, ConversationSnapshot, PendingQuestion};
pub use error::ClientError;
pub use orchestration::AssistantSession;
pub use view::{View, ViewOrchestrator, ViewState};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
