use crate::events::SubmissionPhase;
use crate::message::{ChatMessage, MessageRole};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time view of the chat for rendering
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSnapshot {
    pub thread_id: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub phase: SubmissionPhase,
    pub is_loading: bool,
    pub is_uploading: bool,
    pub error: Option<String>,
    /// filename -> percent
    pub upload_progress: BTreeMap<String, u8>,
    pub uploaded_file_ids: Vec<String>,
    pub current_run: Option<String>,
}

impl ChatSnapshot {
    pub fn count_role(&self, role: MessageRole) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }

    pub fn status_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.is_system())
    }

    /// Submit is disabled while this holds
    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_uploading
    }
}

/// Result of a successful `send_message` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// Empty text and no files: nothing happened
    Ignored,
    /// The run completed and these replies were appended
    Answered { replies: Vec<ChatMessage> },
}
