use serde::{Deserialize, Serialize};

/// Server-side conversation session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadRole {
    User,
    Assistant,
}

/// Message stored on a thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: ThreadRole,
    #[serde(default)]
    pub content: Vec<MessageContent>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

impl ThreadMessage {
    /// Text of the first content part, if it is text
    pub fn text(&self) -> Option<&str> {
        match self.content.first()? {
            MessageContent::Text { text } => Some(text.value.as_str()),
            MessageContent::Other => None,
        }
    }

    /// Assistant-authored message carrying non-empty text
    pub fn is_assistant_reply(&self) -> bool {
        self.role == ThreadRole::Assistant
            && self.text().is_some_and(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextValue },

    // image_file, image_url, refusal...
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextValue {
    pub value: String,
    #[serde(default)]
    pub annotations: Vec<serde_json::Value>,
}

/// File reference carried by a posted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_id: String,
    pub tools: Vec<AttachmentTool>,
}

impl Attachment {
    /// Attach a file for retrieval by the assistant
    pub fn file_search(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            tools: vec![AttachmentTool::FileSearch],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttachmentTool {
    FileSearch,
    CodeInterpreter,
}

/// Body of `POST /threads/{id}/messages`
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    pub role: ThreadRole,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl MessageRequest {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ThreadRole::User,
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_files<I, S>(mut self, file_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attachments
            .extend(file_ids.into_iter().map(Attachment::file_search));
        self
    }
}
