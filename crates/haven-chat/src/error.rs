use haven_assistant::{AssistantError, ErrorKind, RunStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error(transparent)]
    Assistant(#[from] AssistantError),

    #[error("{message}")]
    RunFailed { status: RunStatus, message: String },

    #[error("Timeout: Assistant took too long to respond ({attempts} status checks)")]
    Timeout { attempts: u32 },

    #[error("Failed to check run status after {failures} retries: {last_error}")]
    RetriesExhausted { failures: u32, last_error: String },

    #[error("No valid response received from assistant")]
    NoValidResponse,

    #[error("A submission is already in progress")]
    Busy,

    #[error("Chat session not initialized. Please refresh and try again.")]
    NotInitialized,
}

impl ChatError {
    /// Error for a run that ended in a non-success terminal status
    pub fn from_terminal(status: RunStatus, last_error: Option<&str>) -> Self {
        let message = match status {
            RunStatus::Failed => format!(
                "Assistant run failed: {}",
                last_error.filter(|m| !m.is_empty()).unwrap_or("Unknown error")
            ),
            RunStatus::Cancelled => "Assistant run was cancelled".to_string(),
            RunStatus::Expired => "Run expired: took too long to complete".to_string(),
            RunStatus::Incomplete => "Assistant run ended before finishing its reply".to_string(),
            other => format!("Assistant run ended with status {}", other),
        };
        ChatError::RunFailed { status, message }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::Assistant(e) => e.kind(),
            ChatError::RunFailed { .. } => ErrorKind::RunFailed,
            ChatError::Timeout { .. } | ChatError::RetriesExhausted { .. } => ErrorKind::Timeout,
            ChatError::NoValidResponse => ErrorKind::EmptyResponse,
            ChatError::Busy => ErrorKind::Busy,
            ChatError::NotInitialized => ErrorKind::NotInitialized,
        }
    }

    /// Short message stored as the chat's current error
    pub fn display_message(&self) -> String {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::Upload => self.to_string(),
            ErrorKind::RunFailed | ErrorKind::EmptyResponse | ErrorKind::Timeout => {
                "Assistant failed to process your request".to_string()
            }
            ErrorKind::Service => "API request failed".to_string(),
            _ => self.to_string(),
        }
    }

    /// Title of the notice raised for this error; the full error text is
    /// its description
    pub fn notice_title(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::Upload => "File validation failed",
            ErrorKind::RunFailed | ErrorKind::EmptyResponse | ErrorKind::Timeout => {
                "Processing failed"
            }
            ErrorKind::Service => "API Error",
            _ => "Error",
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
