use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A problem with a single file in an upload batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIssue {
    pub file: String,
    pub message: String,
}

impl FileIssue {
    pub fn new(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
        }
    }
}

/// Coarse classification attached to every failure.
///
/// Retry decisions switch on the kind instead of inspecting error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required settings are absent or malformed
    Configuration,
    /// A file was rejected before any network call
    Validation,
    /// One or more files failed to upload
    Upload,
    /// The assistant service answered with a non-success status
    Service,
    /// Network or I/O failure that may succeed on a later attempt
    Transient,
    /// The run reached a non-success terminal status
    RunFailed,
    /// The run completed but produced no usable reply
    EmptyResponse,
    /// Polling gave up
    Timeout,
    /// Another submission is still in flight
    Busy,
    /// No thread has been created yet
    NotInitialized,
}

impl ErrorKind {
    /// Whether a status check failing with this kind should be retried
    pub fn is_retryable_while_polling(self) -> bool {
        matches!(self, ErrorKind::Service | ErrorKind::Transient)
    }
}

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Missing configuration: {var} is not set")]
    MissingConfig { var: &'static str },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{}", join_messages(.issues))]
    Validation { issues: Vec<FileIssue> },

    #[error("Upload failed:\n{}", join_failures(.failures))]
    Upload { failures: Vec<FileIssue> },

    #[error("Assistant API error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssistantError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssistantError::MissingConfig { .. } | AssistantError::InvalidConfig(_) => {
                ErrorKind::Configuration
            }
            AssistantError::Validation { .. } => ErrorKind::Validation,
            AssistantError::Upload { .. } => ErrorKind::Upload,
            AssistantError::Service { .. } | AssistantError::InvalidResponse(_) => {
                ErrorKind::Service
            }
            AssistantError::Transport(_) | AssistantError::Io(_) => ErrorKind::Transient,
        }
    }

    /// Message suitable for a per-file failure line
    pub fn reason(&self) -> String {
        match self {
            AssistantError::Service { message, .. } => message.clone(),
            AssistantError::InvalidResponse(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

fn join_messages(issues: &[FileIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_failures(failures: &[FileIssue]) -> String {
    failures
        .iter()
        .map(|failure| format!("{}: {}", failure.file, failure.message))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_error_lists_every_failure() {
        let err = AssistantError::Upload {
            failures: vec![
                FileIssue::new("a.pdf", "quota exceeded"),
                FileIssue::new("b.txt", "bad request"),
            ],
        };

        assert_eq!(
            err.to_string(),
            "Upload failed:\na.pdf: quota exceeded\nb.txt: bad request"
        );
        assert_eq!(err.kind(), ErrorKind::Upload);
    }

    #[test]
    fn test_service_reason_is_message_only() {
        let err = AssistantError::Service {
            status: 429,
            message: "Rate limit reached".to_string(),
        };
        assert_eq!(err.reason(), "Rate limit reached");
        assert!(err.kind().is_retryable_while_polling());
    }

    #[test]
    fn test_validation_is_not_retryable() {
        let err = AssistantError::Validation {
            issues: vec![FileIssue::new("x.exe", "\"x.exe\" is not supported")],
        };
        assert_eq!(err.to_string(), "\"x.exe\" is not supported");
        assert!(!err.kind().is_retryable_while_polling());
    }
}
