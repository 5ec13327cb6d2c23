use crate::message::ChatMessage;
use haven_assistant::{ErrorKind, Notice, RunStatus, UploadProgress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a submission currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Uploading,
    Attaching,
    Messaging,
    Running,
    Polling,
    Succeeded,
    Failed,
}

impl SubmissionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionPhase::Succeeded | SubmissionPhase::Failed)
    }
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionPhase::Idle => "idle",
            SubmissionPhase::Uploading => "uploading",
            SubmissionPhase::Attaching => "attaching",
            SubmissionPhase::Messaging => "messaging",
            SubmissionPhase::Running => "running",
            SubmissionPhase::Polling => "polling",
            SubmissionPhase::Succeeded => "succeeded",
            SubmissionPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Everything the presentation layer may want to react to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Submission moved to a new phase
    PhaseChanged {
        phase: SubmissionPhase,
    },

    /// The single status line was set (`Some`) or cleared (`None`)
    StatusChanged {
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },

    /// A user or assistant message was added to the transcript
    MessageAppended {
        message: ChatMessage,
    },

    UploadProgress {
        progress: UploadProgress,
    },

    /// One status check of the current run
    RunStatus {
        run_id: String,
        status: RunStatus,
        attempt: u32,
    },

    Notice {
        notice: Notice,
    },

    /// Submission failed
    Error {
        kind: ErrorKind,
        message: String,
    },

    /// Submission succeeded with this many assistant replies
    Completed {
        replies: usize,
    },
}
