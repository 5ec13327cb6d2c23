//! # Haven - Document-aware chat assistant client
//!
//! Haven drives a conversation with a hosted OpenAI assistant:
//! - 📎 **File attachments** (validated, uploaded one by one with progress)
//! - 🧵 **Threads and runs** (OpenAI Assistants v2 over `reqwest`)
//! - ⏱️ **Run polling** (bounded attempts, typed transient-error retries)
//! - 📡 **Lifecycle events** (phase, status line, notices over an mpsc channel)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use haven::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ChatError> {
//!     let config = AssistantConfig::from_env()?;
//!     let chat = ChatController::new(&config)?;
//!     chat.initialize().await?;
//!
//!     let outcome = chat.send_message("What does clause 4 say?", vec![]).await?;
//!     if let SubmissionOutcome::Answered { replies } = outcome {
//!         for reply in replies {
//!             println!("{}", reply.content);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **haven-assistant**: OpenAI Assistants client, file uploader, config and errors
//! - **haven-types**: transcript messages, events, snapshots, polling policy
//! - **haven-chat**: the submission lifecycle controller and run poller
//!
//! ### Attachments and events
//!
//! ```rust,no_run
//! use haven::prelude::*;
//! use tokio::sync::mpsc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let (tx, mut rx) = mpsc::unbounded_channel();
//! let chat = ChatController::builder()
//!     .openai(&AssistantConfig::from_env()?)
//!     .events(tx)
//!     .build()?;
//! chat.initialize().await?;
//!
//! let file = LocalFile::from_path("lease.pdf").await?;
//! tokio::spawn(async move {
//!     while let Some(event) = rx.recv().await {
//!         if let ChatEvent::StatusChanged { content: Some(status) } = event {
//!             println!("[{}]", status);
//!         }
//!     }
//! });
//! chat.send_message("Summarize this lease", vec![file]).await?;
//! # Ok(())
//! # }
//! ```

// Re-export all public APIs
pub use haven_assistant as assistant;
pub use haven_chat as chat;
pub use haven_types as types;

// Re-export commonly used types
pub use haven_assistant::{
    AssistantApi, AssistantConfig, AssistantError, ErrorKind, FileStore, LocalFile, Notice,
    OpenAIAssistantClient,
};
pub use haven_chat::{ChatAvailability, ChatController, ChatControllerBuilder, ChatError};
pub use haven_types::{ChatEvent, ChatMessage, ChatSnapshot, PollingConfig, SubmissionOutcome};

/// Convenient prelude with commonly used types
pub mod prelude {
    pub use crate::assistant::{AssistantConfig, LocalFile, Notice, NoticeLevel};
    pub use crate::chat::{ChatAvailability, ChatController, ChatError};
    pub use crate::types::{
        ChatEvent, ChatMessage, MessageRole, PollingConfig, SubmissionOutcome, SubmissionPhase,
    };
}
