pub mod builder;
pub mod controller;
pub mod error;
pub mod poller;
pub mod session;
pub mod transcript;

pub use builder::ChatControllerBuilder;
pub use controller::{ChatController, EventSender, DEFAULT_INSTRUCTIONS, FILE_INSTRUCTIONS};
pub use error::{ChatError, Result};
pub use poller::RunPoller;
pub use session::ChatAvailability;
pub use transcript::Transcript;

// Re-export key types from haven-types
pub use haven_types::{
    ChatEvent, ChatMessage, ChatSnapshot, MessageRole, PollingConfig, SubmissionOutcome,
    SubmissionPhase,
};
