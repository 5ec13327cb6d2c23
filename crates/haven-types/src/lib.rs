pub mod config;
pub mod events;
pub mod message;
pub mod state;

pub use config::PollingConfig;
pub use events::{ChatEvent, SubmissionPhase};
pub use message::{ChatMessage, MessageRole};
pub use state::{ChatSnapshot, SubmissionOutcome};
