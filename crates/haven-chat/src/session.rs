use haven_assistant::AssistantConfig;
use tracing::warn;

use crate::builder::ChatControllerBuilder;
use crate::controller::ChatController;
use crate::error::Result;

/// Whether a chat can be offered at all.
///
/// A missing API key or assistant id is a state to show the user, not an
/// error to surface mid-conversation.
pub enum ChatAvailability {
    Ready(ChatController),
    ConfigurationRequired { missing: Vec<&'static str> },
}

impl ChatAvailability {
    /// Check the process environment and finish `builder` with it
    pub fn from_env(builder: ChatControllerBuilder) -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok(), builder)
    }

    pub fn from_lookup<F>(lookup: F, builder: ChatControllerBuilder) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing = AssistantConfig::missing_vars(&lookup);
        if !missing.is_empty() {
            warn!(?missing, "assistant configuration missing");
            return Ok(ChatAvailability::ConfigurationRequired { missing });
        }

        let config = AssistantConfig::from_lookup(&lookup)?;
        let controller = builder.openai(&config).build()?;
        Ok(ChatAvailability::Ready(controller))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ChatAvailability::Ready(_))
    }
}
