use std::sync::Arc;

use haven_assistant::{
    AssistantApi, AssistantConfig, AssistantError, FileStore, FileUploader, NoticeSink,
    OpenAIAssistantClient,
};
use haven_types::{ChatEvent, PollingConfig};

use crate::controller::{ChatController, EventSender};
use crate::error::Result;

/// Builder for constructing a ChatController with optional components
pub struct ChatControllerBuilder {
    openai: Option<AssistantConfig>,
    assistant: Option<Arc<dyn AssistantApi>>,
    file_store: Option<Arc<dyn FileStore>>,
    polling: PollingConfig,
    events: Option<EventSender>,
}

impl ChatControllerBuilder {
    pub fn new() -> Self {
        Self {
            openai: None,
            assistant: None,
            file_store: None,
            polling: PollingConfig::default(),
            events: None,
        }
    }

    /// Use the OpenAI client for both the assistant API and file uploads
    pub fn openai(mut self, config: &AssistantConfig) -> Self {
        self.openai = Some(config.clone());
        self
    }

    /// Set the assistant API
    pub fn assistant(mut self, assistant: Arc<dyn AssistantApi>) -> Self {
        self.assistant = Some(assistant);
        self
    }

    /// Set the file store used for attachments
    pub fn file_store(mut self, store: Arc<dyn FileStore>) -> Self {
        self.file_store = Some(store);
        self
    }

    /// Set the polling policy
    pub fn polling(mut self, polling: PollingConfig) -> Self {
        self.polling = polling;
        self
    }

    /// Stream lifecycle events to `sender`
    pub fn events(mut self, sender: EventSender) -> Self {
        self.events = Some(sender);
        self
    }

    /// Build the ChatController.
    ///
    /// Explicitly set components win over the ones derived from `openai`.
    pub fn build(self) -> Result<ChatController> {
        let client = match &self.openai {
            Some(config) => Some(Arc::new(OpenAIAssistantClient::new(config)?)),
            None => None,
        };

        let assistant: Arc<dyn AssistantApi> = match (self.assistant, &client) {
            (Some(assistant), _) => assistant,
            (None, Some(client)) => client.clone(),
            (None, None) => {
                return Err(
                    AssistantError::InvalidConfig("Assistant API client is required".into()).into(),
                )
            }
        };

        let store: Arc<dyn FileStore> = match (self.file_store, &client) {
            (Some(store), _) => store,
            (None, Some(client)) => client.clone(),
            (None, None) => {
                return Err(AssistantError::InvalidConfig("File store is required".into()).into())
            }
        };

        let mut uploader = FileUploader::new(store);
        if let Some(tx) = self.events.clone() {
            let sink: NoticeSink = Arc::new(move |notice| {
                let _ = tx.send(ChatEvent::Notice { notice });
            });
            uploader = uploader.with_notices(sink);
        }

        Ok(ChatController::from_parts(
            assistant,
            uploader,
            self.polling,
            self.events,
        ))
    }
}

impl Default for ChatControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
