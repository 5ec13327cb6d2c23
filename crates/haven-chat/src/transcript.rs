use haven_types::ChatMessage;

/// Ordered message log holding at most one system status message.
///
/// The status message, when present, is always the last entry.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a user or assistant message ahead of the status line.
    /// System messages replace the current status instead.
    pub fn push(&mut self, message: ChatMessage) {
        if message.is_system() {
            self.replace_status(message);
            return;
        }

        match self.status_index() {
            Some(idx) => self.messages.insert(idx, message),
            None => self.messages.push(message),
        }
    }

    /// Show `content` as the status line, replacing any previous one
    pub fn set_status(&mut self, content: impl Into<String>) -> ChatMessage {
        let message = ChatMessage::system(content);
        self.replace_status(message.clone());
        message
    }

    /// Remove the status line; returns whether one was present
    pub fn clear_status(&mut self) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| !m.is_system());
        self.messages.len() != before
    }

    pub fn status(&self) -> Option<&ChatMessage> {
        self.status_index().map(|idx| &self.messages[idx])
    }

    fn replace_status(&mut self, message: ChatMessage) {
        self.clear_status();
        self.messages.push(message);
    }

    fn status_index(&self) -> Option<usize> {
        self.messages.iter().position(|m| m.is_system())
    }
}
