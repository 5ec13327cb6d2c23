use crate::error::Result;
use crate::types::{FileObject, LocalFile, MessageRequest, Run, Thread, ThreadMessage};
use async_trait::async_trait;

/// Request wrappers around the assistant service.
///
/// Implementations attach credentials, map non-success responses to
/// `AssistantError::Service` and never retry.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Create an empty conversation thread
    async fn create_thread(&self) -> Result<Thread>;

    /// Make uploaded files available to the thread.
    ///
    /// Returns `None` without a request when `file_ids` is empty.
    async fn attach_files(
        &self,
        thread_id: &str,
        file_ids: &[String],
    ) -> Result<Option<ThreadMessage>>;

    /// Post a user message
    async fn post_message(&self, thread_id: &str, request: MessageRequest)
        -> Result<ThreadMessage>;

    /// Start the configured assistant on the thread
    async fn create_run(&self, thread_id: &str, instructions: Option<&str>) -> Result<Run>;

    /// Fetch the current state of a run
    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// Newest page of thread messages (most recent first)
    async fn latest_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;
}

/// Destination for file uploads
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload_file(&self, file: &LocalFile) -> Result<FileObject>;
}
