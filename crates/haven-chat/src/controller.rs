use crate::builder::ChatControllerBuilder;
use crate::error::{ChatError, Result};
use crate::poller::RunPoller;
use crate::transcript::Transcript;
use haven_assistant::{
    AssistantApi, AssistantConfig, FileUploader, LocalFile, MessageRequest, Notice, Run,
    UploadProgress, UploadedFile,
};
use haven_types::{
    ChatEvent, ChatMessage, ChatSnapshot, PollingConfig, SubmissionOutcome, SubmissionPhase,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub type EventSender = mpsc::UnboundedSender<ChatEvent>;

pub const FILE_INSTRUCTIONS: &str = "The user has uploaded files. Please analyze them along with any messages to provide relevant insights and responses.";
pub const DEFAULT_INSTRUCTIONS: &str =
    "Respond to the user's message in a helpful and informative way.";

const STATUS_ATTACHING: &str = "Attaching files to conversation...";
const STATUS_PROCESSING: &str = "Processing your request...";

/// Drives one submission at a time through
/// upload → attach → message → run → poll, keeping a transcript and
/// state snapshot for the presentation layer.
pub struct ChatController {
    assistant: Arc<dyn AssistantApi>,
    uploader: FileUploader,
    polling: PollingConfig,
    state: Mutex<ChatState>,
    busy: AtomicBool,
    events: Option<EventSender>,
}

#[derive(Default)]
struct ChatState {
    thread_id: Option<String>,
    transcript: Transcript,
    phase: SubmissionPhase,
    error: Option<String>,
    upload_progress: BTreeMap<String, u8>,
    uploaded_file_ids: Vec<String>,
    current_run: Option<String>,
    is_uploading: bool,
}

impl ChatState {
    fn reset_submission(&mut self) {
        self.upload_progress.clear();
        self.uploaded_file_ids.clear();
        self.current_run = None;
        self.is_uploading = false;
    }
}

/// Holds the busy flag for the lifetime of a submission
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ChatController {
    /// Controller talking to the OpenAI Assistants API
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        Self::builder().openai(config).build()
    }

    /// Create a builder for fluent construction
    pub fn builder() -> ChatControllerBuilder {
        ChatControllerBuilder::new()
    }

    pub(crate) fn from_parts(
        assistant: Arc<dyn AssistantApi>,
        uploader: FileUploader,
        polling: PollingConfig,
        events: Option<EventSender>,
    ) -> Self {
        Self {
            assistant,
            uploader,
            polling,
            state: Mutex::new(ChatState::default()),
            busy: AtomicBool::new(false),
            events,
        }
    }

    pub fn polling(&self) -> &PollingConfig {
        &self.polling
    }

    pub fn thread_id(&self) -> Option<String> {
        self.state.lock().thread_id.clone()
    }

    /// A submission (or initialization) is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        let is_loading = self.is_busy();
        let state = self.state.lock();

        ChatSnapshot {
            thread_id: state.thread_id.clone(),
            messages: state.transcript.messages().to_vec(),
            phase: state.phase,
            is_loading,
            is_uploading: state.is_uploading,
            error: state.error.clone(),
            upload_progress: state.upload_progress.clone(),
            uploaded_file_ids: state.uploaded_file_ids.clone(),
            current_run: state.current_run.clone(),
        }
    }

    /// Create the conversation thread. Calling again keeps the existing one.
    pub async fn initialize(&self) -> Result<String> {
        if let Some(id) = self.thread_id() {
            return Ok(id);
        }

        let _guard = BusyGuard::acquire(&self.busy).ok_or(ChatError::Busy)?;

        match self.assistant.create_thread().await {
            Ok(thread) => {
                let mut state = self.state.lock();
                state.thread_id = Some(thread.id.clone());
                state.error = None;
                Ok(thread.id)
            }
            Err(e) => {
                let err = ChatError::from(e);
                warn!(error = %err, "failed to initialize chat");
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Submit user text with optional attachments and wait for the reply.
    ///
    /// Blank text without files is ignored. A second call while one is in
    /// flight fails with `ChatError::Busy` and leaves the state untouched.
    pub async fn send_message(
        &self,
        content: &str,
        files: Vec<LocalFile>,
    ) -> Result<SubmissionOutcome> {
        if content.trim().is_empty() && files.is_empty() {
            debug!("ignoring empty submission");
            return Ok(SubmissionOutcome::Ignored);
        }

        let _guard = BusyGuard::acquire(&self.busy).ok_or(ChatError::Busy)?;
        self.state.lock().error = None;

        info!(files = files.len(), "submitting message");

        match self.drive(content, &files).await {
            Ok(replies) => {
                self.finish_success(&replies);
                Ok(SubmissionOutcome::Answered { replies })
            }
            Err(err) => {
                warn!(kind = ?err.kind(), error = %err, "submission failed");
                self.finish_failure(&err);
                Err(err)
            }
        }
    }

    async fn drive(&self, content: &str, files: &[LocalFile]) -> Result<Vec<ChatMessage>> {
        let thread_id = self.thread_id().ok_or(ChatError::NotInitialized)?;

        let uploaded = if files.is_empty() {
            Vec::new()
        } else {
            self.upload_and_attach(&thread_id, files).await?
        };
        let has_files = !uploaded.is_empty();

        self.append(ChatMessage::user(content).with_files(uploaded));

        self.enter(SubmissionPhase::Messaging);
        self.set_status(STATUS_PROCESSING);
        // an attachment-only submission is already on the thread
        if !content.trim().is_empty() {
            self.assistant
                .post_message(&thread_id, MessageRequest::user(content))
                .await?;
        }

        self.enter(SubmissionPhase::Running);
        let instructions = if has_files {
            FILE_INSTRUCTIONS
        } else {
            DEFAULT_INSTRUCTIONS
        };
        let run = self.assistant.create_run(&thread_id, Some(instructions)).await?;
        if run.id.is_empty() {
            return Err(ChatError::RunFailed {
                status: run.status,
                message: "Failed to start assistant run: No run ID returned".to_string(),
            });
        }
        self.state.lock().current_run = Some(run.id.clone());

        self.enter(SubmissionPhase::Polling);
        let poller = RunPoller::new(self.assistant.as_ref(), &self.polling);
        poller
            .wait_for_completion(&thread_id, &run.id, |run, attempt| {
                self.observe_run(run, attempt)
            })
            .await?;

        poller.fetch_replies(&thread_id).await
    }

    async fn upload_and_attach(
        &self,
        thread_id: &str,
        files: &[LocalFile],
    ) -> Result<Vec<UploadedFile>> {
        self.enter(SubmissionPhase::Uploading);
        self.set_status(format!(
            "Uploading {} file{}...",
            files.len(),
            if files.len() > 1 { "s" } else { "" }
        ));
        self.state.lock().is_uploading = true;

        let result = self
            .uploader
            .upload_all(files, |progress| self.record_progress(progress))
            .await;
        self.state.lock().is_uploading = false;
        let uploaded = result?;

        let file_ids: Vec<String> = uploaded.iter().map(|f| f.id.clone()).collect();
        self.state.lock().uploaded_file_ids = file_ids.clone();

        self.enter(SubmissionPhase::Attaching);
        self.set_status(STATUS_ATTACHING);
        self.assistant.attach_files(thread_id, &file_ids).await?;

        self.clear_status();
        Ok(uploaded)
    }

    fn observe_run(&self, run: &Run, attempt: u32) {
        debug!(run_id = %run.id, status = %run.status, attempt, "polled run");
        self.emit(ChatEvent::RunStatus {
            run_id: run.id.clone(),
            status: run.status,
            attempt,
        });

        if !run.status.is_terminal() {
            let showing = self
                .state
                .lock()
                .transcript
                .status()
                .is_some_and(|m| m.content == STATUS_PROCESSING);
            if !showing {
                self.set_status(STATUS_PROCESSING);
            }
        }
    }

    fn record_progress(&self, progress: UploadProgress) {
        self.state
            .lock()
            .upload_progress
            .insert(progress.filename.clone(), progress.progress);
        self.emit(ChatEvent::UploadProgress { progress });
    }

    fn finish_success(&self, replies: &[ChatMessage]) {
        let cleared = {
            let mut state = self.state.lock();
            let cleared = state.transcript.clear_status();
            for reply in replies {
                state.transcript.push(reply.clone());
            }
            state.reset_submission();
            cleared
        };

        if cleared {
            self.emit(ChatEvent::StatusChanged { content: None });
        }
        for reply in replies {
            self.emit(ChatEvent::MessageAppended {
                message: reply.clone(),
            });
        }
        self.enter(SubmissionPhase::Succeeded);
        self.emit(ChatEvent::Completed {
            replies: replies.len(),
        });
        self.enter(SubmissionPhase::Idle);
    }

    fn finish_failure(&self, err: &ChatError) {
        self.clear_status();
        self.state.lock().reset_submission();
        self.record_error(err);
        self.enter(SubmissionPhase::Failed);
        self.enter(SubmissionPhase::Idle);
    }

    fn record_error(&self, err: &ChatError) {
        self.state.lock().error = Some(err.display_message());
        self.emit(ChatEvent::Error {
            kind: err.kind(),
            message: err.to_string(),
        });
        self.emit(ChatEvent::Notice {
            notice: Notice::error(err.notice_title(), err.to_string()),
        });
    }

    fn enter(&self, phase: SubmissionPhase) {
        self.state.lock().phase = phase;
        debug!(%phase, "submission phase");
        self.emit(ChatEvent::PhaseChanged { phase });
    }

    fn append(&self, message: ChatMessage) {
        self.state.lock().transcript.push(message.clone());
        self.emit(ChatEvent::MessageAppended { message });
    }

    fn set_status(&self, content: impl Into<String>) {
        let message = self.state.lock().transcript.set_status(content);
        self.emit(ChatEvent::StatusChanged {
            content: Some(message.content),
        });
    }

    fn clear_status(&self) {
        if self.state.lock().transcript.clear_status() {
            self.emit(ChatEvent::StatusChanged { content: None });
        }
    }

    fn emit(&self, event: ChatEvent) {
        if let Some(tx) = &self.events {
            // a dropped receiver just means nobody is listening
            let _ = tx.send(event);
        }
    }
}
