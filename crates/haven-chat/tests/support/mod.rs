#![allow(dead_code)]

use async_trait::async_trait;
use haven_assistant::{
    AssistantApi, AssistantError, FileObject, FileStore, LocalFile, MessageRequest, Run,
    RunError, RunStatus, Thread, ThreadMessage,
};
use haven_chat::{ChatController, PollingConfig};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, OnceLock, Weak};

pub const THREAD_ID: &str = "thread_abc";
pub const RUN_ID: &str = "run_123";

/// Assistant double that replays a scripted sequence of run statuses.
///
/// Once the script runs out every further status check returns
/// `fallback`. When observing a controller, the number of system messages
/// in its transcript is sampled on every call.
pub struct ScriptedAssistant {
    polls: Mutex<VecDeque<haven_assistant::Result<Run>>>,
    fallback: RunStatus,
    replies: Vec<ThreadMessage>,
    run_id: String,
    calls: Mutex<Vec<String>>,
    attached: Mutex<Vec<String>>,
    posted: Mutex<Vec<MessageRequest>>,
    instructions: Mutex<Vec<Option<String>>>,
    system_counts: Mutex<Vec<usize>>,
    observed: OnceLock<Weak<ChatController>>,
}

impl ScriptedAssistant {
    pub fn new(statuses: &[RunStatus]) -> Self {
        Self {
            polls: Mutex::new(statuses.iter().map(|s| Ok(run(*s))).collect()),
            fallback: RunStatus::InProgress,
            replies: vec![assistant_message("msg_1", "Hello there")],
            run_id: RUN_ID.to_string(),
            calls: Mutex::new(Vec::new()),
            attached: Mutex::new(Vec::new()),
            posted: Mutex::new(Vec::new()),
            instructions: Mutex::new(Vec::new()),
            system_counts: Mutex::new(Vec::new()),
            observed: OnceLock::new(),
        }
    }

    /// Replace the status script with arbitrary poll results
    pub fn with_polls(self, polls: Vec<haven_assistant::Result<Run>>) -> Self {
        *self.polls.lock().unwrap() = polls.into();
        self
    }

    pub fn with_replies(mut self, replies: Vec<ThreadMessage>) -> Self {
        self.replies = replies;
        self
    }

    pub fn with_run_id(mut self, id: &str) -> Self {
        self.run_id = id.to_string();
        self
    }

    pub fn observe(&self, controller: &Arc<ChatController>) {
        let _ = self.observed.set(Arc::downgrade(controller));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn attached(&self) -> Vec<String> {
        self.attached.lock().unwrap().clone()
    }

    pub fn posted(&self) -> Vec<MessageRequest> {
        self.posted.lock().unwrap().clone()
    }

    pub fn instructions(&self) -> Vec<Option<String>> {
        self.instructions.lock().unwrap().clone()
    }

    /// Largest number of system messages seen at any call
    pub fn max_system_messages(&self) -> usize {
        self.system_counts
            .lock()
            .unwrap()
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());

        if let Some(controller) = self.observed.get().and_then(Weak::upgrade) {
            let snapshot = controller.snapshot();
            let count = snapshot.messages.iter().filter(|m| m.is_system()).count();
            self.system_counts.lock().unwrap().push(count);
        }
    }
}

#[async_trait]
impl AssistantApi for ScriptedAssistant {
    async fn create_thread(&self) -> haven_assistant::Result<Thread> {
        self.record("create_thread");
        Ok(Thread {
            id: THREAD_ID.to_string(),
            created_at: 0,
        })
    }

    async fn attach_files(
        &self,
        _thread_id: &str,
        file_ids: &[String],
    ) -> haven_assistant::Result<Option<ThreadMessage>> {
        self.record("attach_files");
        self.attached.lock().unwrap().extend(file_ids.iter().cloned());
        Ok(None)
    }

    async fn post_message(
        &self,
        _thread_id: &str,
        request: MessageRequest,
    ) -> haven_assistant::Result<ThreadMessage> {
        self.record("post_message");
        let message = user_message("msg_user", &request.content);
        self.posted.lock().unwrap().push(request);
        Ok(message)
    }

    async fn create_run(
        &self,
        thread_id: &str,
        instructions: Option<&str>,
    ) -> haven_assistant::Result<Run> {
        self.record("create_run");
        self.instructions
            .lock()
            .unwrap()
            .push(instructions.map(str::to_string));
        Ok(Run {
            id: self.run_id.clone(),
            status: RunStatus::Queued,
            thread_id: thread_id.to_string(),
            assistant_id: "asst_test".to_string(),
            last_error: None,
        })
    }

    async fn run_status(&self, _thread_id: &str, _run_id: &str) -> haven_assistant::Result<Run> {
        self.record("run_status");
        let next = self.polls.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(run(self.fallback)))
    }

    async fn latest_messages(&self, _thread_id: &str) -> haven_assistant::Result<Vec<ThreadMessage>> {
        self.record("latest_messages");
        Ok(self.replies.clone())
    }
}

/// File store that names each file id after the file and fails for chosen names
#[derive(Default)]
pub struct MemoryStore {
    failing: HashSet<String>,
    uploads: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn failing(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn upload_file(&self, file: &LocalFile) -> haven_assistant::Result<FileObject> {
        self.uploads.lock().unwrap().push(file.name().to_string());

        if self.failing.contains(file.name()) {
            return Err(AssistantError::Service {
                status: 400,
                message: "Invalid file format".to_string(),
            });
        }

        Ok(FileObject {
            id: format!("file-{}", file.name()),
            bytes: file.size(),
            created_at: 0,
            filename: file.name().to_string(),
            purpose: "assistants".to_string(),
        })
    }
}

pub fn run(status: RunStatus) -> Run {
    Run {
        id: RUN_ID.to_string(),
        status,
        thread_id: THREAD_ID.to_string(),
        assistant_id: "asst_test".to_string(),
        last_error: None,
    }
}

pub fn failed_run(message: &str) -> Run {
    Run {
        last_error: Some(RunError {
            code: "rate_limit_exceeded".to_string(),
            message: message.to_string(),
        }),
        ..run(RunStatus::Failed)
    }
}

pub fn transient_error() -> AssistantError {
    AssistantError::Service {
        status: 502,
        message: "Bad gateway".to_string(),
    }
}

fn thread_message(id: &str, role: &str, text: &str) -> ThreadMessage {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "role": role,
        "content": [{"type": "text", "text": {"value": text, "annotations": []}}],
        "created_at": 0
    }))
    .unwrap()
}

pub fn assistant_message(id: &str, text: &str) -> ThreadMessage {
    thread_message(id, "assistant", text)
}

pub fn user_message(id: &str, text: &str) -> ThreadMessage {
    thread_message(id, "user", text)
}

/// Fast polling so tests without a paused clock stay quick
pub fn fast_polling() -> PollingConfig {
    PollingConfig::new().with_interval(std::time::Duration::from_millis(1))
}

pub fn controller(
    assistant: Arc<ScriptedAssistant>,
    store: Arc<MemoryStore>,
    polling: PollingConfig,
) -> Arc<ChatController> {
    let controller = Arc::new(
        ChatController::builder()
            .assistant(assistant.clone())
            .file_store(store)
            .polling(polling)
            .build()
            .unwrap(),
    );
    assistant.observe(&controller);
    controller
}
