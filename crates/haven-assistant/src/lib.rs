pub mod config;
pub mod error;
pub mod openai;
pub mod traits;
pub mod types;
pub mod upload;

pub use config::AssistantConfig;
pub use error::{AssistantError, ErrorKind, FileIssue, Result};
pub use openai::OpenAIAssistantClient;
pub use traits::{AssistantApi, FileStore};
pub use types::{
    Attachment, FileObject, LocalFile, MessageRequest, Notice, NoticeLevel, NoticeSink, Run,
    RunError, RunStatus, Thread, ThreadMessage, ThreadRole, UploadProgress, UploadedFile,
};
pub use upload::{validate_files, FileUploader, ALLOWED_EXTENSIONS, MAX_FILE_SIZE};
