pub mod file;
pub mod notice;
pub mod run;
pub mod thread;

pub use file::{FileObject, FileSource, LocalFile, UploadProgress, UploadedFile};
pub use notice::{Notice, NoticeLevel, NoticeSink};
pub use run::{Run, RunError, RunRequest, RunStatus};
pub use thread::{
    Attachment, AttachmentTool, MessageContent, MessageRequest, TextValue, Thread, ThreadMessage,
    ThreadRole,
};
