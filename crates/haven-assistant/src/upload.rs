// Validated, sequential file uploads with per-file progress

use crate::error::{AssistantError, FileIssue, Result};
use crate::traits::FileStore;
use crate::types::{LocalFile, Notice, NoticeSink, UploadProgress, UploadedFile};
use std::sync::Arc;
use tracing::{error, info};

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];
pub const MAX_FILE_SIZE: u64 = 512 * 1024 * 1024;

const REJECTED_FILE: &str = "File was rejected. Please try a different format.";

/// Check every file of a batch against the extension allow-list and the
/// size ceiling. All offending files are reported together.
pub fn validate_files(files: &[LocalFile]) -> Result<()> {
    let issues: Vec<FileIssue> = files.iter().filter_map(validate_file).collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AssistantError::Validation { issues })
    }
}

fn validate_file(file: &LocalFile) -> Option<FileIssue> {
    let supported = file
        .extension()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));

    if !supported {
        return Some(FileIssue::new(
            file.name(),
            format!(
                "\"{}\" is not supported. Allowed formats: {}",
                file.name(),
                ALLOWED_EXTENSIONS.join(", ")
            ),
        ));
    }

    if file.size() > MAX_FILE_SIZE {
        return Some(FileIssue::new(
            file.name(),
            format!(
                "\"{}\" is too large ({:.1}MB). Max size: 512MB",
                file.name(),
                file.size() as f64 / 1024.0 / 1024.0
            ),
        ));
    }

    None
}

/// Uploads a batch of files one at a time
#[derive(Clone)]
pub struct FileUploader {
    store: Arc<dyn FileStore>,
    notices: Option<NoticeSink>,
}

impl FileUploader {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self {
            store,
            notices: None,
        }
    }

    /// Deliver per-file success/failure notices to `sink`
    pub fn with_notices(mut self, sink: NoticeSink) -> Self {
        self.notices = Some(sink);
        self
    }

    /// Validate then upload `files` in order.
    ///
    /// A failing file does not stop the batch, but the call as a whole
    /// fails if any file did, listing every failure.
    pub async fn upload_all<F>(
        &self,
        files: &[LocalFile],
        mut on_progress: F,
    ) -> Result<Vec<UploadedFile>>
    where
        F: FnMut(UploadProgress) + Send,
    {
        validate_files(files)?;

        let mut uploaded = Vec::with_capacity(files.len());
        let mut failures = Vec::new();

        for file in files {
            on_progress(UploadProgress::started(file.name()));

            match self.upload_one(file).await {
                Ok(done) => {
                    on_progress(UploadProgress::finished(file.name(), done.id.clone()));
                    info!(file = file.name(), file_id = %done.id, size = done.bytes, "file uploaded");
                    self.notify(Notice::success(
                        "File uploaded",
                        format!("\"{}\" was uploaded successfully", file.name()),
                    ));
                    uploaded.push(done);
                }
                Err(e) => {
                    let reason = e.reason();
                    error!(file = file.name(), error = %reason, "file upload failed");
                    self.notify(Notice::error(
                        "File upload failed",
                        format!("{}: {}", file.name(), reason),
                    ));
                    failures.push(FileIssue::new(file.name(), reason));
                }
            }
        }

        if failures.is_empty() {
            Ok(uploaded)
        } else {
            Err(AssistantError::Upload { failures })
        }
    }

    async fn upload_one(&self, file: &LocalFile) -> Result<UploadedFile> {
        let object = self.store.upload_file(file).await?;

        if object.id.is_empty() {
            return Err(AssistantError::InvalidResponse(REJECTED_FILE.to_string()));
        }

        Ok(UploadedFile {
            id: object.id,
            filename: file.name().to_string(),
            bytes: if object.bytes > 0 { object.bytes } else { file.size() },
        })
    }

    fn notify(&self, notice: Notice) {
        if let Some(sink) = &self.notices {
            sink(notice);
        }
    }
}
