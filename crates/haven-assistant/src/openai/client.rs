// OpenAI Assistants API client implementation

use crate::config::AssistantConfig;
use crate::error::{AssistantError, Result};
use crate::traits::{AssistantApi, FileStore};
use crate::types::{
    FileObject, LocalFile, MessageRequest, Run, RunRequest, Thread, ThreadMessage,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

const BETA_HEADER: &str = "openai-beta";
const ATTACH_PLACEHOLDER: &str = "Analyzing attached files...";
const UPLOAD_PURPOSE: &str = "assistants";

/// Assistants API client (HTTP direct, no SDK)
#[derive(Debug, Clone)]
pub struct OpenAIAssistantClient {
    http_client: reqwest::Client,
    base_url: String,
    assistant_id: String,
}

impl OpenAIAssistantClient {
    /// Create a client from explicit configuration
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| AssistantError::InvalidConfig("Invalid API key format".into()))?;
        // hidden from Debug output
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            HeaderName::from_static(BETA_HEADER),
            HeaderValue::from_str(&config.api_version)
                .map_err(|_| AssistantError::InvalidConfig("Invalid API version".into()))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            assistant_id: config.assistant_id.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send_message(
        &self,
        thread_id: &str,
        request: &MessageRequest,
        fallback: &str,
    ) -> Result<ThreadMessage> {
        let response = self
            .http_client
            .post(self.url(&format!("threads/{}/messages", thread_id)))
            .json(request)
            .send()
            .await?;

        let response = check_response(response, fallback).await?;
        Ok(response.json().await?)
    }
}

/// Turn a non-success response into a service error carrying the
/// server-provided message, or `fallback` when none can be extracted
async fn check_response(response: Response, fallback: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body).unwrap_or_else(|| fallback.to_string());
    debug!(status = status.as_u16(), %message, "assistant API request failed");

    Err(AssistantError::Service {
        status: status.as_u16(),
        message,
    })
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
        .filter(|m| !m.is_empty())
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

#[async_trait]
impl AssistantApi for OpenAIAssistantClient {
    async fn create_thread(&self) -> Result<Thread> {
        let response = self
            .http_client
            .post(self.url("threads"))
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let thread: Thread = check_response(response, "Failed to create thread")
            .await?
            .json()
            .await?;

        info!(thread_id = %thread.id, "created thread");
        Ok(thread)
    }

    async fn attach_files(
        &self,
        thread_id: &str,
        file_ids: &[String],
    ) -> Result<Option<ThreadMessage>> {
        if file_ids.is_empty() {
            return Ok(None);
        }

        let request = MessageRequest::user(ATTACH_PLACEHOLDER).with_files(file_ids.iter().cloned());
        let message = self
            .send_message(thread_id, &request, "Failed to attach files")
            .await?;

        debug!(thread_id, files = file_ids.len(), "attached files to thread");
        Ok(Some(message))
    }

    async fn post_message(
        &self,
        thread_id: &str,
        request: MessageRequest,
    ) -> Result<ThreadMessage> {
        self.send_message(thread_id, &request, "Failed to add message")
            .await
    }

    async fn create_run(&self, thread_id: &str, instructions: Option<&str>) -> Result<Run> {
        let payload = RunRequest {
            assistant_id: self.assistant_id.clone(),
            instructions: instructions.map(str::to_string),
        };

        let response = self
            .http_client
            .post(self.url(&format!("threads/{}/runs", thread_id)))
            .json(&payload)
            .send()
            .await?;

        let run: Run = check_response(response, "Failed to run assistant")
            .await?
            .json()
            .await?;

        info!(thread_id, run_id = %run.id, status = %run.status, "started run");
        Ok(run)
    }

    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let response = self
            .http_client
            .get(self.url(&format!("threads/{}/runs/{}", thread_id, run_id)))
            .send()
            .await?;

        let run: Run = check_response(response, "Failed to check run status")
            .await?
            .json()
            .await?;

        debug!(run_id, status = %run.status, "run status");
        Ok(run)
    }

    async fn latest_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let response = self
            .http_client
            .get(self.url(&format!("threads/{}/messages", thread_id)))
            .query(&[("order", "desc"), ("limit", "1")])
            .send()
            .await?;

        let body: Value = check_response(response, "Failed to get messages")
            .await?
            .json()
            .await?;

        let data = match body.get("data") {
            Some(data @ Value::Array(_)) => data.clone(),
            _ => {
                return Err(AssistantError::InvalidResponse(
                    "Invalid response format from messages endpoint".into(),
                ))
            }
        };

        serde_json::from_value(data)
            .map_err(|e| AssistantError::InvalidResponse(format!("Malformed message list: {}", e)))
    }
}

#[async_trait]
impl FileStore for OpenAIAssistantClient {
    async fn upload_file(&self, file: &LocalFile) -> Result<FileObject> {
        let bytes = file.read().await?;
        let mime = mime_guess::from_path(file.name()).first_or_octet_stream();

        let part = Part::bytes(bytes)
            .file_name(file.name().to_string())
            .mime_str(mime.essence_str())?;
        let form = Form::new()
            .text("purpose", UPLOAD_PURPOSE)
            .part("file", part);

        // Content-Type with boundary is set by reqwest
        let response = self
            .http_client
            .post(self.url("files"))
            .multipart(form)
            .send()
            .await?;

        let object: UploadResponse = check_response(response, "File upload failed")
            .await?
            .json()
            .await?;

        Ok(object.into())
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    bytes: u64,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    filename: String,
    #[serde(default)]
    purpose: String,
}

impl From<UploadResponse> for FileObject {
    fn from(raw: UploadResponse) -> Self {
        FileObject {
            id: raw.id.unwrap_or_default(),
            bytes: raw.bytes,
            created_at: raw.created_at,
            filename: raw.filename,
            purpose: raw.purpose,
        }
    }
}
