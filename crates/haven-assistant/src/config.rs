// Explicit configuration for the assistant client.
// Built once at startup and handed to every constructor that needs it.

use crate::error::{AssistantError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_API_VERSION: &str = "assistants=v2";

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ASSISTANT_ID_VAR: &str = "OPENAI_ASSISTANT_ID";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const API_VERSION_VAR: &str = "OPENAI_BETA_VERSION";

/// Credentials and endpoint for the assistant service
#[derive(Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub api_key: String,
    pub assistant_id: String,
    /// Base URL for the API (defaults to https://api.openai.com/v1)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value sent in the `OpenAI-Beta` header
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl AssistantConfig {
    /// Create config from explicit values.
    ///
    /// Blank values are treated as missing.
    pub fn new(api_key: impl Into<String>, assistant_id: impl Into<String>) -> Result<Self> {
        let api_key = required(API_KEY_VAR, Some(api_key.into()))?;
        let assistant_id = required(ASSISTANT_ID_VAR, Some(assistant_id.into()))?;

        Ok(Self {
            api_key,
            assistant_id,
            base_url: default_base_url(),
            api_version: default_api_version(),
        })
    }

    /// Load from `OPENAI_API_KEY` / `OPENAI_ASSISTANT_ID`, with optional
    /// `OPENAI_BASE_URL` and `OPENAI_BETA_VERSION` overrides
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            required(API_KEY_VAR, lookup(API_KEY_VAR))?,
            required(ASSISTANT_ID_VAR, lookup(ASSISTANT_ID_VAR))?,
        )?;

        if let Some(base_url) = optional(lookup(BASE_URL_VAR)) {
            config = config.with_base_url(base_url);
        }
        if let Some(version) = optional(lookup(API_VERSION_VAR)) {
            config = config.with_api_version(version);
        }

        Ok(config)
    }

    /// Names of the required variables absent from the given source
    pub fn missing_vars<F>(lookup: F) -> Vec<&'static str>
    where
        F: Fn(&str) -> Option<String>,
    {
        [API_KEY_VAR, ASSISTANT_ID_VAR]
            .into_iter()
            .filter(|var| optional(lookup(*var)).is_none())
            .collect()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }
}

// Keep the key out of logs
impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &"<redacted>")
            .field("assistant_id", &self.assistant_id)
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(var: &'static str, value: Option<String>) -> Result<String> {
    optional(value).ok_or(AssistantError::MissingConfig { var })
}
