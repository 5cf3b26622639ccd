//! Configuration for the chat service and its model collaborator.
//!
//! Configuration is always passed explicitly. Nothing below the service
//! reads the environment; [`ChatConfig::load`] is the one place that layers
//! files and environment variables, for binaries to call at startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_MODEL_ID: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_HISTORY_TOKEN_BUDGET: u32 = 2000;
pub const DEFAULT_GREETING_NAME: &str = "friend";

const CONFIG_FILE_PATH: &str = "config.toml";

/// Options handed to the model collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_id: default_model_id(),
            endpoint_url: default_endpoint_url(),
            max_output_tokens: None,
        }
    }
}

impl LlmConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Check the options a model call cannot do without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => {}
            _ => return Err(ConfigError::MissingApiKey),
        }
        if self.model_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "modelId",
                reason: "must not be empty".to_string(),
            });
        }
        if self.endpoint_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "endpointUrl",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Service-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    /// Token budget for prior conversation in each prompt
    #[serde(default = "default_history_token_budget")]
    pub history_token_budget: u32,
    /// Preamble placed before the conversation in every prompt
    #[serde(default)]
    pub system_prompt: String,
    /// Name the model may prefix replies with, e.g. `[Name]:`
    #[serde(default)]
    pub persona_name: Option<String>,
    /// Name used in greetings when the user has no display name
    #[serde(default = "default_greeting_name")]
    pub greeting_fallback_name: String,
    /// Reply used when the model call fails. `None` surfaces the error instead.
    #[serde(default)]
    pub fallback_reply: Option<String>,
}

fn default_history_token_budget() -> u32 {
    DEFAULT_HISTORY_TOKEN_BUDGET
}

fn default_greeting_name() -> String {
    DEFAULT_GREETING_NAME.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            history_token_budget: DEFAULT_HISTORY_TOKEN_BUDGET,
            system_prompt: String::new(),
            persona_name: None,
            greeting_fallback_name: default_greeting_name(),
            fallback_reply: None,
        }
    }
}

fn companion_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".companion")
}

fn companion_config_json_path() -> PathBuf {
    companion_dir().join("config.json")
}

impl ChatConfig {
    /// Parse a config file, choosing JSON or TOML by extension.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Layered load: `~/.companion/config.json`, else `./config.toml`, else
    /// defaults; then environment overrides.
    pub fn load() -> Self {
        let mut config = None;

        for path in [companion_config_json_path(), PathBuf::from(CONFIG_FILE_PATH)] {
            if !path.exists() {
                continue;
            }
            match Self::load_from_path(&path) {
                Ok(loaded) => {
                    tracing::debug!("Loaded chat config from {:?}", path);
                    config = Some(loaded);
                    break;
                }
                Err(e) => tracing::warn!("Ignoring unreadable config {:?}: {}", path, e),
            }
        }

        let mut config = config.unwrap_or_default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `LLM_*` / `CHAT_*` overrides from `lookup`.
    ///
    /// Unparseable numeric values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("LLM_API_KEY") {
            self.llm.api_key = Some(api_key);
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model_id = model;
        }
        if let Some(endpoint) = lookup("LLM_ENDPOINT") {
            self.llm.endpoint_url = endpoint;
        }
        if let Some(raw) = lookup("LLM_MAX_OUTPUT_TOKENS") {
            match raw.trim().parse::<u32>() {
                Ok(value) => self.llm.max_output_tokens = Some(value),
                Err(e) => tracing::warn!("Ignoring LLM_MAX_OUTPUT_TOKENS={:?}: {}", raw, e),
            }
        }
        if let Some(raw) = lookup("CHAT_HISTORY_BUDGET") {
            match raw.trim().parse::<u32>() {
                Ok(value) => self.history_token_budget = value,
                Err(e) => tracing::warn!("Ignoring CHAT_HISTORY_BUDGET={:?}: {}", raw, e),
            }
        }
    }
}
