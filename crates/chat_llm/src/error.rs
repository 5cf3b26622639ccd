use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing API key. Set `llm.apiKey` in the config file or LLM_API_KEY")]
    MissingApiKey,

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("User id is required")]
    MissingUserId,

    #[error("Storage error: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Message is required")]
    EmptyMessage,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ChatError>;
