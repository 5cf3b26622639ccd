//! chat_llm - Chat send flow around an LLM collaborator
//!
//! - `config` - LlmConfig and ChatConfig, file and environment loading
//! - `prompt` - prompt assembly over a windowed history
//! - `model` / `store` - the model and persistence collaborator traits
//! - `service` - ChatService, the send flow tying them together

pub mod config;
pub mod error;
pub mod model;
pub mod prompt;
pub mod service;
pub mod store;

pub use chat_core::{FormattedHistory, HistoryEntry, Message, Sender, StoredMessage};
pub use config::{ChatConfig, LlmConfig};
pub use error::{ChatError, ConfigError, LlmError, StoreError};
pub use model::ChatModel;
pub use prompt::{AssembledPrompt, PromptAssembler};
pub use service::{ChatService, ChatTurn, ChatUser};
pub use store::{ChatStore, InMemoryChatStore};
