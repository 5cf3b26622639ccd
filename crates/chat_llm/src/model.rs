use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::error::LlmError;

/// The hosted model, seen from the chat service.
///
/// Implementations own transport, authentication and retries. They receive
/// the fully assembled prompt and return the raw reply text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a reply.
    ///
    /// # Arguments
    /// * `prompt` - System preamble, windowed history and the new user turn
    /// * `config` - Model id, endpoint, key and output limit for this call
    async fn generate(&self, prompt: &str, config: &LlmConfig) -> Result<String, LlmError>;
}
