//! The chat send flow.
//!
//! Stores the user turn, builds a bounded prompt from prior history, asks
//! the model for a reply and stores that too.

use std::sync::Arc;

use chat_core::{format_reply_html, HistoryEntry, Sender, StoredMessage};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ChatConfig;
use crate::error::{ChatError, LlmError, Result};
use crate::model::ChatModel;
use crate::prompt::PromptAssembler;
use crate::store::ChatStore;

static GREETING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(hi|hello|hey)\s*$").expect("greeting pattern is valid"));

/// The person sending messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    pub id: String,
    pub display_name: Option<String>,
}

impl ChatUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// One completed exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub user_message: StoredMessage,
    pub reply: StoredMessage,
    /// Reply rendered for display
    pub reply_html: String,
    /// Whether the reply came from the model (false for greetings and fallbacks)
    pub from_model: bool,
}

pub struct ChatService<M: ?Sized, S: ?Sized> {
    config: ChatConfig,
    assembler: PromptAssembler,
    model: Arc<M>,
    store: Arc<S>,
}

impl<M, S> ChatService<M, S>
where
    M: ChatModel + ?Sized,
    S: ChatStore + ?Sized,
{
    pub fn new(config: ChatConfig, model: Arc<M>, store: Arc<S>) -> Self {
        let assembler =
            PromptAssembler::new(config.system_prompt.clone(), config.history_token_budget);
        Self {
            config,
            assembler,
            model,
            store,
        }
    }

    /// Replace the prompt assembler, e.g. to use a different estimator.
    pub fn with_assembler(mut self, assembler: PromptAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Stored conversation for `user`, oldest first.
    pub async fn load_history(&self, user: &ChatUser) -> Result<Vec<StoredMessage>> {
        Ok(self.store.fetch_messages(&user.id).await?)
    }

    /// Send `text` as `user` and return the stored exchange.
    pub async fn send_message(&self, user: &ChatUser, text: &str) -> Result<ChatTurn> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        if GREETING.is_match(text) {
            return self.reply_to_greeting(user, text).await;
        }

        self.config.llm.validate()?;

        let history: Vec<HistoryEntry> = self
            .store
            .fetch_messages(&user.id)
            .await?
            .iter()
            .map(HistoryEntry::from)
            .collect();

        let user_message = self.store.save_message(&user.id, text, Sender::User).await?;
        let prompt = self.assembler.assemble(&history, text)?;

        tracing::debug!(
            "Sending prompt for user {} ({} history turns, model {})",
            user.id,
            prompt.history.included,
            self.config.llm.model_id
        );

        let (reply_text, from_model) = match self.generate(&prompt.text).await {
            Ok(reply) => (reply, true),
            Err(e) => match &self.config.fallback_reply {
                Some(fallback) => {
                    tracing::warn!("Model call failed, using fallback reply: {}", e);
                    (fallback.clone(), false)
                }
                None => return Err(e),
            },
        };

        let reply = self
            .store
            .save_message(&user.id, &reply_text, Sender::Assistant)
            .await?;

        Ok(self.turn(user_message, reply, from_model))
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let reply = self.model.generate(prompt, &self.config.llm).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(LlmError::EmptyResponse.into());
        }
        Ok(reply.to_string())
    }

    async fn reply_to_greeting(&self, user: &ChatUser, text: &str) -> Result<ChatTurn> {
        let name = user
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.config.greeting_fallback_name.as_str());

        let user_message = self.store.save_message(&user.id, text, Sender::User).await?;
        let reply = self
            .store
            .save_message(&user.id, &format!("Hello {name}!!"), Sender::Assistant)
            .await?;

        Ok(self.turn(user_message, reply, false))
    }

    fn turn(&self, user_message: StoredMessage, reply: StoredMessage, from_model: bool) -> ChatTurn {
        let reply_html = format_reply_html(&reply.content, self.config.persona_name.as_deref());
        ChatTurn {
            user_message,
            reply,
            reply_html,
            from_model,
        }
    }
}
