use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chat_core::{Sender, StoredMessage};
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Conversation persistence, one ordered log per user.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Append a turn to the user's conversation and return it as stored.
    async fn save_message(
        &self,
        user_id: &str,
        content: &str,
        sender: Sender,
    ) -> Result<StoredMessage, StoreError>;

    /// All turns for the user, oldest first.
    async fn fetch_messages(&self, user_id: &str) -> Result<Vec<StoredMessage>, StoreError>;
}

fn require_user_id(user_id: &str) -> Result<(), StoreError> {
    if user_id.trim().is_empty() {
        return Err(StoreError::MissingUserId);
    }
    Ok(())
}

/// Process-local store, mainly for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatStore {
    conversations: Arc<RwLock<HashMap<String, Vec<StoredMessage>>>>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn save_message(
        &self,
        user_id: &str,
        content: &str,
        sender: Sender,
    ) -> Result<StoredMessage, StoreError> {
        require_user_id(user_id)?;

        let message = StoredMessage::new(user_id, content, sender);
        self.conversations
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn fetch_messages(&self, user_id: &str) -> Result<Vec<StoredMessage>, StoreError> {
        require_user_id(user_id)?;

        let conversations = self.conversations.read().await;
        Ok(conversations.get(user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keeps_insertion_order_per_user() {
        let store = InMemoryChatStore::new();
        store.save_message("u1", "first", Sender::User).await.unwrap();
        store.save_message("u2", "other", Sender::User).await.unwrap();
        store.save_message("u1", "second", Sender::Assistant).await.unwrap();

        let messages = store.fetch_messages("u1").await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();

        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(messages[1].sender, Sender::Assistant);
        assert!(messages.iter().all(|m| m.user_id == "u1"));
    }

    #[tokio::test]
    async fn unknown_user_has_empty_history() {
        let store = InMemoryChatStore::new();
        assert!(store.fetch_messages("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_user_id_is_rejected() {
        let store = InMemoryChatStore::new();
        assert!(matches!(
            store.save_message(" ", "hi", Sender::User).await,
            Err(StoreError::MissingUserId)
        ));
        assert!(matches!(
            store.fetch_messages("").await,
            Err(StoreError::MissingUserId)
        ));
    }
}
