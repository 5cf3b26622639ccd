//! Message module - conversation turn types
//!
//! `Message` is a well-formed turn. `HistoryEntry` is the looser record a
//! persistence layer hands back, where either field may be missing.

mod history;
mod sender;

pub use history::{HistoryEntry, StoredMessage};
pub use sender::Sender;

use serde::{Deserialize, Serialize};

/// One turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
}

impl Message {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            sender,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, content)
    }

    /// Render as a single `"Label: content"` history line.
    pub fn to_history_line(&self) -> String {
        format!("{}: {}", self.sender.label(), self.content)
    }
}

impl From<Message> for HistoryEntry {
    fn from(message: Message) -> Self {
        Self {
            sender: Some(message.sender),
            content: Some(message.content),
        }
    }
}
