//! Persisted and loosely-typed history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{Message, Sender};

/// A history record as handed over by the persistence layer.
///
/// Either field may be absent. Records that cannot be turned into a
/// [`Message`] are dropped by the windower rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(
        default,
        deserialize_with = "deserialize_sender",
        skip_serializing_if = "Option::is_none"
    )]
    pub sender: Option<Sender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A blank sender string counts as a missing sender.
fn deserialize_sender<'de, D>(deserializer: D) -> Result<Option<Sender>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()).map(Sender::from))
}

impl HistoryEntry {
    pub fn new(sender: Option<Sender>, content: Option<String>) -> Self {
        Self { sender, content }
    }

    /// Returns the well-formed message, or `None` when the sender is missing
    /// or the content is missing or empty.
    pub fn as_message(&self) -> Option<Message> {
        let sender = self.sender?;
        let content = self.content.as_deref().filter(|c| !c.is_empty())?;
        Some(Message::new(sender, content))
    }
}

/// A conversation turn as kept by a `ChatStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub sender: Sender,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl StoredMessage {
    pub fn new(user_id: impl Into<String>, content: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            content: content.into(),
            sender,
            created_at: Utc::now(),
        }
    }

    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            sender: Some(self.sender),
            content: Some(self.content.clone()),
        }
    }
}

impl From<&StoredMessage> for HistoryEntry {
    fn from(stored: &StoredMessage) -> Self {
        stored.to_history_entry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_as_none() {
        let entry: HistoryEntry = serde_json::from_str(r#"{"sender":"user"}"#).unwrap();
        assert_eq!(entry.sender, Some(Sender::User));
        assert!(entry.content.is_none());
        assert!(entry.as_message().is_none());

        let entry: HistoryEntry = serde_json::from_str(r#"{"content":"orphan"}"#).unwrap();
        assert!(entry.as_message().is_none());
    }

    #[test]
    fn blank_sender_deserializes_as_none() {
        for raw in [r#"{"sender":"","content":"ghost"}"#, r#"{"sender":"  ","content":"ghost"}"#] {
            let entry: HistoryEntry = serde_json::from_str(raw).unwrap();
            assert!(entry.sender.is_none(), "{raw} should have no sender");
            assert!(entry.as_message().is_none());
        }

        let entry: HistoryEntry = serde_json::from_str(r#"{"sender":null,"content":"x"}"#).unwrap();
        assert!(entry.sender.is_none());
    }

    #[test]
    fn named_senders_still_read_as_assistant() {
        for raw in [r#"{"sender":"assistant","content":"x"}"#, r#"{"sender":"Jarvie","content":"x"}"#] {
            let entry: HistoryEntry = serde_json::from_str(raw).unwrap();
            assert_eq!(entry.sender, Some(Sender::Assistant));
        }
    }

    #[test]
    fn empty_content_is_not_a_message() {
        let entry = HistoryEntry::new(Some(Sender::Assistant), Some(String::new()));
        assert!(entry.as_message().is_none());
    }

    #[test]
    fn stored_message_round_trips_through_camel_case_json() {
        let stored = StoredMessage::new("user-1", "I feel sad", Sender::User);
        let json = serde_json::to_value(&stored).unwrap();

        assert_eq!(json["userId"], "user-1");
        assert_eq!(json["sender"], "user");
        assert!(json.get("createdAt").is_some());
        assert!(!stored.id.is_empty());
    }

    #[test]
    fn stored_message_becomes_history_entry() {
        let stored = StoredMessage::new("user-1", "Hello there!!", Sender::Assistant);
        let entry = HistoryEntry::from(&stored);
        assert_eq!(entry.as_message(), Some(Message::assistant("Hello there!!")));
    }
}
