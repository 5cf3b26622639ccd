use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a conversation turn.
///
/// Stored as `"user"` or `"ai"`. Any stored value other than `"user"` reads
/// back as [`Sender::Assistant`], so older records tagged `"assistant"` or
/// with a persona name still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Stored form of the sender.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "ai",
        }
    }

    /// Prefix used when the turn is rendered into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "User",
            Sender::Assistant => "AI",
        }
    }
}

impl From<String> for Sender {
    fn from(value: String) -> Self {
        if value == "user" {
            Sender::User
        } else {
            Sender::Assistant
        }
    }
}

impl From<Sender> for &'static str {
    fn from(sender: Sender) -> Self {
        sender.as_str()
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
