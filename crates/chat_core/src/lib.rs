//! chat_core - Core types for the chat companion
//!
//! This crate provides the pieces that are independent of any UI, network or
//! storage layer:
//! - `message` - Sender, Message, HistoryEntry and StoredMessage
//! - `budget` - token estimation and bounded-context history windowing
//! - `formatting` - reply post-processing for display

pub mod budget;
pub mod formatting;
pub mod message;

// Re-export commonly used types
pub use budget::{
    estimate_tokens, window_history, window_history_with, FormattedHistory, HistoryWindower,
    SharedTokenEstimator, TokenEstimator, WordTokenEstimator,
};
pub use formatting::{format_reply_html, strip_persona_label};
pub use message::{HistoryEntry, Message, Sender, StoredMessage};
