//! Token budget management for conversation history.
//!
//! Bounds how much prior conversation goes into an outbound prompt.
//!
//! # Key Components
//!
//! - [`estimator`]: word-based token estimation
//! - [`window`]: newest-first history windowing within a token budget

pub mod estimator;
pub mod window;

pub use estimator::{estimate_tokens, SharedTokenEstimator, TokenEstimator, WordTokenEstimator};
pub use window::{window_history, window_history_with, FormattedHistory, HistoryWindower};
