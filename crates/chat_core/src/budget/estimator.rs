//! Token estimation for budget management.
//!
//! Approximates model tokens by counting words and adding a fixed sub-word
//! overhead, so no tokenizer vocabulary is needed.

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Whitespace and ASCII punctuation act as word separators, never as tokens.
static WORD_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\s,.!?;:'"()\[\]{}|\\/<>]+"#).expect("separator pattern is valid"));

/// Default sub-word overhead (30% on top of the word count).
pub const DEFAULT_OVERHEAD: f64 = 1.3;

/// Trait for token estimation implementations.
pub trait TokenEstimator: Send + Sync {
    /// Estimate tokens in a plain text string.
    fn count_text(&self, text: &str) -> u32;
}

/// Word-count based estimator: `ceil(words * overhead)`.
#[derive(Debug, Clone)]
pub struct WordTokenEstimator {
    overhead: f64,
}

impl WordTokenEstimator {
    pub fn new() -> Self {
        Self {
            overhead: DEFAULT_OVERHEAD,
        }
    }

    /// Use a different overhead multiplier. Values below 1.0 are clamped to 1.0.
    pub fn with_overhead(overhead: f64) -> Self {
        Self {
            overhead: if overhead.is_finite() { overhead.max(1.0) } else { DEFAULT_OVERHEAD },
        }
    }

    /// Number of non-empty fragments left after splitting on separators.
    ///
    /// Only ASCII punctuation splits words; scripts without spaces count a
    /// whole run as one word.
    pub fn word_count(text: &str) -> usize {
        WORD_SEPARATORS
            .split(text.trim())
            .filter(|fragment| !fragment.is_empty())
            .count()
    }
}

impl Default for WordTokenEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenEstimator for WordTokenEstimator {
    fn count_text(&self, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }

        let words = Self::word_count(text) as f64;
        let tokens = (words * self.overhead).ceil();

        if tokens >= u32::MAX as f64 {
            u32::MAX
        } else {
            tokens as u32
        }
    }
}

/// Estimate tokens with the default estimator. `None` counts as zero.
pub fn estimate_tokens(text: Option<&str>) -> u32 {
    text.map_or(0, |t| WordTokenEstimator::default().count_text(t))
}

/// Arc-wrapped estimator for easy sharing.
pub type SharedTokenEstimator = Arc<dyn TokenEstimator>;
