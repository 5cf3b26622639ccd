//! History windowing for budget management.
//!
//! Selects the longest trailing run of conversation turns whose estimated
//! cost fits a token budget and renders it as `"Label: content"` lines.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::budget::estimator::{SharedTokenEstimator, TokenEstimator, WordTokenEstimator};
use crate::message::HistoryEntry;

/// Result of windowing a conversation history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedHistory {
    /// Accepted turns, oldest first, joined by `\n`
    pub text: String,
    /// Budget left after the accepted turns
    pub remaining_budget: u32,
    /// Number of turns included in `text`
    pub included: usize,
    /// Whether the scan stopped because a turn did not fit
    pub truncated: bool,
}

impl FormattedHistory {
    /// Result carrying no history and the full budget.
    pub fn empty(max_tokens: u32) -> Self {
        Self {
            text: String::new(),
            remaining_budget: max_tokens,
            included: 0,
            truncated: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Window `history` into `max_tokens` using the default word estimator.
pub fn window_history(history: &[HistoryEntry], max_tokens: u32) -> FormattedHistory {
    window_history_with(history, max_tokens, &WordTokenEstimator::default())
}

/// Window `history` into `max_tokens` using `estimator`.
///
/// Never fails: malformed entries are skipped, and a panic raised while
/// formatting or estimating collapses to [`FormattedHistory::empty`].
pub fn window_history_with(
    history: &[HistoryEntry],
    max_tokens: u32,
    estimator: &dyn TokenEstimator,
) -> FormattedHistory {
    if history.is_empty() || max_tokens == 0 {
        return FormattedHistory::empty(max_tokens);
    }

    match panic::catch_unwind(AssertUnwindSafe(|| select_recent(history, max_tokens, estimator))) {
        Ok(formatted) => formatted,
        Err(_) => {
            tracing::error!(
                "History windowing failed for {} entries, continuing without history",
                history.len()
            );
            FormattedHistory::empty(max_tokens)
        }
    }
}

/// Newest-first greedy selection. The first turn that does not fit ends the
/// scan, so the accepted turns are always a contiguous suffix.
fn select_recent(
    history: &[HistoryEntry],
    max_tokens: u32,
    estimator: &dyn TokenEstimator,
) -> FormattedHistory {
    let mut selected: Vec<String> = Vec::new();
    let mut used: u32 = 0;
    let mut truncated = false;

    for (index, entry) in history.iter().enumerate().rev() {
        let Some(message) = entry.as_message() else {
            tracing::trace!("Skipping malformed history entry at index {}", index);
            continue;
        };

        let line = message.to_history_line();
        let cost = estimator.count_text(&line);

        match used.checked_add(cost) {
            Some(total) if total <= max_tokens => {
                used = total;
                selected.push(line);
            }
            _ => {
                tracing::debug!(
                    "History entry {index} ({cost} tokens) exceeds remaining budget ({remaining} tokens), stopping",
                    remaining = max_tokens - used
                );
                truncated = true;
                break;
            }
        }
    }

    // Restore chronological order
    selected.reverse();

    FormattedHistory {
        included: selected.len(),
        text: selected.join("\n"),
        remaining_budget: max_tokens - used,
        truncated,
    }
}

/// Holds an estimator for callers that window repeatedly.
#[derive(Clone)]
pub struct HistoryWindower {
    estimator: SharedTokenEstimator,
}

impl HistoryWindower {
    pub fn new(estimator: SharedTokenEstimator) -> Self {
        Self { estimator }
    }

    pub fn window(&self, history: &[HistoryEntry], max_tokens: u32) -> FormattedHistory {
        window_history_with(history, max_tokens, self.estimator.as_ref())
    }

    pub fn estimator(&self) -> &dyn TokenEstimator {
        self.estimator.as_ref()
    }
}

impl Default for HistoryWindower {
    fn default() -> Self {
        Self::new(Arc::new(WordTokenEstimator::default()))
    }
}

impl std::fmt::Debug for HistoryWindower {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryWindower").finish_non_exhaustive()
    }
}
