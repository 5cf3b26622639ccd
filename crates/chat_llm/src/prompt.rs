//! Prompt assembly.
//!
//! One component builds every outbound prompt: the externally supplied
//! system prompt, the windowed prior conversation and the new user turn.

use chat_core::{FormattedHistory, HistoryEntry, HistoryWindower, SharedTokenEstimator};

use crate::error::ChatError;

const HISTORY_HEADER: &str = "Previous conversation:";

/// A prompt ready for the model, plus the history window it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub text: String,
    pub history: FormattedHistory,
}

#[derive(Debug, Clone)]
pub struct PromptAssembler {
    system_prompt: String,
    history_budget: u32,
    windower: HistoryWindower,
}

impl PromptAssembler {
    pub fn new(system_prompt: impl Into<String>, history_budget: u32) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            history_budget,
            windower: HistoryWindower::default(),
        }
    }

    /// Use a different token estimator for the history window.
    pub fn with_estimator(mut self, estimator: SharedTokenEstimator) -> Self {
        self.windower = HistoryWindower::new(estimator);
        self
    }

    pub fn history_budget(&self) -> u32 {
        self.history_budget
    }

    /// Build the prompt for `message` on top of prior `history`.
    ///
    /// `history` must not already contain `message`.
    pub fn assemble(
        &self,
        history: &[HistoryEntry],
        message: &str,
    ) -> Result<AssembledPrompt, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let window = self.windower.window(history, self.history_budget);
        if window.truncated {
            tracing::debug!(
                "Prompt history truncated to {} turns ({} tokens left)",
                window.included,
                window.remaining_budget
            );
        }

        let mut sections: Vec<String> = Vec::with_capacity(2);
        let system_prompt = self.system_prompt.trim();
        if !system_prompt.is_empty() {
            sections.push(system_prompt.to_string());
        }
        if !window.text.is_empty() {
            sections.push(format!("{HISTORY_HEADER}\n{}", window.text));
        }

        let mut text = sections.join("\n\n");
        if !text.is_empty() {
            text.push_str("\n\n");
        }
        text.push_str(&format!("User: {message}\nAssistant:"));

        Ok(AssembledPrompt {
            text,
            history: window,
        })
    }
}
