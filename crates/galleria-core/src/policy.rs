//! Caller-facing limits on generation requests.
//!
//! The orchestrator only insists on a non-empty prompt. Boundaries that take
//! prompts from end users (the HTTP layer, a CLI, …) apply the stricter
//! length window defined here.
use crate::error::ValidationError;

pub const MIN_PROMPT_CHARS: usize = 5;
pub const MAX_PROMPT_CHARS: usize = 75;

/// Accepted prompt length, counted in characters rather than bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptPolicy {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for PromptPolicy {
    fn default() -> Self {
        Self {
            min_chars: MIN_PROMPT_CHARS,
            max_chars: MAX_PROMPT_CHARS,
        }
    }
}

impl PromptPolicy {
    pub fn check(&self, prompt: &str) -> Result<(), ValidationError> {
        if prompt.trim().is_empty() {
            return Err(ValidationError::MissingPrompt);
        }

        let len = prompt.chars().count();
        if len < self.min_chars || len > self.max_chars {
            return Err(ValidationError::PromptLength {
                len,
                min: self.min_chars,
                max: self.max_chars,
            });
        }
        Ok(())
    }
}
