use galleria_core::{policy::PromptPolicy, provider::GenerationProvider};
use galleria_storage::Studio;

/// Shared state handed to every handler.
pub struct AppState<B> {
    pub studio: Studio<B>,
    pub policy: PromptPolicy,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            studio: self.studio.clone(),
            policy: self.policy,
        }
    }
}

impl<B: GenerationProvider> AppState<B> {
    pub fn new(studio: Studio<B>) -> Self {
        Self {
            studio,
            policy: PromptPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PromptPolicy) -> Self {
        self.policy = policy;
        self
    }
}
