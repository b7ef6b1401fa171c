//! Mock provider implementation for testing and keyless local runs.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// What the mock does when called.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Reply with this text.
    Reply(String),
    /// Fail with an API error carrying this message.
    Fail(String),
    /// Behave as if no credential was configured.
    Unconfigured,
    /// Sleep before replying; used to exercise timeouts.
    Delay(Duration, String),
}

/// Mock text provider that records how often, and with what, it was called.
pub struct MockTextProvider {
    behavior: MockBehavior,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockTextProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Mock that always answers with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Reply(text.into()))
    }

    /// Number of `generate` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt passed to the most recent `generate` call.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }

    fn response(text: &str, prompt: &str) -> ProviderResponse {
        ProviderResponse {
            text: Some(text.to_string()),
            input_tokens: prompt.len() as i32 / 4,
            output_tokens: text.len() as i32 / 4,
            finish_reason: FinishReason::Complete,
        }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        _system_instruction: &str,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        match &self.behavior {
            MockBehavior::Reply(text) => Ok(Self::response(text, prompt)),
            MockBehavior::Fail(message) => Err(ProviderError::ApiError(message.clone())),
            MockBehavior::Unconfigured => Err(ProviderError::NotConfigured(
                "Mock text provider not configured".to_string(),
            )),
            MockBehavior::Delay(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(Self::response(text, prompt))
            }
        }
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Unconfigured => Err(ProviderError::NotConfigured(
                "Mock text provider not configured".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
