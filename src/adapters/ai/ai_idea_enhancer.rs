//! AI Idea Enhancer - IdeaEnhancer implemented on top of an AIProvider.
//!
//! Builds the enhancement prompt, makes exactly one provider call bounded by
//! a timeout, and extracts the structured result. Every provider failure is
//! collapsed into an [`EnhancementError`] carrying a user-safe message.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::idea::{
    build_enhancement_prompt, EnhancedIdea, EnhancementError, ExtractionError, IdeaExtractor,
    SYSTEM_PROMPT,
};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, IdeaEnhancer, MessageRole, RequestMetadata,
};

/// Enhances ideas with a single AI completion.
pub struct AiIdeaEnhancer {
    provider: Arc<dyn AIProvider>,
    extractor: IdeaExtractor,
    timeout: Duration,
    max_tokens: u32,
    temperature: f32,
}

impl AiIdeaEnhancer {
    /// Creates an enhancer with the validity gate on and a 30 second timeout.
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            extractor: IdeaExtractor::default(),
            timeout: Duration::from_secs(30),
            max_tokens: 2048,
            temperature: 0.7,
        }
    }

    /// Sets the upper bound on one provider call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables the content validity gate.
    pub fn with_validity_gate(mut self, enabled: bool) -> Self {
        self.extractor = IdeaExtractor::new(enabled);
        self
    }

    /// Sets the generation limits.
    pub fn with_generation(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    fn build_request(&self, idea: &str, metadata: RequestMetadata) -> CompletionRequest {
        CompletionRequest::new(metadata)
            .with_system_prompt(SYSTEM_PROMPT)
            .with_message(
                MessageRole::User,
                build_enhancement_prompt(idea, self.extractor.validity_gate()),
            )
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
            .with_json_output()
    }
}

#[async_trait]
impl IdeaEnhancer for AiIdeaEnhancer {
    async fn enhance(&self, idea: &str) -> Result<EnhancedIdea, EnhancementError> {
        let metadata = RequestMetadata::generate();
        let trace_id = metadata.trace_id.clone();
        let request = self.build_request(idea, metadata);

        tracing::debug!(
            trace_id = %trace_id,
            provider = %self.provider.provider_info().name,
            idea_chars = idea.chars().count(),
            "Requesting idea enhancement"
        );

        let response = match tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(map_provider_error(&trace_id, err)),
            Err(_) => {
                tracing::error!(
                    trace_id = %trace_id,
                    timeout_secs = self.timeout.as_secs(),
                    "AI provider call timed out"
                );
                return Err(EnhancementError::processing());
            }
        };

        tracing::debug!(
            trace_id = %trace_id,
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "AI provider responded"
        );

        self.extractor
            .extract(&response.content)
            .map_err(|err| match err {
                ExtractionError::Rejected(message) => {
                    tracing::info!(trace_id = %trace_id, "Idea rejected by validity gate");
                    EnhancementError::validation(message)
                }
                other => {
                    tracing::error!(
                        trace_id = %trace_id,
                        "Failed to extract enhanced idea: {}",
                        other
                    );
                    EnhancementError::processing()
                }
            })
    }
}

fn map_provider_error(trace_id: &str, err: AIError) -> EnhancementError {
    if err.is_rate_limited() {
        tracing::warn!(trace_id = %trace_id, "AI provider rate limited: {}", err);
        EnhancementError::rate_limited()
    } else {
        tracing::error!(trace_id = %trace_id, "AI provider call failed: {}", err);
        EnhancementError::processing()
    }
}
