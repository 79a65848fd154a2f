//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Single-shot text generation against an LLM
//! - `IdeaEnhancer` - The AI enhancement step (prompt, call, parse)
//! - `IdeaNotifier` - Best-effort delivery of results by email
//! - `RateLimiter` - Fixed-window request counting

mod ai_provider;
mod idea_enhancer;
mod idea_notifier;
mod rate_limiter;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use idea_enhancer::IdeaEnhancer;
pub use idea_notifier::IdeaNotifier;
pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};
