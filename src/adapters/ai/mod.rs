//! AI Adapters.
//!
//! ## Available Adapters
//!
//! - `GeminiProvider` - Google Gemini models via `generateContent`
//! - `MockAIProvider` - Configurable mock for testing
//! - `AiIdeaEnhancer` - IdeaEnhancer built on any AIProvider

mod ai_idea_enhancer;
mod gemini_provider;
mod mock_provider;

pub use ai_idea_enhancer::AiIdeaEnhancer;
pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
