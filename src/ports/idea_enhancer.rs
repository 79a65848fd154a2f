//! Idea Enhancer Port - turns raw idea text into an [`EnhancedIdea`].

use async_trait::async_trait;

use crate::domain::idea::{EnhancedIdea, EnhancementError};

/// Port for the AI enhancement step.
///
/// Implementations must map every failure into [`EnhancementError`]; callers
/// never see provider-specific errors.
#[async_trait]
pub trait IdeaEnhancer: Send + Sync {
    /// Validate and expand `idea` into a structured plan.
    async fn enhance(&self, idea: &str) -> Result<EnhancedIdea, EnhancementError>;
}
