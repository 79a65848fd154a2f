//! EnhancedIdea and EnhancementResult value objects.

use serde::{Deserialize, Serialize};

/// Structured expansion of an idea.
///
/// Produced by an [`IdeaEnhancer`](crate::ports::IdeaEnhancer); read-only
/// once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedIdea {
    problem_statement: String,
    target_audience: String,
    core_features: Vec<String>,
    technical_suggestions: Vec<String>,
    next_steps: Vec<String>,
}

impl EnhancedIdea {
    /// Creates a new enhanced idea.
    pub fn new(
        problem_statement: impl Into<String>,
        target_audience: impl Into<String>,
        core_features: Vec<String>,
        technical_suggestions: Vec<String>,
        next_steps: Vec<String>,
    ) -> Self {
        Self {
            problem_statement: problem_statement.into(),
            target_audience: target_audience.into(),
            core_features,
            technical_suggestions,
            next_steps,
        }
    }

    pub fn problem_statement(&self) -> &str {
        &self.problem_statement
    }

    pub fn target_audience(&self) -> &str {
        &self.target_audience
    }

    pub fn core_features(&self) -> &[String] {
        &self.core_features
    }

    pub fn technical_suggestions(&self) -> &[String] {
        &self.technical_suggestions
    }

    pub fn next_steps(&self) -> &[String] {
        &self.next_steps
    }

    /// Returns true if the model gave us nothing usable in any field.
    pub fn is_empty(&self) -> bool {
        self.problem_statement.is_empty()
            && self.target_audience.is_empty()
            && self.core_features.is_empty()
            && self.technical_suggestions.is_empty()
            && self.next_steps.is_empty()
    }
}

/// Response payload for one enhancement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementResult {
    /// The idea text as submitted (trimmed).
    pub original: String,
    /// The structured expansion.
    pub enhanced: EnhancedIdea,
    /// True only when the email was confirmed sent.
    pub email_sent: bool,
}

impl EnhancementResult {
    /// Creates a new result.
    pub fn new(original: impl Into<String>, enhanced: EnhancedIdea, email_sent: bool) -> Self {
        Self {
            original: original.into(),
            enhanced,
            email_sent,
        }
    }
}
