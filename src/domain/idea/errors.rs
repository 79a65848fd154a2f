//! Error taxonomy for the idea enhancement flow.

use thiserror::Error;

/// Default message when the model rejects an idea without explaining why.
pub const DEFAULT_REJECTION_MESSAGE: &str = "Your input doesn't appear to be a valid website idea. Please describe what kind of website you want to build.";

/// User-facing message for upstream quota exhaustion.
pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please try again later.";

/// User-facing message for every other enhancement failure.
pub const PROCESSING_FAILED_MESSAGE: &str = "Failed to process your idea. Please try again.";

/// A malformed or insufficient submission, detected before any AI call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Idea is required")]
    IdeaMissing,

    #[error("Please provide a more detailed idea (at least {min} characters)")]
    IdeaTooShort { min: usize },

    #[error("Email address is required when sendEmail is true")]
    RecipientRequired,

    #[error("Please provide a valid email address")]
    InvalidRecipient,
}

/// Failures of the AI enhancement step.
///
/// The wrapped string is always safe to show to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnhancementError {
    /// The model judged the input not to be a coherent website/app idea.
    #[error("{0}")]
    Validation(String),

    /// The AI provider's quota is exhausted.
    #[error("{0}")]
    RateLimited(String),

    /// Any other upstream or parsing failure.
    #[error("{0}")]
    Processing(String),
}

impl EnhancementError {
    /// Creates a content rejection with the given explanation.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates the standard upstream rate-limit error.
    pub fn rate_limited() -> Self {
        Self::RateLimited(RATE_LIMITED_MESSAGE.to_string())
    }

    /// Creates the standard processing failure.
    pub fn processing() -> Self {
        Self::Processing(PROCESSING_FAILED_MESSAGE.to_string())
    }

    /// The user-facing message.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::RateLimited(m) | Self::Processing(m) => m,
        }
    }
}

/// Failures of the email notification step. Never surfaced to callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    Delivery(String),
}

impl NotificationError {
    /// Creates a delivery error.
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_errors_display_client_messages() {
        assert_eq!(SubmissionError::IdeaMissing.to_string(), "Idea is required");
        assert_eq!(
            SubmissionError::IdeaTooShort { min: 10 }.to_string(),
            "Please provide a more detailed idea (at least 10 characters)"
        );
        assert_eq!(
            SubmissionError::RecipientRequired.to_string(),
            "Email address is required when sendEmail is true"
        );
        assert_eq!(
            SubmissionError::InvalidRecipient.to_string(),
            "Please provide a valid email address"
        );
    }

    #[test]
    fn enhancement_error_displays_its_message() {
        let err = EnhancementError::validation("Describe a website please");
        assert_eq!(err.to_string(), "Describe a website please");
        assert_eq!(err.message(), "Describe a website please");
    }

    #[test]
    fn standard_enhancement_errors_use_fixed_messages() {
        assert_eq!(EnhancementError::rate_limited().message(), RATE_LIMITED_MESSAGE);
        assert_eq!(EnhancementError::processing().message(), PROCESSING_FAILED_MESSAGE);
        assert!(RATE_LIMITED_MESSAGE.contains("try again later"));
    }

    #[test]
    fn notification_error_displays_correctly() {
        assert_eq!(
            NotificationError::NotConfigured.to_string(),
            "Email service not configured"
        );
        assert_eq!(
            NotificationError::delivery("connection refused").to_string(),
            "Failed to send email: connection refused"
        );
    }
}
