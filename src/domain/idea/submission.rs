//! IdeaSubmission - the validated shape of an inbound idea request.

use once_cell::sync::Lazy;
use regex::Regex;

use super::errors::SubmissionError;

/// Minimum idea length, in characters, after trimming.
pub const MIN_IDEA_LENGTH: usize = 10;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// An idea submitted for enhancement.
///
/// Only constructible through [`IdeaSubmission::new`], so a value of this type
/// always holds a trimmed idea of at least [`MIN_IDEA_LENGTH`] characters and,
/// when present, a recipient with a basic `local@domain.tld` shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaSubmission {
    idea: String,
    send_email: bool,
    recipient: Option<String>,
}

impl IdeaSubmission {
    /// Validates raw request fields.
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// 1. idea present and non-blank
    /// 2. idea at least [`MIN_IDEA_LENGTH`] characters
    /// 3. recipient present when `send_email` is set
    /// 4. recipient (if any) well-formed
    ///
    /// A blank recipient is treated as absent.
    pub fn new(
        idea: Option<&str>,
        send_email: bool,
        recipient: Option<&str>,
    ) -> Result<Self, SubmissionError> {
        let idea = idea.map(str::trim).unwrap_or_default();
        if idea.is_empty() {
            return Err(SubmissionError::IdeaMissing);
        }

        if idea.chars().count() < MIN_IDEA_LENGTH {
            return Err(SubmissionError::IdeaTooShort {
                min: MIN_IDEA_LENGTH,
            });
        }

        let recipient = recipient.map(str::trim).filter(|r| !r.is_empty());

        if send_email && recipient.is_none() {
            return Err(SubmissionError::RecipientRequired);
        }

        if let Some(address) = recipient {
            if !is_valid_email(address) {
                return Err(SubmissionError::InvalidRecipient);
            }
        }

        Ok(Self {
            idea: idea.to_string(),
            send_email,
            recipient: recipient.map(str::to_string),
        })
    }

    /// The trimmed idea text.
    pub fn idea(&self) -> &str {
        &self.idea
    }

    /// Whether the caller asked for the result by email.
    pub fn send_email(&self) -> bool {
        self.send_email
    }

    /// The recipient address, if one was supplied.
    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    /// The address to deliver to, if delivery was requested.
    pub fn delivery_target(&self) -> Option<&str> {
        if self.send_email {
            self.recipient()
        } else {
            None
        }
    }
}

/// Returns true if `address` has a basic `local@domain.tld` shape.
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_PATTERN.is_match(address)
}
