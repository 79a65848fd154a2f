//! Idea Notifier Port - delivers an enhanced idea to the submitter.

use async_trait::async_trait;

use crate::domain::idea::{EnhancedIdea, NotificationError};

/// Port for best-effort delivery of enhancement results.
#[async_trait]
pub trait IdeaNotifier: Send + Sync {
    /// Send `enhanced` (and the `original` text it came from) to `recipient`.
    ///
    /// Fails with [`NotificationError::NotConfigured`] when the notifier was
    /// started without transport credentials.
    async fn deliver(
        &self,
        recipient: &str,
        enhanced: &EnhancedIdea,
        original: &str,
    ) -> Result<(), NotificationError>;

    /// Whether the notifier can send at all.
    fn is_configured(&self) -> bool;
}
