//! EnhanceIdeaHandler - Command handler for enhancing a submitted idea.
//!
//! Enhancement always runs first and its errors end the request. Email
//! delivery is best-effort and bounded by its own deadline: failures and
//! overruns are logged and reported only as `email_sent: false`.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::idea::{EnhancementError, EnhancementResult, IdeaSubmission};
use crate::ports::{IdeaEnhancer, IdeaNotifier};

/// Handler for enhancing ideas.
pub struct EnhanceIdeaHandler {
    enhancer: Arc<dyn IdeaEnhancer>,
    notifier: Arc<dyn IdeaNotifier>,
    delivery_timeout: Duration,
}

impl EnhanceIdeaHandler {
    pub fn new(enhancer: Arc<dyn IdeaEnhancer>, notifier: Arc<dyn IdeaNotifier>) -> Self {
        Self {
            enhancer,
            notifier,
            delivery_timeout: Duration::from_secs(20),
        }
    }

    /// Caps the time spent delivering the email for a single request.
    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    pub async fn handle(
        &self,
        submission: IdeaSubmission,
    ) -> Result<EnhancementResult, EnhancementError> {
        // 1. Enhance (errors propagate unchanged)
        let enhanced = self.enhancer.enhance(submission.idea()).await?;

        // 2. Deliver if requested; never fails the request
        let email_sent = match submission.delivery_target() {
            Some(recipient) => match tokio::time::timeout(
                self.delivery_timeout,
                self.notifier.deliver(recipient, &enhanced, submission.idea()),
            )
            .await
            {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    tracing::warn!(recipient = %recipient, "Email delivery skipped: {}", e);
                    false
                }
                Err(_) => {
                    tracing::warn!(
                        recipient = %recipient,
                        timeout_ms = self.delivery_timeout.as_millis() as u64,
                        "Email delivery abandoned after deadline"
                    );
                    false
                }
            },
            None => false,
        };

        Ok(EnhancementResult::new(
            submission.idea(),
            enhanced,
            email_sent,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::idea::{EnhancedIdea, NotificationError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ─── Mocks ───────────────────────────────────────────────────────

    struct MockEnhancer {
        result: Result<EnhancedIdea, EnhancementError>,
        calls: Mutex<Vec<String>>,
    }

    impl MockEnhancer {
        fn succeeding() -> Self {
            Self {
                result: Ok(sample()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: EnhancementError) -> Self {
            Self {
                result: Err(error),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl IdeaEnhancer for MockEnhancer {
        async fn enhance(&self, idea: &str) -> Result<EnhancedIdea, EnhancementError> {
            self.calls.lock().unwrap().push(idea.to_string());
            self.result.clone()
        }
    }

    struct MockNotifier {
        result: Result<(), NotificationError>,
        delay: Duration,
        deliveries: Mutex<Vec<(String, String)>>,
    }

    impl MockNotifier {
        fn with_result(result: Result<(), NotificationError>) -> Self {
            Self {
                result,
                delay: Duration::ZERO,
                deliveries: Mutex::new(Vec::new()),
            }
        }

        fn hanging(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::with_result(Ok(()))
            }
        }

        fn delivery_count(&self) -> usize {
            self.deliveries.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl IdeaNotifier for MockNotifier {
        async fn deliver(
            &self,
            recipient: &str,
            _enhanced: &EnhancedIdea,
            original: &str,
        ) -> Result<(), NotificationError> {
            self.deliveries
                .lock()
                .unwrap()
                .push((recipient.to_string(), original.to_string()));
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.result.clone()
        }

        fn is_configured(&self) -> bool {
            !matches!(self.result, Err(NotificationError::NotConfigured))
        }
    }

    fn sample() -> EnhancedIdea {
        EnhancedIdea::new(
            "Gift cards go unused.",
            "Bargain hunters",
            vec!["Listings".to_string()],
            vec!["Rust".to_string()],
            vec!["Ship MVP".to_string()],
        )
    }

    fn submission(send_email: bool, email: Option<&str>) -> IdeaSubmission {
        IdeaSubmission::new(
            Some("  A platform for people to trade unused gift cards  "),
            send_email,
            email,
        )
        .unwrap()
    }

    fn handler(
        enhancer: Arc<MockEnhancer>,
        notifier: Arc<MockNotifier>,
    ) -> EnhanceIdeaHandler {
        EnhanceIdeaHandler::new(enhancer, notifier)
    }

    // ─── Tests ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn returns_result_without_email_when_not_requested() {
        let enhancer = Arc::new(MockEnhancer::succeeding());
        let notifier = Arc::new(MockNotifier::with_result(Ok(())));

        let result = handler(enhancer.clone(), notifier.clone())
            .handle(submission(false, None))
            .await
            .unwrap();

        assert_eq!(result.original, "A platform for people to trade unused gift cards");
        assert_eq!(result.enhanced, sample());
        assert!(!result.email_sent);
        assert_eq!(notifier.delivery_count(), 0);
        assert_eq!(
            enhancer.calls.lock().unwrap().as_slice(),
            ["A platform for people to trade unused gift cards"]
        );
    }

    #[tokio::test]
    async fn recipient_without_send_flag_is_not_emailed() {
        let enhancer = Arc::new(MockEnhancer::succeeding());
        let notifier = Arc::new(MockNotifier::with_result(Ok(())));

        let result = handler(enhancer, notifier.clone())
            .handle(submission(false, Some("reader@example.com")))
            .await
            .unwrap();

        assert!(!result.email_sent);
        assert_eq!(notifier.delivery_count(), 0);
    }

    #[tokio::test]
    async fn successful_delivery_sets_email_sent() {
        let enhancer = Arc::new(MockEnhancer::succeeding());
        let notifier = Arc::new(MockNotifier::with_result(Ok(())));

        let result = handler(enhancer, notifier.clone())
            .handle(submission(true, Some("reader@example.com")))
            .await
            .unwrap();

        assert!(result.email_sent);
        let deliveries = notifier.deliveries.lock().unwrap();
        assert_eq!(deliveries[0].0, "reader@example.com");
        assert_eq!(deliveries[0].1, "A platform for people to trade unused gift cards");
    }

    #[tokio::test]
    async fn failed_delivery_still_returns_result() {
        let enhancer = Arc::new(MockEnhancer::succeeding());
        let notifier = Arc::new(MockNotifier::with_result(Err(NotificationError::delivery(
            "connection refused",
        ))));

        let result = handler(enhancer, notifier.clone())
            .handle(submission(true, Some("reader@example.com")))
            .await
            .unwrap();

        assert!(!result.email_sent);
        assert_eq!(result.enhanced, sample());
        assert_eq!(notifier.delivery_count(), 1);
    }

    #[tokio::test]
    async fn unconfigured_notifier_still_returns_result() {
        let enhancer = Arc::new(MockEnhancer::succeeding());
        let notifier = Arc::new(MockNotifier::with_result(Err(NotificationError::NotConfigured)));

        let result = handler(enhancer, notifier)
            .handle(submission(true, Some("reader@example.com")))
            .await
            .unwrap();

        assert!(!result.email_sent);
    }

    #[tokio::test]
    async fn slow_delivery_is_abandoned_after_deadline() {
        let enhancer = Arc::new(MockEnhancer::succeeding());
        let notifier = Arc::new(MockNotifier::hanging(Duration::from_secs(5)));

        let started = std::time::Instant::now();
        let result = handler(enhancer, notifier.clone())
            .with_delivery_timeout(Duration::from_millis(50))
            .handle(submission(true, Some("reader@example.com")))
            .await
            .unwrap();

        assert!(!result.email_sent);
        assert_eq!(result.enhanced, sample());
        assert_eq!(notifier.delivery_count(), 1);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn enhancement_errors_propagate_without_delivery() {
        for error in [
            EnhancementError::validation("Not an idea"),
            EnhancementError::rate_limited(),
            EnhancementError::processing(),
        ] {
            let enhancer = Arc::new(MockEnhancer::failing(error.clone()));
            let notifier = Arc::new(MockNotifier::with_result(Ok(())));

            let err = handler(enhancer, notifier.clone())
                .handle(submission(true, Some("reader@example.com")))
                .await
                .unwrap_err();

            assert_eq!(err, error);
            assert_eq!(notifier.delivery_count(), 0);
        }
    }
}
