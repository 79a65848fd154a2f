//! SMTP notifier - delivers enhanced ideas by email using `lettre`.
//!
//! The transport is built once from [`EmailConfig`]. Missing credentials or
//! a transport that cannot be built leave the notifier disabled for the
//! lifetime of the process; every delivery then fails with
//! [`NotificationError::NotConfigured`].

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::template::{render_enhanced_idea_email, ENHANCED_IDEA_SUBJECT};
use crate::config::{EmailConfig, SmtpSettings};
use crate::domain::idea::{EnhancedIdea, NotificationError};
use crate::ports::IdeaNotifier;

struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

/// IdeaNotifier backed by an SMTP relay.
pub struct SmtpIdeaNotifier {
    transport: Option<SmtpTransport>,
}

impl SmtpIdeaNotifier {
    /// Builds the notifier from configuration.
    ///
    /// Never fails: incomplete settings are logged and produce a disabled notifier.
    pub fn from_config(config: &EmailConfig) -> Self {
        let Some(settings) = config.smtp_settings() else {
            tracing::warn!("Email service not configured - missing SMTP settings");
            return Self::disabled();
        };

        match build_transport(&settings, config) {
            Ok(transport) => {
                tracing::info!(
                    host = %settings.host,
                    port = settings.port,
                    implicit_tls = settings.implicit_tls(),
                    "Email service configured"
                );
                Self {
                    transport: Some(transport),
                }
            }
            Err(message) => {
                tracing::error!("Email service disabled: {}", message);
                Self::disabled()
            }
        }
    }

    /// A notifier that refuses every delivery.
    pub fn disabled() -> Self {
        Self { transport: None }
    }
}

fn build_transport(settings: &SmtpSettings, config: &EmailConfig) -> Result<SmtpTransport, String> {
    let address: Address = settings
        .address
        .parse()
        .map_err(|e| format!("invalid sender address: {}", e))?;
    let sender = Mailbox::new(Some(config.from_name.clone()), address);

    let builder = if settings.implicit_tls() {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
    }
    .map_err(|e| format!("failed to create SMTP transport: {}", e))?;

    let mailer = builder
        .port(settings.port)
        .credentials(Credentials::new(
            settings.address.clone(),
            settings.password.clone(),
        ))
        .timeout(Some(config.timeout()))
        .build();

    Ok(SmtpTransport { mailer, sender })
}

/// Builds the enhanced-idea message for `recipient`.
fn build_message(
    sender: &Mailbox,
    recipient: &str,
    enhanced: &EnhancedIdea,
    original: &str,
) -> Result<Message, NotificationError> {
    let to: Mailbox = recipient
        .parse()
        .map_err(|e| NotificationError::delivery(format!("invalid recipient address: {}", e)))?;

    Message::builder()
        .from(sender.clone())
        .to(to)
        .subject(ENHANCED_IDEA_SUBJECT)
        .header(ContentType::TEXT_HTML)
        .body(render_enhanced_idea_email(enhanced, original))
        .map_err(|e| NotificationError::delivery(format!("failed to build email: {}", e)))
}

#[async_trait]
impl IdeaNotifier for SmtpIdeaNotifier {
    async fn deliver(
        &self,
        recipient: &str,
        enhanced: &EnhancedIdea,
        original: &str,
    ) -> Result<(), NotificationError> {
        let transport = self
            .transport
            .as_ref()
            .ok_or(NotificationError::NotConfigured)?;

        let message = build_message(&transport.sender, recipient, enhanced, original)?;

        match transport.mailer.send(message).await {
            Ok(_) => {
                tracing::info!(recipient = %recipient, "Enhanced idea email sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(recipient = %recipient, "Failed to send email: {}", e);
                Err(NotificationError::delivery(e.to_string()))
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.transport.is_some()
    }
}
