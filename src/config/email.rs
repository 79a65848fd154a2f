//! Email configuration (SMTP)
//!
//! Every field is optional. Email delivery is enabled only when host, port,
//! address and password are all present; partial settings disable it
//! without failing start-up.

use serde::Deserialize;
use std::time::Duration;

/// Email configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP server host
    pub host: Option<String>,

    /// SMTP server port (465 means implicit TLS)
    pub port: Option<u16>,

    /// Sender mailbox, also used as the SMTP username
    pub address: Option<String>,

    /// SMTP password
    pub password: Option<String>,

    /// Display name for the sender
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// SMTP command timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Overall deadline for one delivery, in seconds
    #[serde(default = "default_delivery_timeout")]
    pub delivery_timeout_secs: u64,
}

/// Complete SMTP settings, present only when every credential is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub address: String,
    pub password: String,
}

impl SmtpSettings {
    /// Port 465 speaks TLS from the first byte; anything else upgrades via STARTTLS.
    pub fn implicit_tls(&self) -> bool {
        self.port == 465
    }
}

impl EmailConfig {
    /// Returns the SMTP settings if all four credentials are present and non-blank.
    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        let host = non_blank(&self.host)?;
        let port = self.port.filter(|p| *p != 0)?;
        let address = non_blank(&self.address)?;
        let password = non_blank(&self.password)?;
        Some(SmtpSettings {
            host,
            port,
            address,
            password,
        })
    }

    /// Check if email delivery can be enabled
    pub fn is_configured(&self) -> bool {
        self.smtp_settings().is_some()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the whole-delivery deadline as Duration
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_secs)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            address: None,
            password: None,
            from_name: default_from_name(),
            timeout_secs: default_timeout(),
            delivery_timeout_secs: default_delivery_timeout(),
        }
    }
}

fn default_from_name() -> String {
    "IdeaBoost".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_delivery_timeout() -> u64 {
    20
}
