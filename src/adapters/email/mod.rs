//! Email adapters.
//!
//! - `SmtpIdeaNotifier` - IdeaNotifier over SMTP (`lettre`)
//! - `template` - HTML body of the enhanced-idea email

mod smtp_notifier;
mod template;

pub use smtp_notifier::SmtpIdeaNotifier;
pub use template::{render_enhanced_idea_email, ENHANCED_IDEA_SUBJECT};
