//! Email notifier.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::channel::Channel;
use crate::error::{SendFailure, TransportError};
use crate::model::{metadata_str, Metadata};
use crate::notifier::Notifier;

const DEFAULT_SUBJECT: &str = "Notification";

/// A fully built message handed to the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

/// Mail delivery seam (SMTP relay, provider API...).
#[async_trait]
pub trait MailTransport: Send + Sync + Debug {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), TransportError>;
}

/// Transport that only logs; used when no real relay is wired.
#[derive(Debug, Clone, Default)]
pub struct LogMailTransport;

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), TransportError> {
        debug!(
            from = %email.from,
            to = %email.to,
            subject = %email.subject,
            has_html = email.html.is_some(),
            "Mail transport accepted message"
        );
        Ok(())
    }
}

/// Sends notifications as email.
///
/// Metadata keys: `subject` (defaults to "Notification") and `html` for an
/// optional HTML alternative body.
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    transport: Arc<dyn MailTransport>,
    from_email: String,
}

impl EmailNotifier {
    pub fn new(transport: Arc<dyn MailTransport>, from_email: impl Into<String>) -> Self {
        Self {
            transport,
            from_email: from_email.into(),
        }
    }

    pub fn from_email(&self) -> &str {
        &self.from_email
    }

    fn compose(&self, recipient: &str, message: &str, metadata: &Metadata) -> OutgoingEmail {
        OutgoingEmail {
            from: self.from_email.clone(),
            to: recipient.to_string(),
            subject: metadata_str(metadata, "subject")
                .unwrap_or(DEFAULT_SUBJECT)
                .to_string(),
            text: message.to_string(),
            html: metadata_str(metadata, "html").map(str::to_string),
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel_name(&self) -> &str {
        Channel::Email.as_str()
    }

    fn supports(&self, channel: Channel) -> bool {
        channel == Channel::Email
    }

    async fn send(
        &self,
        recipient: &str,
        message: &str,
        metadata: &Metadata,
    ) -> Result<(), SendFailure> {
        let email = self.compose(recipient, message, metadata);

        match self.transport.deliver(&email).await {
            Ok(()) => {
                info!(
                    channel = self.channel_name(),
                    recipient,
                    subject = %email.subject,
                    "Email notification sent"
                );
                Ok(())
            }
            Err(e) => {
                error!(recipient, error = %e, "Failed to send email notification");
                Err(SendFailure::new(Channel::Email, recipient, e))
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<OutgoingEmail>>,
        reject: bool,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn deliver(&self, email: &OutgoingEmail) -> Result<(), TransportError> {
            if self.reject {
                return Err(TransportError::Rejected("mailbox unavailable".to_string()));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_email_defaults_subject() {
        let transport = Arc::new(RecordingTransport::default());
        let notifier = EmailNotifier::new(transport.clone(), "notifications@notifyhub.com");

        notifier
            .send("user@example.com", "Hello", &Metadata::new())
            .await
            .unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(
            sent[0],
            OutgoingEmail {
                from: "notifications@notifyhub.com".to_string(),
                to: "user@example.com".to_string(),
                subject: "Notification".to_string(),
                text: "Hello".to_string(),
                html: None,
            }
        );
    }

    #[tokio::test]
    async fn test_email_uses_subject_and_html() {
        let transport = Arc::new(RecordingTransport::default());
        let notifier = EmailNotifier::new(transport.clone(), "from@example.com");

        let mut metadata = Metadata::new();
        metadata.insert("subject".to_string(), json!("Welcome"));
        metadata.insert("html".to_string(), json!("<p>Hello</p>"));
        metadata.insert("priority".to_string(), json!("high"));

        notifier
            .send("user@example.com", "Hello", &metadata)
            .await
            .unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].subject, "Welcome");
        assert_eq!(sent[0].html.as_deref(), Some("<p>Hello</p>"));
    }

    #[tokio::test]
    async fn test_email_transport_failure_is_wrapped() {
        let transport = Arc::new(RecordingTransport {
            reject: true,
            ..Default::default()
        });
        let notifier = EmailNotifier::new(transport, "from@example.com");

        let err = notifier
            .send("user@example.com", "Hello", &Metadata::new())
            .await
            .unwrap_err();
        assert_eq!(err.channel(), Channel::Email);
        assert_eq!(
            err.to_string(),
            "Failed to send email notification to user@example.com: Backend rejected request: mailbox unavailable"
        );
    }

    #[test]
    fn test_email_supports_only_email() {
        let notifier = EmailNotifier::new(Arc::new(LogMailTransport), "from@example.com");
        assert!(notifier.supports(Channel::Email));
        assert!(!notifier.supports(Channel::Sms));
        assert_eq!(notifier.channel_name(), "email");
    }
}
