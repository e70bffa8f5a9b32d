//! SMS notifier and the provider seam it sends through.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::{masked, prefix, simulate_call};
use crate::channel::Channel;
use crate::config::Simulation;
use crate::error::{SendFailure, TransportError};
use crate::model::Metadata;
use crate::notifier::Notifier;

/// SMS gateway client.
#[async_trait]
pub trait SmsProvider: Send + Sync + Debug {
    async fn send_sms(
        &self,
        phone_number: &str,
        message: &str,
        api_key: &str,
    ) -> Result<(), TransportError>;
}

/// Development provider: nothing leaves the process.
#[derive(Debug, Clone)]
pub struct FakeSmsProvider {
    simulation: Simulation,
}

impl FakeSmsProvider {
    pub fn new(simulation: Simulation) -> Self {
        Self { simulation }
    }
}

#[async_trait]
impl SmsProvider for FakeSmsProvider {
    async fn send_sms(
        &self,
        phone_number: &str,
        message: &str,
        api_key: &str,
    ) -> Result<(), TransportError> {
        simulate_call(&self.simulation, "sms provider").await?;

        info!(
            phone = phone_number,
            preview = prefix(message, 50),
            api_key_used = %masked(api_key, 10),
            "[FAKE SMS] SMS sent"
        );
        Ok(())
    }
}

/// Sends notifications as text messages. Ignores metadata.
#[derive(Debug, Clone)]
pub struct SmsNotifier {
    provider: Arc<dyn SmsProvider>,
    api_key: String,
}

impl SmsNotifier {
    pub fn new(provider: Arc<dyn SmsProvider>, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    fn channel_name(&self) -> &str {
        Channel::Sms.as_str()
    }

    fn supports(&self, channel: Channel) -> bool {
        channel == Channel::Sms
    }

    async fn send(
        &self,
        recipient: &str,
        message: &str,
        _metadata: &Metadata,
    ) -> Result<(), SendFailure> {
        match self
            .provider
            .send_sms(recipient, message, &self.api_key)
            .await
        {
            Ok(()) => {
                info!(
                    channel = self.channel_name(),
                    recipient,
                    message_length = message.len(),
                    "SMS notification sent"
                );
                Ok(())
            }
            Err(e) => {
                error!(recipient, error = %e, "Failed to send sms notification");
                Err(SendFailure::new(Channel::Sms, recipient, e))
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
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct CapturingProvider {
        calls: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl SmsProvider for CapturingProvider {
        async fn send_sms(
            &self,
            phone_number: &str,
            message: &str,
            api_key: &str,
        ) -> Result<(), TransportError> {
            self.calls.lock().unwrap().push((
                phone_number.to_string(),
                message.to_string(),
                api_key.to_string(),
            ));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sms_passes_api_key() {
        let provider = Arc::new(CapturingProvider::default());
        let notifier = SmsNotifier::new(provider.clone(), "sk_test_42");

        notifier
            .send("+33612345678", "Your code is 1234", &Metadata::new())
            .await
            .unwrap();

        let calls = provider.calls.lock().unwrap();
        assert_eq!(
            calls[0],
            (
                "+33612345678".to_string(),
                "Your code is 1234".to_string(),
                "sk_test_42".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_fake_provider_failure_is_wrapped() {
        let notifier = SmsNotifier::new(
            Arc::new(FakeSmsProvider::new(Simulation::failing())),
            "sk_test_42",
        );

        let err = notifier
            .send("+33698765432", "hello", &Metadata::new())
            .await
            .unwrap_err();
        assert_eq!(err.channel(), Channel::Sms);
        assert_eq!(err.recipient(), "+33698765432");
    }

    #[tokio::test]
    async fn test_fake_provider_success() {
        let provider = FakeSmsProvider::new(Simulation::instant());
        assert!(provider
            .send_sms("+33698765432", "hello", "sk_test_42")
            .await
            .is_ok());
    }
}
