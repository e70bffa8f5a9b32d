//! Push notifier (FCM/APNs style gateway, simulated).

use std::any::Any;

use async_trait::async_trait;
use tracing::{error, info};

use super::{masked, simulate_call};
use crate::channel::Channel;
use crate::config::Simulation;
use crate::error::SendFailure;
use crate::model::{metadata_str, Metadata};
use crate::notifier::Notifier;

/// Device tokens are long and sensitive; only this many characters are logged.
const TOKEN_LOG_CHARS: usize = 20;

/// Sends push notifications to device tokens.
///
/// Metadata keys: `title` (defaults to "Notification") and `priority`
/// (defaults to "normal").
#[derive(Debug, Clone)]
pub struct PushNotifier {
    simulation: Simulation,
}

impl PushNotifier {
    pub fn new(simulation: Simulation) -> Self {
        Self { simulation }
    }
}

#[async_trait]
impl Notifier for PushNotifier {
    fn channel_name(&self) -> &str {
        Channel::Push.as_str()
    }

    fn supports(&self, channel: Channel) -> bool {
        channel == Channel::Push
    }

    async fn send(
        &self,
        recipient: &str,
        _message: &str,
        metadata: &Metadata,
    ) -> Result<(), SendFailure> {
        let priority = metadata_str(metadata, "priority").unwrap_or("normal");
        let title = metadata_str(metadata, "title").unwrap_or("Notification");
        let token = masked(recipient, TOKEN_LOG_CHARS);

        match simulate_call(&self.simulation, "push gateway").await {
            Ok(()) => {
                info!(
                    channel = self.channel_name(),
                    token = %token,
                    title,
                    priority,
                    "Push notification sent"
                );
                Ok(())
            }
            Err(e) => {
                error!(token = %token, error = %e, "Failed to send push notification");
                Err(SendFailure::new(Channel::Push, token, e))
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
