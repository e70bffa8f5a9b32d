//! Slack notifier (chat.postMessage style API, simulated).

use std::any::Any;

use async_trait::async_trait;
use tracing::{error, info};

use super::simulate_call;
use crate::channel::Channel;
use crate::config::Simulation;
use crate::error::SendFailure;
use crate::model::{metadata_str, Metadata};
use crate::notifier::Notifier;

const DEFAULT_SLACK_CHANNEL: &str = "#general";

/// Sends notifications to Slack members.
///
/// Metadata key `slack_channel` picks the target conversation.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    simulation: Simulation,
}

impl SlackNotifier {
    pub fn new(simulation: Simulation) -> Self {
        Self { simulation }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn channel_name(&self) -> &str {
        Channel::Slack.as_str()
    }

    fn supports(&self, channel: Channel) -> bool {
        channel == Channel::Slack
    }

    async fn send(
        &self,
        recipient: &str,
        _message: &str,
        metadata: &Metadata,
    ) -> Result<(), SendFailure> {
        let slack_channel =
            metadata_str(metadata, "slack_channel").unwrap_or(DEFAULT_SLACK_CHANNEL);

        match simulate_call(&self.simulation, "slack api").await {
            Ok(()) => {
                info!(
                    channel = self.channel_name(),
                    user_id = recipient,
                    slack_channel,
                    "Slack notification sent"
                );
                Ok(())
            }
            Err(e) => {
                error!(user_id = recipient, error = %e, "Failed to send Slack notification");
                Err(SendFailure::new(Channel::Slack, recipient, e))
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
