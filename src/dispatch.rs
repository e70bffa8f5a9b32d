//! Dispatch use case: select a channel, send once, record the outcome.
//!
//! ```text
//! started -> channel-selected -> recipient-resolved -> notifier-resolved -> {sent | failed}
//! ```
//!
//! Failures before the notification record exists (unknown user, no
//! available channel, missing recipient, unregistered channel) propagate with
//! nothing persisted. Once the record exists, exactly one save happens, on
//! either the sent or the failed path.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::{Config, NotifyConfig};
use crate::error::{NotifyError, NotifyResult};
use crate::model::{Metadata, Notification, NotificationOutcome};
use crate::registry::NotifierRegistry;
use crate::selector::ChannelSelector;
use crate::store::{NotificationStore, UserStore};

/// Inbound command for presentation layers (HTTP, CLI, queue consumers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    pub user_id: String,
    pub message: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl DispatchRequest {
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            message: message.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Coordinates one delivery attempt per call.
///
/// Holds only shared, immutable collaborators; concurrent calls do not
/// coordinate with each other.
#[derive(Clone)]
pub struct Dispatcher {
    users: Arc<dyn UserStore>,
    notifications: Arc<dyn NotificationStore>,
    selector: ChannelSelector,
    registry: Arc<NotifierRegistry>,
}

impl Dispatcher {
    pub fn new(
        users: Arc<dyn UserStore>,
        notifications: Arc<dyn NotificationStore>,
        selector: ChannelSelector,
        registry: Arc<NotifierRegistry>,
    ) -> Self {
        Self {
            users,
            notifications,
            selector,
            registry,
        }
    }

    /// Validate `config` and wire the built-in backends and selector from it.
    pub fn from_config(
        config: &NotifyConfig,
        users: Arc<dyn UserStore>,
        notifications: Arc<dyn NotificationStore>,
    ) -> NotifyResult<Self> {
        config.validate()?;
        info!(config = config.name(), "Building dispatcher");
        Ok(Self::new(
            users,
            notifications,
            ChannelSelector::new(config.fallback_order.clone()),
            Arc::new(NotifierRegistry::from_config(config)),
        ))
    }

    pub fn registry(&self) -> &NotifierRegistry {
        &self.registry
    }

    pub fn selector(&self) -> &ChannelSelector {
        &self.selector
    }

    pub async fn execute(&self, request: DispatchRequest) -> NotifyResult<NotificationOutcome> {
        self.dispatch(&request.user_id, &request.message, request.metadata)
            .await
    }

    /// Deliver `message` to the user over exactly one channel.
    ///
    /// On a backend failure the `failed` record is persisted and the
    /// backend's [`SendFailure`](crate::SendFailure) is returned.
    pub async fn dispatch(
        &self,
        user_id: &str,
        message: &str,
        metadata: Metadata,
    ) -> NotifyResult<NotificationOutcome> {
        let user = self.users.find_by_id(user_id).await?;

        let channel = self.selector.select_channel(&user)?;

        let recipient = user.recipient_for(channel).ok_or_else(|| {
            error!(
                user_id = %user.id,
                channel = %channel,
                "Selected channel has no recipient identifier"
            );
            NotifyError::RecipientMissing {
                user_id: user.id.clone(),
                channel,
            }
        })?;

        let notifier = self.registry.resolve(channel).map_err(|e| {
            error!(user_id = %user.id, channel = %channel, "{e}");
            e
        })?;

        let mut notification = Notification::pending(&user.id, channel, message, metadata);

        let sent = notifier
            .send(recipient, message, notification.metadata())
            .await;

        match sent {
            Ok(()) => {
                notification.mark_sent()?;
                self.notifications.save(&notification).await?;

                info!(
                    notification_id = notification.id(),
                    user_id = %user.id,
                    channel = %channel,
                    "Notification sent successfully"
                );
                Ok(notification.outcome())
            }
            Err(failure) => {
                notification.mark_failed()?;

                error!(
                    notification_id = notification.id(),
                    user_id = %user.id,
                    channel = %channel,
                    error = %failure,
                    "Notification failed to send"
                );

                if let Err(e) = self.notifications.save(&notification).await {
                    error!(
                        notification_id = notification.id(),
                        error = %e,
                        "Failed to persist failed notification"
                    );
                }
                Err(NotifyError::Send(failure))
            }
        }
    }
}
