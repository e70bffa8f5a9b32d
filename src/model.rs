//! Users, notification records and the values exchanged with callers.

use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::channel::{Channel, NotificationStatus};
use crate::error::{NotifyError, NotifyResult};

/// Channel-specific hints attached to a message (subject, html, priority...).
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Read a string-valued metadata entry.
pub(crate) fn metadata_str<'a>(metadata: &'a Metadata, key: &str) -> Option<&'a str> {
    metadata.get(key).and_then(|value| value.as_str())
}

/// Current time at the second precision records are stored with.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|value| !value.is_empty())
}

/// Snapshot of the four availability facts of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAvailability {
    pub email_verified: bool,
    pub has_phone: bool,
    pub has_push_token: bool,
    pub has_slack: bool,
}

impl ChannelAvailability {
    pub fn is_available(&self, channel: Channel) -> bool {
        match channel {
            Channel::Email => self.email_verified,
            Channel::Sms => self.has_phone,
            Channel::Push => self.has_push_token,
            Channel::Slack => self.has_slack,
        }
    }
}

/// What the channel selector needs to know about a recipient.
///
/// Implementations must evaluate predicates against live state on every call.
pub trait ChannelProfile {
    /// Identifier used in logs and diagnostics.
    fn profile_id(&self) -> &str;

    fn preferred_channel(&self) -> Channel;

    fn has_channel_available(&self, channel: Channel) -> bool;

    /// All four facts at once, for diagnostics.
    fn availability(&self) -> ChannelAvailability {
        ChannelAvailability {
            email_verified: self.has_channel_available(Channel::Email),
            has_phone: self.has_channel_available(Channel::Sms),
            has_push_token: self.has_channel_available(Channel::Push),
            has_slack: self.has_channel_available(Channel::Slack),
        }
    }
}

/// A notification recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub email_verified: bool,
    pub phone: Option<String>,
    pub push_token: Option<String>,
    pub slack_user_id: Option<String>,
    pub preferred_channel: Channel,
}

impl User {
    /// Create a user with an unverified email and no other channel.
    pub fn new(email: impl Into<String>, preferred_channel: Channel) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            email_verified: false,
            phone: None,
            push_token: None,
            slack_user_id: None,
            preferred_channel,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn verified(mut self) -> Self {
        self.email_verified = true;
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_push_token(mut self, token: impl Into<String>) -> Self {
        self.push_token = Some(token.into());
        self
    }

    pub fn with_slack_user_id(mut self, slack_user_id: impl Into<String>) -> Self {
        self.slack_user_id = Some(slack_user_id.into());
        self
    }

    pub fn is_email_verified(&self) -> bool {
        self.email_verified
    }

    pub fn has_phone_number(&self) -> bool {
        present(&self.phone)
    }

    pub fn has_push_token(&self) -> bool {
        present(&self.push_token)
    }

    pub fn is_slack_connected(&self) -> bool {
        present(&self.slack_user_id)
    }

    /// Addressing value for `channel`, if the user has one.
    pub fn recipient_for(&self, channel: Channel) -> Option<&str> {
        let field = match channel {
            Channel::Email => return Some(self.email.as_str()),
            Channel::Sms => &self.phone,
            Channel::Push => &self.push_token,
            Channel::Slack => &self.slack_user_id,
        };
        field.as_deref().filter(|value| !value.is_empty())
    }
}

impl ChannelProfile for User {
    fn profile_id(&self) -> &str {
        &self.id
    }

    fn preferred_channel(&self) -> Channel {
        self.preferred_channel
    }

    fn has_channel_available(&self, channel: Channel) -> bool {
        match channel {
            Channel::Email => self.is_email_verified(),
            Channel::Sms => self.has_phone_number(),
            Channel::Push => self.has_push_token(),
            Channel::Slack => self.is_slack_connected(),
        }
    }
}

/// Record of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    id: String,
    user_id: String,
    channel: Channel,
    message: String,
    metadata: Metadata,
    status: NotificationStatus,
    sent_at: DateTime<Utc>,
}

impl Notification {
    /// New `pending` record with a fresh id, stamped now.
    pub fn pending(
        user_id: impl Into<String>,
        channel: Channel,
        message: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            channel,
            message: message.into(),
            metadata,
            status: NotificationStatus::Pending,
            sent_at: now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn status(&self) -> NotificationStatus {
        self.status
    }

    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    /// `pending -> sent`, refreshing the timestamp.
    pub fn mark_sent(&mut self) -> NotifyResult<()> {
        self.transition(NotificationStatus::Sent)?;
        self.sent_at = now();
        Ok(())
    }

    /// `pending -> failed`. The creation timestamp is kept.
    pub fn mark_failed(&mut self) -> NotifyResult<()> {
        self.transition(NotificationStatus::Failed)
    }

    fn transition(&mut self, to: NotificationStatus) -> NotifyResult<()> {
        if self.status.is_terminal() {
            return Err(NotifyError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    pub fn outcome(&self) -> NotificationOutcome {
        NotificationOutcome {
            notification_id: self.id.clone(),
            channel: self.channel,
            status: self.status,
            sent_at: self.sent_at,
        }
    }
}

/// What a successful dispatch returns to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOutcome {
    pub notification_id: String,
    pub channel: Channel,
    pub status: NotificationStatus,
    pub sent_at: DateTime<Utc>,
}
