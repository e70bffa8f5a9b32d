//! Error types for notification dispatch.

use std::time::Duration;

use thiserror::Error;

use crate::channel::{Channel, NotificationStatus};
use crate::model::ChannelAvailability;

/// Root error type for dispatch operations.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The requested user has no matching record
    #[error("User with ID \"{user_id}\" not found")]
    UserNotFound { user_id: String },

    /// No channel passes its availability predicate for the user
    #[error(transparent)]
    NoAvailableChannel(#[from] NoAvailableChannel),

    /// The registry has no notifier for a channel the selector produced
    #[error("No notifier registered for notification channel: {0}")]
    UnsupportedChannel(Channel),

    /// The selected backend failed to deliver
    #[error(transparent)]
    Send(#[from] SendFailure),

    /// Selected channel proved available but the recipient field is absent
    #[error("Recipient identifier for channel {channel} missing on user {user_id}")]
    RecipientMissing { user_id: String, channel: Channel },

    /// Attempted to leave a terminal status
    #[error("Notification {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: NotificationStatus,
        to: NotificationStatus,
    },

    /// Storage collaborator failure
    #[error("Storage error: {0}")]
    Store(StoreError),

    /// Configuration failure
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl NotifyError {
    /// Server-side faults: misconfiguration, broken invariants and storage.
    ///
    /// Everything else is an expected outcome the caller should translate
    /// into a user-facing response.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            NotifyError::UnsupportedChannel(_)
                | NotifyError::RecipientMissing { .. }
                | NotifyError::InvalidTransition { .. }
                | NotifyError::Store(_)
                | NotifyError::Config(_)
        )
    }

    /// The wrapped send failure, if this error came from a backend.
    pub fn as_send_failure(&self) -> Option<&SendFailure> {
        match self {
            NotifyError::Send(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<StoreError> for NotifyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound { user_id } => NotifyError::UserNotFound { user_id },
            other => NotifyError::Store(other),
        }
    }
}

/// No channel is usable for a user.
///
/// Carries the availability snapshot taken during selection so the message can
/// be rendered without going back to the user record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "No available notification channel for user {user_id}. Email verified: {}, Has phone: {}, Has push token: {}, Has Slack: {}",
    yes_no(.availability.email_verified),
    yes_no(.availability.has_phone),
    yes_no(.availability.has_push_token),
    yes_no(.availability.has_slack)
)]
pub struct NoAvailableChannel {
    pub user_id: String,
    pub availability: ChannelAvailability,
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Uniform failure raised by every notifier backend.
#[derive(Error, Debug)]
#[error("Failed to send {channel} notification to {recipient}: {source}")]
pub struct SendFailure {
    channel: Channel,
    recipient: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl SendFailure {
    pub fn new(
        channel: Channel,
        recipient: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            channel,
            recipient: recipient.into(),
            source: source.into(),
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Recipient as reported by the backend (push tokens are truncated).
    pub fn recipient(&self) -> &str {
        &self.recipient
    }
}

/// Failures reported by the transports behind the notifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Backend could not be reached
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Backend refused the request (bad recipient, auth, payload)
    #[error("Backend rejected request: {0}")]
    Rejected(String),

    /// Backend call exceeded its own deadline
    #[error("Backend timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors from the user and notification stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("User with ID \"{user_id}\" not found")]
    UserNotFound { user_id: String },

    #[error("Notification with ID \"{id}\" not found")]
    NotificationNotFound { id: String },

    #[error("Storage backend failure: {0}")]
    Backend(String),
}

/// Errors that can occur while building the notifier registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Another notifier already owns the channel
    #[error("Channel {channel} already handled by notifier {existing}")]
    AlreadyRegistered { channel: Channel, existing: String },

    /// Notifier claims none of the known channels
    #[error("Notifier {0} supports no known channel")]
    NoChannel(String),
}

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for dispatch operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
