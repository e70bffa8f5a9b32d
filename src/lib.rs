//! # Notifyhub
//!
//! **Notifyhub** delivers a single message to a user over exactly one channel
//! (email, SMS, push or Slack), falling back to another channel when the
//! user's preferred one is unusable, and records the outcome.
//!
//! ## Overview
//!
//! ```text
//! caller -> Dispatcher -> ChannelSelector -> NotifierRegistry -> Notifier -> NotificationStore
//! ```
//!
//! - **Selection**: the preferred channel wins when available, otherwise a
//!   fixed fallback order (push, email, sms, slack) is walked
//! - **Notifiers**: one trait over heterogeneous backends, all failing through
//!   [`SendFailure`]
//! - **Registry**: one slot per channel, filled once at startup
//! - **Bookkeeping**: exactly one persisted record per attempted send
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notifyhub::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> NotifyResult<()> {
//! let users = Arc::new(InMemoryUserStore::with_users(fixtures::demo_users()));
//! let notifications = Arc::new(InMemoryNotificationStore::new());
//! let dispatcher = Dispatcher::from_config(&NotifyConfig::from_env()?, users, notifications)?;
//!
//! let outcome = dispatcher
//!     .dispatch(fixtures::SMS_ONLY, "Your code is 1234", Metadata::new())
//!     .await?;
//! assert_eq!(outcome.channel, Channel::Sms);
//! # Ok(())
//! # }
//! ```

mod backends;
mod channel;
mod config;
mod dispatch;
mod error;
mod model;
mod notifier;
mod registry;
mod selector;
mod store;

pub mod fixtures;
pub mod prelude;

// Re-export core types
pub use backends::{
    EmailNotifier, FakeSmsProvider, LogMailTransport, MailTransport, OutgoingEmail, PushNotifier,
    SlackNotifier, SmsNotifier, SmsProvider,
};
pub use channel::{Channel, NotificationStatus, ParseChannelError};
pub use config::{Config, NotifyConfig, Simulation};
pub use dispatch::{DispatchRequest, Dispatcher};
pub use error::{
    ConfigError, NoAvailableChannel, NotifyError, NotifyResult, RegistryError, RegistryResult,
    SendFailure, StoreError, StoreResult, TransportError,
};
pub use model::{
    ChannelAvailability, ChannelProfile, Metadata, Notification, NotificationOutcome, User,
};
pub use notifier::{Notifier, NotifierExt};
pub use registry::{NotifierRegistry, RegistryBuilder};
pub use selector::{ChannelSelector, FallbackOrder};
pub use store::{InMemoryNotificationStore, InMemoryUserStore, NotificationStore, UserStore};

// Re-export async-trait for convenience
pub use async_trait::async_trait;
