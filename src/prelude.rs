//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use notifyhub::prelude::*;
//! ```

// Configuration
pub use crate::config::{Config, NotifyConfig, Simulation};

// Domain
pub use crate::channel::{Channel, NotificationStatus};
pub use crate::model::{ChannelProfile, Metadata, Notification, NotificationOutcome, User};

// Core traits
pub use crate::notifier::{Notifier, NotifierExt};
pub use crate::store::{NotificationStore, UserStore};

// Pipeline
pub use crate::dispatch::{DispatchRequest, Dispatcher};
pub use crate::registry::{NotifierRegistry, RegistryBuilder};
pub use crate::selector::{ChannelSelector, FallbackOrder};
pub use crate::store::{InMemoryNotificationStore, InMemoryUserStore};

// Errors
pub use crate::error::{
    NoAvailableChannel, NotifyError, NotifyResult, SendFailure, StoreError, TransportError,
};

pub use crate::fixtures;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
