//! Notifier trait: the uniform seam over channel backends.
//!
//! A `Notifier` delivers one message to one recipient identifier. Notifiers are
//! registered in a [`NotifierRegistry`](crate::NotifierRegistry) and resolved by
//! the channels they claim through `supports`.

use std::any::Any;
use std::fmt::Debug;

use async_trait::async_trait;

use crate::channel::Channel;
use crate::error::SendFailure;
use crate::model::Metadata;

/// Base trait for all channel backends.
///
/// Every failure must surface as a [`SendFailure`] so callers can handle
/// backends without knowing which one they hold.
///
/// # Example
///
/// ```rust
/// use notifyhub::{async_trait, Channel, Metadata, Notifier, SendFailure};
/// use std::any::Any;
///
/// #[derive(Debug)]
/// struct Console;
///
/// #[async_trait]
/// impl Notifier for Console {
///     fn channel_name(&self) -> &str {
///         Channel::Push.as_str()
///     }
///
///     fn supports(&self, channel: Channel) -> bool {
///         channel == Channel::Push
///     }
///
///     async fn send(
///         &self,
///         recipient: &str,
///         message: &str,
///         _metadata: &Metadata,
///     ) -> Result<(), SendFailure> {
///         println!("{recipient}: {message}");
///         Ok(())
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    /// Stable lowercase identifier matching the channel's wire value.
    fn channel_name(&self) -> &str;

    /// Check if this notifier handles the given channel.
    fn supports(&self, channel: Channel) -> bool;

    /// Deliver `message` to `recipient`.
    ///
    /// `metadata` carries channel-specific hints; unknown keys are ignored.
    async fn send(
        &self,
        recipient: &str,
        message: &str,
        metadata: &Metadata,
    ) -> Result<(), SendFailure>;

    /// Downcast to concrete type for advanced usage.
    fn as_any(&self) -> &dyn Any;
}

/// Extension trait for notifier type checking.
pub trait NotifierExt: Notifier {
    /// Check if this notifier is of type T.
    fn is<T: Notifier + 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcast to type T.
    fn downcast_ref<T: Notifier + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl<N: Notifier + ?Sized> NotifierExt for N {}
