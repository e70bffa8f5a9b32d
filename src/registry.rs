//! Registry mapping each channel to the notifier that handles it.
//!
//! The registry is a fixed table with one slot per [`Channel`], filled once by
//! a [`RegistryBuilder`] at startup. Resolution is a slot lookup, and an empty
//! slot means the process was wired without a backend for that channel.

use std::sync::Arc;

use tracing::debug;

use crate::backends::{
    EmailNotifier, FakeSmsProvider, LogMailTransport, PushNotifier, SlackNotifier, SmsNotifier,
};
use crate::channel::Channel;
use crate::config::NotifyConfig;
use crate::error::{NotifyError, NotifyResult, RegistryError, RegistryResult};
use crate::notifier::Notifier;

/// Channel-indexed notifier table.
///
/// # Example
///
/// ```rust
/// use notifyhub::{Channel, NotifyConfig, NotifierRegistry};
///
/// let registry = NotifierRegistry::from_config(&NotifyConfig::deterministic());
///
/// assert_eq!(registry.resolve(Channel::Sms).unwrap().channel_name(), "sms");
/// assert_eq!(registry.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NotifierRegistry {
    slots: [Option<Arc<dyn Notifier>>; 4],
    ordered: Vec<Arc<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Registry with the four built-in backends, built eagerly from `config`.
    pub fn from_config(config: &NotifyConfig) -> Self {
        RegistryBuilder::new()
            .with(EmailNotifier::new(
                Arc::new(LogMailTransport),
                config.from_email.clone(),
            ))
            .with(SmsNotifier::new(
                Arc::new(FakeSmsProvider::new(config.sms)),
                config.sms_api_key.clone(),
            ))
            .with(PushNotifier::new(config.push))
            .with(SlackNotifier::new(config.slack))
            .build()
    }

    /// Notifier for `channel`, or `UnsupportedChannel` if none was registered.
    pub fn resolve(&self, channel: Channel) -> NotifyResult<&dyn Notifier> {
        self.get(channel)
            .ok_or(NotifyError::UnsupportedChannel(channel))
    }

    pub fn get(&self, channel: Channel) -> Option<&dyn Notifier> {
        self.slots[channel.index()].as_deref()
    }

    /// Check if some notifier handles `channel`.
    pub fn supports(&self, channel: Channel) -> bool {
        self.slots[channel.index()].is_some()
    }

    /// Channels with a registered notifier, in declaration order.
    pub fn channels(&self) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|channel| self.supports(*channel))
            .collect()
    }

    /// Channel names of the registered notifiers, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.ordered.iter().map(|n| n.channel_name()).collect()
    }

    /// Number of registered notifiers.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Iterate over notifiers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Notifier> {
        self.ordered.iter().map(|n| -> &dyn Notifier { n.as_ref() })
    }

    /// Claim every free slot the notifier supports. Earlier registrations win.
    fn register(&mut self, notifier: Arc<dyn Notifier>) {
        let mut claimed = false;
        for channel in Channel::ALL {
            let slot = &mut self.slots[channel.index()];
            if slot.is_none() && notifier.supports(channel) {
                *slot = Some(Arc::clone(&notifier));
                claimed = true;
            }
        }
        if claimed {
            debug!(notifier = notifier.channel_name(), "Registered notifier");
            self.ordered.push(notifier);
        } else {
            debug!(
                notifier = notifier.channel_name(),
                "Notifier claims no free channel, skipped"
            );
        }
    }

    /// Register, failing if any supported channel is already taken.
    fn register_unique(&mut self, notifier: Arc<dyn Notifier>) -> RegistryResult<()> {
        let supported: Vec<Channel> = Channel::ALL
            .into_iter()
            .filter(|channel| notifier.supports(*channel))
            .collect();
        if supported.is_empty() {
            return Err(RegistryError::NoChannel(notifier.channel_name().to_string()));
        }
        for channel in &supported {
            if let Some(existing) = self.get(*channel) {
                return Err(RegistryError::AlreadyRegistered {
                    channel: *channel,
                    existing: existing.channel_name().to_string(),
                });
            }
        }
        self.register(notifier);
        Ok(())
    }
}

/// Builder for creating registries with fluent API.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: NotifierRegistry,
}

impl RegistryBuilder {
    /// Create a new registry builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notifier. Channels already claimed stay with their first owner.
    pub fn with<N: Notifier + 'static>(self, notifier: N) -> Self {
        self.with_shared(Arc::new(notifier))
    }

    /// Add a notifier that is also held elsewhere.
    pub fn with_shared(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.registry.register(notifier);
        self
    }

    /// Add a notifier, failing if one of its channels is already claimed.
    pub fn with_unique<N: Notifier + 'static>(mut self, notifier: N) -> RegistryResult<Self> {
        self.registry.register_unique(Arc::new(notifier))?;
        Ok(self)
    }

    /// Build the registry.
    pub fn build(self) -> NotifierRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Simulation;
    use crate::error::SendFailure;
    use crate::model::Metadata;
    use crate::notifier::NotifierExt;
    use async_trait::async_trait;
    use std::any::Any;

    /// Notifier claiming an arbitrary set of channels.
    #[derive(Debug)]
    struct MultiNotifier {
        name: &'static str,
        channels: Vec<Channel>,
    }

    impl MultiNotifier {
        fn new(name: &'static str, channels: Vec<Channel>) -> Self {
            Self { name, channels }
        }
    }

    #[async_trait]
    impl Notifier for MultiNotifier {
        fn channel_name(&self) -> &str {
            self.name
        }

        fn supports(&self, channel: Channel) -> bool {
            self.channels.contains(&channel)
        }

        async fn send(&self, _: &str, _: &str, _: &Metadata) -> Result<(), SendFailure> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_registry_from_config() {
        let registry = NotifierRegistry::from_config(&NotifyConfig::deterministic());

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.channels(), Channel::ALL.to_vec());
        assert_eq!(registry.names(), vec!["email", "sms", "push", "slack"]);

        for channel in Channel::ALL {
            let notifier = registry.resolve(channel).unwrap();
            assert_eq!(notifier.channel_name(), channel.as_str());
            assert!(notifier.supports(channel));
        }
        assert!(registry.resolve(Channel::Email).unwrap().is::<EmailNotifier>());
        assert!(registry
            .resolve(Channel::Push)
            .unwrap()
            .downcast_ref::<PushNotifier>()
            .is_some());
    }

    #[test]
    fn test_registry_resolve_missing_channel() {
        let registry = RegistryBuilder::new()
            .with(PushNotifier::new(Simulation::instant()))
            .build();

        assert!(registry.resolve(Channel::Push).is_ok());
        let err = registry.resolve(Channel::Slack).unwrap_err();
        assert!(matches!(err, NotifyError::UnsupportedChannel(Channel::Slack)));
        assert_eq!(
            err.to_string(),
            "No notifier registered for notification channel: slack"
        );
    }

    #[test]
    fn test_registry_first_registration_wins() {
        let registry = RegistryBuilder::new()
            .with(MultiNotifier::new("first", vec![Channel::Email, Channel::Sms]))
            .with(MultiNotifier::new("second", vec![Channel::Sms, Channel::Slack]))
            .build();

        assert_eq!(registry.resolve(Channel::Email).unwrap().channel_name(), "first");
        assert_eq!(registry.resolve(Channel::Sms).unwrap().channel_name(), "first");
        assert_eq!(registry.resolve(Channel::Slack).unwrap().channel_name(), "second");
        assert!(!registry.supports(Channel::Push));
        assert_eq!(registry.names(), vec!["first", "second"]);
    }

    #[test]
    fn test_registry_skips_notifier_without_free_channel() {
        let registry = RegistryBuilder::new()
            .with(MultiNotifier::new("email", vec![Channel::Email]))
            .with(MultiNotifier::new("shadowed", vec![Channel::Email]))
            .with(MultiNotifier::new("nothing", vec![]))
            .build();

        assert_eq!(registry.len(), 1);
        let names: Vec<&str> = registry.iter().map(|n| n.channel_name()).collect();
        assert_eq!(names, vec!["email"]);
    }

    #[test]
    fn test_registry_unique_registration() {
        let builder = RegistryBuilder::new()
            .with_unique(MultiNotifier::new("sms", vec![Channel::Sms]))
            .unwrap();

        let err = builder
            .with_unique(MultiNotifier::new("sms-2", vec![Channel::Sms]))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::AlreadyRegistered {
                channel: Channel::Sms,
                existing: "sms".to_string(),
            }
        );

        let err = RegistryBuilder::new()
            .with_unique(MultiNotifier::new("none", vec![]))
            .unwrap_err();
        assert_eq!(err, RegistryError::NoChannel("none".to_string()));
    }

    #[test]
    fn test_empty_registry() {
        let registry = RegistryBuilder::new().build();
        assert!(registry.is_empty());
        assert!(registry.channels().is_empty());
        for channel in Channel::ALL {
            assert!(registry.resolve(channel).is_err());
        }
    }
}
