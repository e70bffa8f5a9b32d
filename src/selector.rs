//! Channel selection: preferred channel first, then a fixed fallback order.

use tracing::info;

use crate::channel::Channel;
use crate::error::{ConfigError, NoAvailableChannel};
use crate::model::ChannelProfile;

/// Order in which channels are tried once the preferred one is rejected.
///
/// Always covers every channel exactly once. The default is push, email, sms,
/// slack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackOrder(Vec<Channel>);

const DEFAULT_ORDER: [Channel; 4] = [
    Channel::Push,
    Channel::Email,
    Channel::Sms,
    Channel::Slack,
];

impl FallbackOrder {
    /// Order starting with `channels`. Channels left out follow in default
    /// order, so selection still reaches them.
    pub fn new(mut channels: Vec<Channel>) -> Result<Self, ConfigError> {
        if channels.is_empty() {
            return Err(ConfigError::invalid("fallback_order", "must not be empty"));
        }
        for (i, channel) in channels.iter().enumerate() {
            if channels[..i].contains(channel) {
                return Err(ConfigError::invalid(
                    "fallback_order",
                    format!("channel {channel} listed twice"),
                ));
            }
        }
        for channel in DEFAULT_ORDER {
            if !channels.contains(&channel) {
                channels.push(channel);
            }
        }
        Ok(Self(channels))
    }

    /// Parse a comma separated list such as `"push,email,sms"`.
    pub fn parse(list: &str) -> Result<Self, ConfigError> {
        let channels = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<Channel>()
                    .map_err(|e| ConfigError::invalid("fallback_order", e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(channels)
    }

    pub fn channels(&self) -> &[Channel] {
        &self.0
    }
}

impl Default for FallbackOrder {
    fn default() -> Self {
        Self(DEFAULT_ORDER.to_vec())
    }
}

/// Picks the channel a message goes out on.
#[derive(Debug, Clone, Default)]
pub struct ChannelSelector {
    fallback_order: FallbackOrder,
}

impl ChannelSelector {
    pub fn new(fallback_order: FallbackOrder) -> Self {
        Self { fallback_order }
    }

    pub fn fallback_order(&self) -> &FallbackOrder {
        &self.fallback_order
    }

    /// Select the best available channel for `profile`.
    ///
    /// The preferred channel wins whenever it is available, and in that case
    /// no other predicate is evaluated. Otherwise the full fallback order is
    /// walked and the first available channel is returned.
    pub fn select_channel<P>(&self, profile: &P) -> Result<Channel, NoAvailableChannel>
    where
        P: ChannelProfile + ?Sized,
    {
        let preferred = profile.preferred_channel();

        if profile.has_channel_available(preferred) {
            info!(
                user_id = profile.profile_id(),
                channel = %preferred,
                "Using preferred channel"
            );
            return Ok(preferred);
        }

        info!(
            user_id = profile.profile_id(),
            preferred_channel = %preferred,
            "Preferred channel not available, trying fallback"
        );

        if let Some(channel) = self
            .fallback_order
            .channels()
            .iter()
            .copied()
            .find(|channel| profile.has_channel_available(*channel))
        {
            info!(
                user_id = profile.profile_id(),
                channel = %channel,
                "Using fallback channel"
            );
            return Ok(channel);
        }

        let err = NoAvailableChannel {
            user_id: profile.profile_id().to_string(),
            availability: profile.availability(),
        };
        info!(user_id = profile.profile_id(), "{err}");
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;
    use std::cell::RefCell;

    /// Profile whose predicates are scripted and every call recorded.
    struct Scripted {
        preferred: Channel,
        available: Vec<Channel>,
        calls: RefCell<Vec<Channel>>,
    }

    impl Scripted {
        fn new(preferred: Channel, available: Vec<Channel>) -> Self {
            Self {
                preferred,
                available,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ChannelProfile for Scripted {
        fn profile_id(&self) -> &str {
            "scripted"
        }

        fn preferred_channel(&self) -> Channel {
            self.preferred
        }

        fn has_channel_available(&self, channel: Channel) -> bool {
            self.calls.borrow_mut().push(channel);
            self.available.contains(&channel)
        }
    }

    #[test]
    fn test_preferred_channel_short_circuits() {
        let selector = ChannelSelector::default();

        for preferred in Channel::ALL {
            let profile = Scripted::new(preferred, Channel::ALL.to_vec());
            assert_eq!(selector.select_channel(&profile).unwrap(), preferred);
            assert_eq!(*profile.calls.borrow(), vec![preferred]);
        }
    }

    #[test]
    fn test_fallback_walks_full_order() {
        let selector = ChannelSelector::default();
        let profile = Scripted::new(Channel::Slack, vec![Channel::Sms]);

        assert_eq!(selector.select_channel(&profile).unwrap(), Channel::Sms);
        assert_eq!(
            *profile.calls.borrow(),
            vec![Channel::Slack, Channel::Push, Channel::Email, Channel::Sms]
        );
    }

    #[test]
    fn test_first_fallback_match_wins() {
        let selector = ChannelSelector::default();
        let profile = Scripted::new(Channel::Sms, vec![Channel::Email, Channel::Push]);

        assert_eq!(selector.select_channel(&profile).unwrap(), Channel::Push);
    }

    #[test]
    fn test_injected_fallback_order() {
        let order = FallbackOrder::new(vec![Channel::Slack, Channel::Email]).unwrap();
        let selector = ChannelSelector::new(order);
        let all_but_push = vec![Channel::Email, Channel::Slack, Channel::Sms];
        let profile = Scripted::new(Channel::Push, all_but_push);

        assert_eq!(selector.select_channel(&profile).unwrap(), Channel::Slack);
    }

    #[test]
    fn test_partial_order_still_reaches_every_channel() {
        let order = FallbackOrder::new(vec![Channel::Slack, Channel::Email]).unwrap();
        assert_eq!(
            order.channels(),
            &[Channel::Slack, Channel::Email, Channel::Push, Channel::Sms]
        );

        let selector = ChannelSelector::new(order);
        let user = User::new("p@example.com", Channel::Push)
            .with_id("p")
            .with_phone("+15550100");

        assert_eq!(selector.select_channel(&user).unwrap(), Channel::Sms);
    }

    #[test]
    fn test_verified_email_only_prefers_sms() {
        let user = User::new("email.only@example.com", Channel::Sms).verified();
        let selector = ChannelSelector::default();

        assert_eq!(selector.select_channel(&user).unwrap(), Channel::Email);
    }

    #[test]
    fn test_preferred_email_with_push_available() {
        let user = User::new("a@example.com", Channel::Email)
            .verified()
            .with_push_token("push-token-abc123");
        let selector = ChannelSelector::default();

        assert_eq!(selector.select_channel(&user).unwrap(), Channel::Email);
    }

    #[test]
    fn test_no_channel_available() {
        let user = User::new("no.channels@example.com", Channel::Email).with_id("1");
        let selector = ChannelSelector::default();

        let err = selector.select_channel(&user).unwrap_err();
        assert_eq!(err.user_id, "1");
        assert_eq!(err.availability, user.availability());
        assert_eq!(
            err.to_string(),
            "No available notification channel for user 1. Email verified: no, Has phone: no, Has push token: no, Has Slack: no"
        );
    }

    #[test]
    fn test_fallback_order_validation() {
        assert!(FallbackOrder::new(vec![]).is_err());
        assert!(FallbackOrder::new(vec![Channel::Sms, Channel::Sms]).is_err());
        assert!(FallbackOrder::parse("push, fax").is_err());
        assert_eq!(
            FallbackOrder::parse("sms,PUSH").unwrap().channels(),
            &[Channel::Sms, Channel::Push, Channel::Email, Channel::Slack]
        );
        assert_eq!(FallbackOrder::parse("push").unwrap(), FallbackOrder::default());
    }
}
