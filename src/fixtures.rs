//! Reference users covering every channel configuration.
//!
//! Handy for seeding an [`InMemoryUserStore`](crate::InMemoryUserStore) in
//! demos and integration tests.

use crate::channel::Channel;
use crate::model::User;

pub const ALL_CHANNELS: &str = "user-all-channels";
pub const EMAIL_ONLY: &str = "user-email-only";
pub const SMS_ONLY: &str = "user-sms-only";
pub const PUSH_ONLY: &str = "user-push-only";
pub const SLACK_ONLY: &str = "user-slack-only";
pub const SMS_WITH_EMAIL_FALLBACK: &str = "user-sms-email-fallback";
pub const PUSH_PREFERRED_EMAIL_ONLY: &str = "user-push-preferred-email-only";
pub const NO_CHANNELS: &str = "user-no-channels";

/// The eight reference users, with stable ids.
pub fn demo_users() -> Vec<User> {
    vec![
        User::new("all.channels@example.com", Channel::Email)
            .with_id(ALL_CHANNELS)
            .verified()
            .with_phone("+33612345678")
            .with_push_token("push-token-abc123")
            .with_slack_user_id("U123ABC"),
        User::new("email.only@example.com", Channel::Email)
            .with_id(EMAIL_ONLY)
            .verified(),
        User::new("sms.only@example.com", Channel::Sms)
            .with_id(SMS_ONLY)
            .with_phone("+33698765432"),
        User::new("push.only@example.com", Channel::Push)
            .with_id(PUSH_ONLY)
            .with_push_token("push-token-xyz789"),
        User::new("slack.only@example.com", Channel::Slack)
            .with_id(SLACK_ONLY)
            .with_slack_user_id("U456DEF"),
        User::new("sms.with.fallback@example.com", Channel::Sms)
            .with_id(SMS_WITH_EMAIL_FALLBACK)
            .verified()
            .with_phone("+33611223344"),
        User::new("push.prefer.but.email@example.com", Channel::Push)
            .with_id(PUSH_PREFERRED_EMAIL_ONLY)
            .verified(),
        User::new("no.channels@example.com", Channel::Email).with_id(NO_CHANNELS),
    ]
}
