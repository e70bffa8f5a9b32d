//! Channel backends.
//!
//! Email and SMS deliver through pluggable transports ([`MailTransport`],
//! [`SmsProvider`]); push and Slack calls are simulated according to a
//! [`Simulation`](crate::Simulation).

mod email;
mod push;
mod slack;
mod sms;

pub use email::{EmailNotifier, LogMailTransport, MailTransport, OutgoingEmail};
pub use push::PushNotifier;
pub use slack::SlackNotifier;
pub use sms::{FakeSmsProvider, SmsNotifier, SmsProvider};

use crate::config::Simulation;
use crate::error::TransportError;

/// Stand-in for a remote API call: waits, then fails with the configured odds.
pub(crate) async fn simulate_call(
    simulation: &Simulation,
    backend: &str,
) -> Result<(), TransportError> {
    if !simulation.latency.is_zero() {
        tokio::time::sleep(simulation.latency).await;
    }
    if simulation.failure_rate > 0.0 && rand::random::<f64>() < simulation.failure_rate {
        return Err(TransportError::Unavailable(format!("simulated {backend} failure")));
    }
    Ok(())
}

/// First `max` characters of `value`.
pub(crate) fn prefix(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

/// Shortened form of a secret or token for log lines.
pub(crate) fn masked(value: &str, visible: usize) -> String {
    format!("{}...", prefix(value, visible))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_prefix_is_char_safe() {
        assert_eq!(prefix("hello", 3), "hel");
        assert_eq!(prefix("hi", 10), "hi");
        assert_eq!(prefix("héllo", 2), "hé");
        assert_eq!(masked("push-token-abc123-very-long", 10), "push-token...");
    }

    #[tokio::test]
    async fn test_simulate_call_outcomes() {
        assert!(simulate_call(&Simulation::instant(), "push").await.is_ok());

        let err = simulate_call(&Simulation::failing(), "slack")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TransportError::Unavailable("simulated slack failure".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulate_call_waits_for_latency() {
        let started = tokio::time::Instant::now();
        simulate_call(&Simulation::new(Duration::from_millis(80), 0.0), "slack")
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(80));
    }
}
