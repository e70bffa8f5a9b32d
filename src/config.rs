//! Configuration for the dispatch core and its backends.
//!
//! Backends hold only configuration, so the whole notifier set is built eagerly
//! from one [`NotifyConfig`] at startup.

use std::time::Duration;

use crate::error::ConfigError;
use crate::selector::FallbackOrder;

/// Base trait for configuration types.
///
/// # Example
///
/// ```rust
/// use notifyhub::{Config, ConfigError};
///
/// #[derive(Debug, Clone)]
/// struct GatewayConfig {
///     max_body: usize,
/// }
///
/// impl Config for GatewayConfig {
///     fn name(&self) -> &str {
///         "gateway"
///     }
///
///     fn validate(&self) -> Result<(), ConfigError> {
///         if self.max_body == 0 {
///             return Err(ConfigError::InvalidValue {
///                 key: "max_body".to_string(),
///                 message: "must be greater than 0".to_string(),
///             });
///         }
///         Ok(())
///     }
/// }
///
/// assert!(GatewayConfig { max_body: 0 }.validate().is_err());
/// ```
pub trait Config: Send + Sync {
    /// Returns the configuration name/identifier.
    fn name(&self) -> &str {
        "default"
    }

    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Latency and failure injection for simulated backends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulation {
    /// Delay before the simulated call returns
    pub latency: Duration,
    /// Probability in `[0, 1]` that a call fails
    pub failure_rate: f64,
}

impl Simulation {
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate,
        }
    }

    /// No delay, never fails.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, 0.0)
    }

    /// No delay, always fails.
    pub fn failing() -> Self {
        Self::new(Duration::ZERO, 1.0)
    }

    fn validate(&self, key: &str) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(ConfigError::invalid(
                key,
                format!("failure rate {} outside [0, 1]", self.failure_rate),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Configuration name
    pub name: String,
    /// Sender address for email
    pub from_email: String,
    /// Key handed to the SMS provider
    pub sms_api_key: String,
    /// Channel order tried when the preferred channel is unavailable
    pub fallback_order: FallbackOrder,
    pub sms: Simulation,
    pub push: Simulation,
    pub slack: Simulation,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            name: "notifyhub".to_string(),
            from_email: "notifications@notifyhub.com".to_string(),
            sms_api_key: String::new(),
            fallback_order: FallbackOrder::default(),
            sms: Simulation::new(Duration::from_millis(100), 0.05),
            push: Simulation::new(Duration::from_millis(50), 0.0),
            slack: Simulation::new(Duration::from_millis(80), 0.0),
        }
    }
}

impl NotifyConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `NOTIFY_*` environment variables, defaulting what is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(from) = lookup("NOTIFY_FROM_EMAIL") {
            config.from_email = from;
        }
        if let Some(key) = lookup("NOTIFY_SMS_API_KEY") {
            config.sms_api_key = key;
        }
        if let Some(rate) = lookup("NOTIFY_SMS_FAILURE_RATE") {
            config.sms.failure_rate = rate.trim().parse().map_err(|e| {
                ConfigError::invalid("NOTIFY_SMS_FAILURE_RATE", format!("{e}"))
            })?;
        }
        if let Some(order) = lookup("NOTIFY_FALLBACK_ORDER") {
            config.fallback_order = FallbackOrder::parse(&order)?;
        }
        if let Some(ms) = lookup("NOTIFY_SIMULATED_LATENCY_MS") {
            let ms: u64 = ms.trim().parse().map_err(|e| {
                ConfigError::invalid("NOTIFY_SIMULATED_LATENCY_MS", format!("{e}"))
            })?;
            config = config.with_simulated_latency(Duration::from_millis(ms));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_from_email(mut self, from: impl Into<String>) -> Self {
        self.from_email = from.into();
        self
    }

    pub fn with_sms_api_key(mut self, key: impl Into<String>) -> Self {
        self.sms_api_key = key.into();
        self
    }

    pub fn with_fallback_order(mut self, order: FallbackOrder) -> Self {
        self.fallback_order = order;
        self
    }

    pub fn with_sms(mut self, simulation: Simulation) -> Self {
        self.sms = simulation;
        self
    }

    pub fn with_push(mut self, simulation: Simulation) -> Self {
        self.push = simulation;
        self
    }

    pub fn with_slack(mut self, simulation: Simulation) -> Self {
        self.slack = simulation;
        self
    }

    /// Same latency for every simulated backend.
    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.sms.latency = latency;
        self.push.latency = latency;
        self.slack.latency = latency;
        self
    }

    /// Zero latency and no injected failures; for tests and demos.
    pub fn deterministic() -> Self {
        Self::default()
            .with_sms(Simulation::instant())
            .with_push(Simulation::instant())
            .with_slack(Simulation::instant())
    }
}

impl Config for NotifyConfig {
    fn name(&self) -> &str {
        if self.name.is_empty() {
            "default"
        } else {
            &self.name
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.from_email.contains('@') {
            return Err(ConfigError::invalid(
                "from_email",
                format!("{:?} is not an email address", self.from_email),
            ));
        }
        self.sms.validate("sms.failure_rate")?;
        self.push.validate("push.failure_rate")?;
        self.slack.validate("slack.failure_rate")?;
        Ok(())
    }
}
