#![forbid(unsafe_code)]

//! Configuration for [`ObservationBridge`](crate::ObservationBridge).
//!
//! Defaults reproduce the simplest correct behavior: tear down and recreate
//! the forwarding subscription on every recompute, and never emit on the
//! relay from inside `recompute()` itself.
//!
//! Environment overrides (all optional):
//!
//! | Variable                                  | Values                                        |
//! |-------------------------------------------|-----------------------------------------------|
//! | `OBSERVED_OPTIONAL_RESUBSCRIBE`           | `always`, `on-identity-change` (`on-change`)  |
//! | `OBSERVED_OPTIONAL_ANNOUNCE_REPLACEMENT`  | `1/true/yes/on`, `0/false/no/off`             |

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Environment variable selecting the [`ResubscribePolicy`].
pub const ENV_RESUBSCRIBE: &str = "OBSERVED_OPTIONAL_RESUBSCRIBE";
/// Environment variable toggling [`BridgeConfig::announce_replacement`].
pub const ENV_ANNOUNCE_REPLACEMENT: &str = "OBSERVED_OPTIONAL_ANNOUNCE_REPLACEMENT";

/// When the bridge replaces its forwarding subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResubscribePolicy {
    /// Cancel and recreate on every recompute, even for the same object.
    #[default]
    Always,
    /// Keep the live subscription while the observed identity is unchanged.
    OnIdentityChange,
}

impl ResubscribePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::OnIdentityChange => "on-identity-change",
        }
    }
}

impl fmt::Display for ResubscribePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResubscribePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "on-identity-change" | "on-change" => Ok(Self::OnIdentityChange),
            _ => Err(Error::invalid_policy(s)),
        }
    }
}

/// Configuration for the observation bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeConfig {
    /// When to replace the forwarding subscription.
    pub resubscribe: ResubscribePolicy,
    /// Emit one relay notification when the observed identity changes
    /// between recomputes.
    pub announce_replacement: bool,
}

impl BridgeConfig {
    /// Keep subscriptions alive across recomputes of the same object.
    #[must_use]
    pub fn on_identity_change() -> Self {
        Self {
            resubscribe: ResubscribePolicy::OnIdentityChange,
            ..Default::default()
        }
    }

    /// Set the resubscribe policy.
    #[must_use]
    pub fn with_resubscribe(mut self, policy: ResubscribePolicy) -> Self {
        self.resubscribe = policy;
        self
    }

    /// Enable or disable replacement announcements.
    #[must_use]
    pub fn with_announce_replacement(mut self, enabled: bool) -> Self {
        self.announce_replacement = enabled;
        self
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by a custom environment lookup.
    pub fn from_env_with<F>(get_env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = get_env(ENV_RESUBSCRIBE) {
            config.resubscribe = value.parse()?;
        }
        if let Some(value) = get_env(ENV_ANNOUNCE_REPLACEMENT) {
            config.announce_replacement = parse_flag(ENV_ANNOUNCE_REPLACEMENT, &value)?;
        }
        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::invalid_flag(key, value)),
    }
}
