//! Session configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ReplayError, Result, SerializationError};

/// Tunables for a [`Session`](crate::session::Session) and its scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Auto-play delay used when the caller does not pass one.
    #[serde(default = "default_delay_ms")]
    pub default_delay_ms: u64,

    /// Capacity of the command channel between handles and the session task.
    #[serde(default = "default_command_capacity")]
    pub command_capacity: usize,

    /// Seed for the random graph generator. `None` draws from entropy.
    #[serde(default)]
    pub generator_seed: Option<u64>,
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_command_capacity() -> usize {
    64
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_delay_ms: default_delay_ms(),
            command_capacity: default_command_capacity(),
            generator_seed: None,
        }
    }
}

impl SessionConfig {
    /// Parse a config from JSON and check it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(SerializationError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scheduler cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.default_delay_ms == 0 {
            return Err(ReplayError::InvalidDelay(0));
        }
        if self.command_capacity == 0 {
            return Err(ReplayError::InvalidConfig(
                "command_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The default delay as a [`Duration`].
    pub fn default_delay(&self) -> Duration {
        Duration::from_millis(self.default_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = SessionConfig::from_json("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.default_delay(), Duration::from_secs(1));
    }

    #[test]
    fn overrides() {
        let config =
            SessionConfig::from_json(r#"{"default_delay_ms": 250, "generator_seed": 9}"#).unwrap();
        assert_eq!(config.default_delay_ms, 250);
        assert_eq!(config.generator_seed, Some(9));
        assert_eq!(config.command_capacity, 64);
    }

    #[test]
    fn rejects_zero_delay_and_unknown_keys() {
        assert!(matches!(
            SessionConfig::from_json(r#"{"default_delay_ms": 0}"#),
            Err(ReplayError::InvalidDelay(0))
        ));
        assert!(matches!(
            SessionConfig::from_json(r#"{"delay": 5}"#),
            Err(ReplayError::Serialization(SerializationError::Json(_)))
        ));
    }

    #[test]
    fn rejects_zero_capacity_as_config_error() {
        let err = SessionConfig::from_json(r#"{"command_capacity": 0}"#).unwrap_err();
        assert!(matches!(err, ReplayError::InvalidConfig(_)));
        assert_eq!(err.to_string(), "invalid config: command_capacity must be positive");
    }
}
