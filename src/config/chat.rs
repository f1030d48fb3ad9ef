//! Chat configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::{BusyPolicy, ChatControllerConfig};

/// Chat session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Delay between reveal frames in milliseconds
    #[serde(default = "default_reveal_interval")]
    pub reveal_interval_ms: u64,

    /// Handling of sends issued while a turn is in flight
    #[serde(default)]
    pub busy_policy: BusyPolicy,

    /// Sends that may wait behind the running turn when queueing
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl ChatConfig {
    /// Controller settings
    pub fn controller_config(&self) -> ChatControllerConfig {
        ChatControllerConfig::default()
            .with_reveal_interval(Duration::from_millis(self.reveal_interval_ms))
            .with_busy_policy(self.busy_policy)
            .with_queue_capacity(self.queue_capacity)
    }

    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=1000).contains(&self.reveal_interval_ms) {
            return Err(ValidationError::InvalidRevealInterval);
        }
        if self.queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reveal_interval_ms: default_reveal_interval(),
            busy_policy: BusyPolicy::default(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_reveal_interval() -> u64 {
    15
}

fn default_queue_capacity() -> usize {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_config_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.reveal_interval_ms, 15);
        assert_eq!(config.busy_policy, BusyPolicy::Reject);
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.controller_config(), ChatControllerConfig::default());
    }

    #[test]
    fn test_controller_config_mapping() {
        let config = ChatConfig {
            reveal_interval_ms: 40,
            busy_policy: BusyPolicy::Queue,
            queue_capacity: 3,
        };
        let controller = config.controller_config();
        assert_eq!(controller.reveal_interval, Duration::from_millis(40));
        assert_eq!(controller.busy_policy, BusyPolicy::Queue);
        assert_eq!(controller.queue_capacity, 3);
    }

    #[test]
    fn test_validation_reveal_interval_bounds() {
        let config = ChatConfig {
            reveal_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRevealInterval));

        let config = ChatConfig {
            reveal_interval_ms: 1001,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRevealInterval));

        let config = ChatConfig {
            reveal_interval_ms: 1000,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_queue_capacity() {
        let config = ChatConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidQueueCapacity));
    }
}
