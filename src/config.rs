//! Resolution configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rounding::{AFTERNOON_HOUR, EVENING_HOUR, MIDNIGHT_HOUR, MORNING_HOUR};

/// Anchor hours and defaults shared across resolution.
///
/// The anchors feed part-of-day mentions ("tomorrow morning", "tonight");
/// the default duration closes spans that never received a usable end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Hour applied to "morning" mentions.
    pub morning_hour: u32,
    /// Hour applied to "afternoon" mentions.
    pub afternoon_hour: u32,
    /// Hour applied to "evening", "night", and "tonight" mentions.
    pub evening_hour: u32,
    /// Midnight anchor; 24 rolls to the start of the next day.
    pub midnight_hour: u32,
    /// Span length, in minutes, when no usable end is found.
    pub default_duration_minutes: i64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            morning_hour: MORNING_HOUR,
            afternoon_hour: AFTERNOON_HOUR,
            evening_hour: EVENING_HOUR,
            midnight_hour: MIDNIGHT_HOUR,
            default_duration_minutes: 60,
        }
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for hour in [
            self.morning_hour,
            self.afternoon_hour,
            self.evening_hour,
            self.midnight_hour,
        ] {
            if hour > 24 {
                return Err(ConfigError::AnchorOutOfRange { hour });
            }
        }
        if self.default_duration_minutes <= 0 {
            return Err(ConfigError::NonPositiveDuration {
                minutes: self.default_duration_minutes,
            });
        }
        Ok(())
    }
}

/// Invalid resolver configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("anchor hour {hour} is out of range (expected 0-24)")]
    AnchorOutOfRange { hour: u32 },

    #[error("default duration of {minutes} minutes is not positive")]
    NonPositiveDuration { minutes: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ResolverConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_anchor() {
        let config = ResolverConfig {
            evening_hour: 25,
            ..ResolverConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::AnchorOutOfRange { hour: 25 })
        );
    }

    #[test]
    fn rejects_non_positive_duration() {
        let config = ResolverConfig {
            default_duration_minutes: 0,
            ..ResolverConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveDuration { minutes: 0 })
        );
    }
}
