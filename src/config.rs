//! Engine configuration.
//!
//! [`EngineConfig::default`] yields the canonical parameter set. Only the
//! lockout, watchdog and sequence-timeout limits are tunable; the debounce
//! thresholds of the individual detectors are fixed.

use serde::{Deserialize, Serialize};

use crate::constants::{
    LOCKOUT_OCCURRENCES, SEQUENCE_CHARGING_LIMIT, SEQUENCE_SHORT_STATE_LIMIT,
    WATCHDOG_MAX_ACCUMULATED_DELAY, WATCHDOG_MAX_SINGLE_GAP,
};
use crate::error::ConfigError;

/// Heartbeat monitor limits for the watchdog detector (0x0A).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// A cycle gap strictly greater than this confirms immediately.
    pub max_single_gap: i64,
    /// Accumulated delay at which the fault confirms.
    pub max_accumulated_delay: u32,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            max_single_gap: WATCHDOG_MAX_SINGLE_GAP,
            max_accumulated_delay: WATCHDOG_MAX_ACCUMULATED_DELAY,
        }
    }
}

/// Dwell limits for the sequence timeout detector (0x0B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceTimeoutConfig {
    /// INIT, WAIT, FAULT and RESET time out once dwell reaches this many cycles.
    pub short_state_limit: u32,
    /// CHARGING times out once dwell exceeds this many cycles.
    pub charging_limit: u32,
}

impl Default for SequenceTimeoutConfig {
    fn default() -> Self {
        Self {
            short_state_limit: SEQUENCE_SHORT_STATE_LIMIT,
            charging_limit: SEQUENCE_CHARGING_LIMIT,
        }
    }
}

/// Configuration for a [`DiagnosisEngine`](crate::engine::DiagnosisEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Confirm entries of a latching fault (0x03, 0x06, 0x0B) that lock the system out.
    pub lockout_occurrences: u8,
    pub watchdog: WatchdogConfig,
    pub sequence_timeout: SequenceTimeoutConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lockout_occurrences: LOCKOUT_OCCURRENCES,
            watchdog: WatchdogConfig::default(),
            sequence_timeout: SequenceTimeoutConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// Missing fields take their canonical default.
    ///
    /// # Errors
    /// - [`ConfigError::Parse`] - Malformed JSON or wrong field types
    /// - [`ConfigError::InvalidValue`] - A limit is out of range
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every limit is usable.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidValue`] - A threshold is zero or negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lockout_occurrences == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lockout_occurrences",
                description: "must be at least 1".to_string(),
            });
        }
        if self.watchdog.max_single_gap < 1 {
            return Err(ConfigError::InvalidValue {
                field: "watchdog.max_single_gap",
                description: format!("must be at least 1, got {}", self.watchdog.max_single_gap),
            });
        }
        if self.watchdog.max_accumulated_delay == 0 {
            return Err(ConfigError::InvalidValue {
                field: "watchdog.max_accumulated_delay",
                description: "must be at least 1".to_string(),
            });
        }
        if self.sequence_timeout.short_state_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sequence_timeout.short_state_limit",
                description: "must be at least 1".to_string(),
            });
        }
        if self.sequence_timeout.charging_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sequence_timeout.charging_limit",
                description: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_canonical() {
        let config = EngineConfig::default();
        assert_eq!(config.lockout_occurrences, 3);
        assert_eq!(config.watchdog.max_single_gap, 10);
        assert_eq!(config.watchdog.max_accumulated_delay, 10);
        assert_eq!(config.sequence_timeout.short_state_limit, 10);
        assert_eq!(config.sequence_timeout.charging_limit, 3600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"sequence_timeout": {"charging_limit": 120}}"#)
                .unwrap();
        assert_eq!(config.sequence_timeout.charging_limit, 120);
        assert_eq!(config.sequence_timeout.short_state_limit, 10);
        assert_eq!(config.lockout_occurrences, 3);
    }

    #[test]
    fn rejects_zero_lockout() {
        let err = EngineConfig::from_json_str(r#"{"lockout_occurrences": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "lockout_occurrences",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_positive_watchdog_gap() {
        let config = EngineConfig {
            watchdog: WatchdogConfig {
                max_single_gap: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = EngineConfig::from_json_str("{ lockout").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn json_roundtrip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }
}
