//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TRIGGER_THRESHOLD: u32 = 3;
pub const DEFAULT_RELEASE_THRESHOLD: u32 = 10;

/// Root configuration for the breaker simulator.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Breaker name and thresholds.
    pub breaker: BreakerConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct BreakerConfig {
    /// Name used in logs and rejection errors. Required when the breaker
    /// has no fallback.
    pub name: Option<String>,

    /// Failure score at which the breaker opens.
    pub trigger_threshold: u32,

    /// Calls routed to the fallback before the primary is probed again.
    pub release_threshold: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            name: None,
            trigger_threshold: DEFAULT_TRIGGER_THRESHOLD,
            release_threshold: DEFAULT_RELEASE_THRESHOLD,
        }
    }
}

impl BreakerConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
