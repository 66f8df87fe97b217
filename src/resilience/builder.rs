//! Breaker construction.
//!
//! The builder is shared by [`CircuitBreaker`](crate::resilience::CircuitBreaker)
//! and [`AsyncCircuitBreaker`](crate::resilience::AsyncCircuitBreaker); each
//! adds its own `fallback` and `build` methods for its operation type.

use crate::config::BreakerConfig;
use crate::config::schema::{DEFAULT_RELEASE_THRESHOLD, DEFAULT_TRIGGER_THRESHOLD};
use crate::resilience::shared::BreakerCore;
use crate::resilience::types::ConfigurationError;

/// Builder for a breaker over operations of type `O`.
pub struct BreakerBuilder<O> {
    pub(crate) primary: O,
    pub(crate) fallback: Option<O>,
    name: Option<String>,
    trigger_threshold: u32,
    release_threshold: u32,
}

impl<O> BreakerBuilder<O> {
    pub(crate) fn with_primary(primary: O) -> Self {
        Self {
            primary,
            fallback: None,
            name: None,
            trigger_threshold: DEFAULT_TRIGGER_THRESHOLD,
            release_threshold: DEFAULT_RELEASE_THRESHOLD,
        }
    }

    /// Name used in logs and in rejection errors.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Failure score at which the breaker opens (default 3).
    pub fn trigger_threshold(mut self, threshold: u32) -> Self {
        self.trigger_threshold = threshold;
        self
    }

    /// Number of calls routed to the fallback before the primary is
    /// probed again (default 10).
    pub fn release_threshold(mut self, threshold: u32) -> Self {
        self.release_threshold = threshold;
        self
    }

    /// Apply name and thresholds from a loaded configuration.
    pub fn config(mut self, config: &BreakerConfig) -> Self {
        if let Some(name) = &config.name {
            self.name = Some(name.clone());
        }
        self.trigger_threshold = config.trigger_threshold;
        self.release_threshold = config.release_threshold;
        self
    }

    /// Validate settings and split into operations plus core state.
    pub(crate) fn finish(self) -> Result<(O, Option<O>, BreakerCore), ConfigurationError> {
        if self.fallback.is_none() && self.name.is_none() {
            return Err(ConfigurationError::MissingName);
        }
        if self.trigger_threshold == 0 {
            return Err(ConfigurationError::ZeroThreshold {
                field: "trigger_threshold",
            });
        }
        if self.release_threshold == 0 {
            return Err(ConfigurationError::ZeroThreshold {
                field: "release_threshold",
            });
        }

        let core = BreakerCore::new(
            self.name,
            self.fallback.is_some(),
            self.trigger_threshold,
            self.release_threshold,
        );
        Ok((self.primary, self.fallback, core))
    }
}
