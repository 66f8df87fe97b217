//! Breaker modes, diagnostics and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which path a breaker currently routes calls to.
///
/// `Closed` means the primary operation is in use. `Open` means calls go to
/// the fallback (or are rejected when no fallback is configured).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerMode {
    /// Primary path active.
    Closed,
    /// Fallback path active.
    Open,
}

impl std::fmt::Display for BreakerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => f.pad("closed"),
            Self::Open => f.pad("open"),
        }
    }
}

/// Errors returned by `invoke`.
///
/// Failures of the wrapped operations are carried unchanged in
/// [`BreakerError::Operation`]; the only failure the breaker originates
/// itself is [`BreakerError::Open`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BreakerError<E> {
    /// Breaker is open and has no fallback to run instead.
    #[error("circuit breaker '{name}' is currently open")]
    Open { name: String },

    /// The primary or fallback operation failed.
    #[error("{0}")]
    Operation(E),
}

impl<E> BreakerError<E> {
    /// Return true if the call was rejected by an open breaker.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Borrow the wrapped operation's failure, if any.
    pub fn operation(&self) -> Option<&E> {
        match self {
            Self::Operation(e) => Some(e),
            Self::Open { .. } => None,
        }
    }

    /// Take the wrapped operation's failure, if any.
    pub fn into_operation(self) -> Option<E> {
        match self {
            Self::Operation(e) => Some(e),
            Self::Open { .. } => None,
        }
    }
}

/// Errors raised while constructing a breaker.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Without a fallback the breaker needs a name to report rejections.
    #[error("a circuit breaker without a fallback must have a name")]
    MissingName,

    /// Thresholds must be positive.
    #[error("{field} must be greater than zero")]
    ZeroThreshold { field: &'static str },
}

/// Point-in-time view of a breaker, for logs and admin output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerSnapshot {
    pub name: Option<String>,
    pub mode: BreakerMode,
    /// Live only while closed.
    pub failure_score: u32,
    /// Live only while open.
    pub fallback_probe_count: u32,
    pub trigger_threshold: u32,
    pub release_threshold: u32,
    pub has_fallback: bool,
}
