//! Shared bookkeeping for the sync and async breakers.
//!
//! # Responsibilities
//! - Guard the state machine with a single mutex
//! - Apply each decide or record step as one locked transaction
//! - Log transitions with the breaker name
//!
//! The lock is only held for the state update itself, never while a
//! wrapped operation runs.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::resilience::state::{BreakerState, Route};
use crate::resilience::types::{BreakerError, BreakerMode, BreakerSnapshot};

const UNNAMED: &str = "unnamed";

#[derive(Debug)]
pub(crate) struct BreakerCore {
    name: Option<String>,
    has_fallback: bool,
    trigger_threshold: u32,
    state: Mutex<BreakerState>,
}

impl BreakerCore {
    pub(crate) fn new(
        name: Option<String>,
        has_fallback: bool,
        trigger_threshold: u32,
        release_threshold: u32,
    ) -> Self {
        Self {
            name,
            has_fallback,
            trigger_threshold,
            state: Mutex::new(BreakerState::new(trigger_threshold, release_threshold)),
        }
    }

    pub(crate) fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn has_fallback(&self) -> bool {
        self.has_fallback
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED)
    }

    // State is plain counters, so a panic elsewhere cannot leave it torn.
    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn admit(&self) -> Route {
        let route = self.lock().admit();
        match route {
            Route::Probe => {
                tracing::info!(breaker = %self.label(), "Release threshold exceeded, closing breaker and probing primary");
            }
            Route::Fallback if self.has_fallback => {
                tracing::debug!(breaker = %self.label(), "Breaker open, routing call to fallback");
            }
            Route::Fallback => {
                tracing::debug!(breaker = %self.label(), "Breaker open without fallback, rejecting call");
            }
            Route::Primary => {}
        }
        route
    }

    pub(crate) fn on_success(&self) {
        self.lock().record_success();
    }

    pub(crate) fn on_failure(&self) {
        let (tripped, score) = {
            let mut state = self.lock();
            let tripped = state.record_failure();
            (tripped, state.failure_score())
        };

        if tripped {
            tracing::warn!(
                breaker = %self.label(),
                threshold = self.trigger_threshold,
                "Trigger threshold reached, opening breaker"
            );
        } else {
            tracing::debug!(breaker = %self.label(), failure_score = score, "Primary operation failed");
        }
    }

    pub(crate) fn rejection<E>(&self) -> BreakerError<E> {
        BreakerError::Open {
            name: self.label().to_string(),
        }
    }

    pub(crate) fn mode(&self) -> BreakerMode {
        self.lock().mode()
    }

    pub(crate) fn snapshot(&self) -> BreakerSnapshot {
        self.lock().snapshot(self.name(), self.has_fallback)
    }

    pub(crate) fn trip(&self) {
        self.lock().trip();
        tracing::info!(breaker = %self.label(), "Breaker forced open");
    }

    pub(crate) fn reset(&self) {
        self.lock().reset();
        tracing::info!(breaker = %self.label(), "Breaker reset to closed");
    }
}
