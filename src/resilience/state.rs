//! Breaker state machine.
//!
//! # States
//! - Closed: calls go to the primary operation, failures are scored
//! - Open: calls go to the fallback, each one is counted
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure_score >= trigger_threshold
//! Open → Closed: fallback_probe_count > release_threshold
//!                (the call that crosses it is serviced by the primary)
//! ```
//!
//! # Design Decisions
//! - Failure score decays by one per success instead of using a window
//! - Open mode is bounded by call volume, not by fallback health
//! - Counters reset on every transition
//! - No I/O here; callers hold the state behind a single mutex

use crate::resilience::types::{BreakerMode, BreakerSnapshot};

/// Path chosen for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Closed breaker, normal primary call.
    Primary,
    /// Open breaker, release threshold exceeded: the breaker has just closed
    /// and this call tests the primary.
    Probe,
    /// Open breaker, call belongs to the fallback.
    Fallback,
}

impl Route {
    /// Return true if the primary operation services this call.
    pub fn uses_primary(self) -> bool {
        !matches!(self, Route::Fallback)
    }
}

/// Mode and counters of one breaker.
#[derive(Debug, Clone)]
pub struct BreakerState {
    mode: BreakerMode,
    failure_score: u32,
    fallback_probe_count: u32,
    trigger_threshold: u32,
    release_threshold: u32,
}

impl BreakerState {
    /// Create a closed state with both counters at zero.
    pub fn new(trigger_threshold: u32, release_threshold: u32) -> Self {
        Self {
            mode: BreakerMode::Closed,
            failure_score: 0,
            fallback_probe_count: 0,
            trigger_threshold,
            release_threshold,
        }
    }

    pub fn mode(&self) -> BreakerMode {
        self.mode
    }

    pub fn failure_score(&self) -> u32 {
        self.failure_score
    }

    pub fn fallback_probe_count(&self) -> u32 {
        self.fallback_probe_count
    }

    /// Decide where the next call goes, applying the Open → Closed
    /// transition when the release threshold is exceeded.
    pub fn admit(&mut self) -> Route {
        match self.mode {
            BreakerMode::Closed => Route::Primary,
            BreakerMode::Open => {
                // Compare before counting so the counter never passes
                // release_threshold, even at u32::MAX.
                if self.fallback_probe_count < self.release_threshold {
                    self.fallback_probe_count += 1;
                    Route::Fallback
                } else {
                    self.close();
                    Route::Probe
                }
            }
        }
    }

    #[cfg(test)]
    fn set_fallback_probe_count(&mut self, count: u32) {
        self.fallback_probe_count = count;
    }

    /// Record a primary success.
    pub fn record_success(&mut self) {
        if self.mode == BreakerMode::Closed && self.failure_score > 0 {
            self.failure_score -= 1;
        }
    }

    /// Record a primary failure. Returns true if this failure tripped the
    /// breaker open.
    pub fn record_failure(&mut self) -> bool {
        if self.mode != BreakerMode::Closed {
            // Another caller already tripped the breaker.
            return false;
        }

        self.failure_score += 1;
        if self.failure_score >= self.trigger_threshold {
            self.open();
            return true;
        }
        false
    }

    /// Force the breaker open.
    pub fn trip(&mut self) {
        self.open();
    }

    /// Force the breaker closed.
    pub fn reset(&mut self) {
        self.close();
    }

    /// Build a diagnostic view of this state.
    pub fn snapshot(&self, name: Option<&str>, has_fallback: bool) -> BreakerSnapshot {
        BreakerSnapshot {
            name: name.map(str::to_string),
            mode: self.mode,
            failure_score: self.failure_score,
            fallback_probe_count: self.fallback_probe_count,
            trigger_threshold: self.trigger_threshold,
            release_threshold: self.release_threshold,
            has_fallback,
        }
    }

    fn open(&mut self) {
        self.mode = BreakerMode::Open;
        self.failure_score = 0;
        self.fallback_probe_count = 0;
    }

    fn close(&mut self) {
        self.mode = BreakerMode::Closed;
        self.failure_score = 0;
        self.fallback_probe_count = 0;
    }
}
