//! Circuit breaker with a fallback path.
//!
//! # States
//! - Closed: calls go to the primary operation
//! - Open: calls go to the fallback operation, or are rejected if there is none
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure score reaches trigger_threshold
//! Open → Closed: call number release_threshold + 1 since opening,
//!                which is itself serviced by the primary
//! ```
//!
//! # Design Decisions
//! - Failures are never swallowed; the caller always sees the original error
//! - Fallback outcomes never count towards either threshold
//! - Rejection is only possible when no fallback is configured
//! - Operations run outside the state lock

use std::sync::Arc;

use crate::config::BreakerConfig;
use crate::resilience::builder::BreakerBuilder;
use crate::resilience::shared::BreakerCore;
use crate::resilience::types::{BreakerError, BreakerMode, BreakerSnapshot, ConfigurationError};

/// A synchronous operation the breaker can call.
pub type Operation<A, T, E> = Arc<dyn Fn(A) -> Result<T, E> + Send + Sync>;

/// Breaker around a synchronous primary operation and optional fallback.
///
/// `A` is the argument passed through to whichever operation runs; use a
/// tuple for several arguments.
///
/// # Example
///
/// ```
/// use fallback_breaker::resilience::{BreakerError, BreakerMode, CircuitBreaker};
///
/// let breaker = CircuitBreaker::builder(|_: ()| Err::<u32, _>("down"))
///     .name("pricing")
///     .trigger_threshold(2)
///     .build()
///     .unwrap();
///
/// assert_eq!(breaker.invoke(()), Err(BreakerError::Operation("down")));
/// assert_eq!(breaker.invoke(()), Err(BreakerError::Operation("down")));
/// assert_eq!(breaker.mode(), BreakerMode::Open);
/// assert!(breaker.invoke(()).unwrap_err().is_open());
/// ```
pub struct CircuitBreaker<A, T, E> {
    primary: Operation<A, T, E>,
    fallback: Option<Operation<A, T, E>>,
    core: BreakerCore,
}

impl<A, T, E> CircuitBreaker<A, T, E> {
    /// Start building a breaker around `primary`.
    pub fn builder<P>(primary: P) -> BreakerBuilder<Operation<A, T, E>>
    where
        P: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        BreakerBuilder::with_primary(Arc::new(primary))
    }

    /// Create a breaker without a fallback. `config.name` must be set.
    pub fn new<P>(primary: P, config: &BreakerConfig) -> Result<Self, ConfigurationError>
    where
        P: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        Self::builder(primary).config(config).build()
    }

    /// Create a breaker that routes to `fallback` while open.
    pub fn with_fallback<P, F>(
        primary: P,
        fallback: F,
        config: &BreakerConfig,
    ) -> Result<Self, ConfigurationError>
    where
        P: Fn(A) -> Result<T, E> + Send + Sync + 'static,
        F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        Self::builder(primary).fallback(fallback).config(config).build()
    }

    /// Call through the breaker.
    pub fn invoke(&self, args: A) -> Result<T, BreakerError<E>> {
        if self.core.admit().uses_primary() {
            self.call_primary(args)
        } else {
            self.call_fallback(args)
        }
    }

    fn call_primary(&self, args: A) -> Result<T, BreakerError<E>> {
        match (self.primary)(args) {
            Ok(value) => {
                self.core.on_success();
                Ok(value)
            }
            Err(e) => {
                self.core.on_failure();
                Err(BreakerError::Operation(e))
            }
        }
    }

    fn call_fallback(&self, args: A) -> Result<T, BreakerError<E>> {
        match &self.fallback {
            Some(fallback) => fallback(args).map_err(BreakerError::Operation),
            None => Err(self.core.rejection()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.core.name()
    }

    pub fn has_fallback(&self) -> bool {
        self.core.has_fallback()
    }

    pub fn mode(&self) -> BreakerMode {
        self.core.mode()
    }

    /// Current mode and counters.
    pub fn snapshot(&self) -> BreakerSnapshot {
        self.core.snapshot()
    }

    /// Force the breaker open, zeroing both counters.
    pub fn trip(&self) {
        self.core.trip();
    }

    /// Force the breaker closed, zeroing both counters.
    pub fn reset(&self) {
        self.core.reset();
    }
}

impl<A, T, E> std::fmt::Debug for CircuitBreaker<A, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<A, T, E> BreakerBuilder<Operation<A, T, E>> {
    /// Operation to run while the breaker is open.
    pub fn fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    /// Build the breaker. Fails if there is neither a fallback nor a name,
    /// or if a threshold is zero.
    pub fn build(self) -> Result<CircuitBreaker<A, T, E>, ConfigurationError> {
        let (primary, fallback, core) = self.finish()?;
        Ok(CircuitBreaker {
            primary,
            fallback,
            core,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn failing(_: ()) -> Result<&'static str, &'static str> {
        Err("boom")
    }

    fn succeeding(_: ()) -> Result<&'static str, &'static str> {
        Ok("ok")
    }

    #[test]
    fn test_construction_requires_name_or_fallback() {
        let result = CircuitBreaker::builder(succeeding).build();
        assert!(matches!(result, Err(ConfigurationError::MissingName)));

        assert!(CircuitBreaker::builder(succeeding).name("svc").build().is_ok());
        assert!(CircuitBreaker::builder(succeeding)
            .fallback(succeeding)
            .build()
            .is_ok());
    }

    #[test]
    fn test_new_from_config() {
        let config = BreakerConfig::named("svc");
        let breaker = CircuitBreaker::new(succeeding, &config).unwrap();
        assert_eq!(breaker.name(), Some("svc"));
        assert!(!breaker.has_fallback());

        let unnamed = BreakerConfig::default();
        assert!(CircuitBreaker::new(succeeding, &unnamed).is_err());

        let with_fallback = CircuitBreaker::with_fallback(failing, succeeding, &unnamed).unwrap();
        assert!(with_fallback.has_fallback());
        assert_eq!(with_fallback.name(), None);
    }

    #[test]
    fn test_three_failures_open_breaker() {
        let breaker = CircuitBreaker::builder(failing).name("svc").build().unwrap();

        for _ in 0..3 {
            assert_eq!(breaker.invoke(()), Err(BreakerError::Operation("boom")));
        }

        let snapshot = breaker.snapshot();
        assert_eq!(snapshot.mode, BreakerMode::Open);
        assert_eq!(snapshot.failure_score, 0);
    }

    #[test]
    fn test_success_decrements_score() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let breaker = CircuitBreaker::builder(move |_: ()| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err("boom")
            } else {
                Ok("ok")
            }
        })
        .name("svc")
        .build()
        .unwrap();

        assert!(breaker.invoke(()).is_err());
        assert!(breaker.invoke(()).is_err());
        assert_eq!(breaker.invoke(()), Ok("ok"));

        let snapshot = breaker.snapshot();
        assert_eq!(snapshot.mode, BreakerMode::Closed);
        assert_eq!(snapshot.failure_score, 1);
    }

    #[test]
    fn test_open_without_fallback_rejects_without_calling_primary() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let breaker = CircuitBreaker::builder(move |_: ()| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>("boom")
        })
        .name("svc")
        .trigger_threshold(2)
        .build()
        .unwrap();

        assert_eq!(breaker.invoke(()), Err(BreakerError::Operation("boom")));
        assert_eq!(breaker.invoke(()), Err(BreakerError::Operation("boom")));
        assert_eq!(breaker.mode(), BreakerMode::Open);

        assert_eq!(
            breaker.invoke(()),
            Err(BreakerError::Open { name: "svc".into() })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_probe_call_uses_primary() {
        let breaker = CircuitBreaker::builder(|_: ()| Ok::<_, &str>("primary"))
            .fallback(|_: ()| Ok("fb"))
            .release_threshold(1)
            .build()
            .unwrap();
        breaker.trip();

        assert_eq!(breaker.invoke(()), Ok("fb"));
        assert_eq!(breaker.mode(), BreakerMode::Open);
        assert_eq!(breaker.invoke(()), Ok("primary"));
        assert_eq!(breaker.mode(), BreakerMode::Closed);
    }

    #[test]
    fn test_arguments_are_forwarded() {
        let breaker = CircuitBreaker::builder(|(a, b): (u32, u32)| Ok::<_, String>(a + b))
            .fallback(|(a, b): (u32, u32)| Ok(a * b))
            .release_threshold(1)
            .build()
            .unwrap();

        assert_eq!(breaker.invoke((2, 3)), Ok(5));
        breaker.trip();
        assert_eq!(breaker.invoke((2, 3)), Ok(6));
    }

    #[test]
    fn test_reset_closes_breaker() {
        let breaker = CircuitBreaker::builder(succeeding).name("svc").build().unwrap();
        breaker.trip();
        assert!(breaker.invoke(()).unwrap_err().is_open());

        breaker.reset();
        assert_eq!(breaker.invoke(()), Ok("ok"));
    }
}
