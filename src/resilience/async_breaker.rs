//! Circuit breaker for asynchronous operations.
//!
//! Same routing and counting as [`CircuitBreaker`](super::CircuitBreaker);
//! the wrapped operations return futures. The state lock is released before
//! an operation is awaited, so slow backends never block other callers from
//! reaching a decision.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};

use crate::config::BreakerConfig;
use crate::resilience::builder::BreakerBuilder;
use crate::resilience::shared::BreakerCore;
use crate::resilience::types::{BreakerError, BreakerMode, BreakerSnapshot, ConfigurationError};

/// An asynchronous operation the breaker can call.
pub type AsyncOperation<A, T, E> = Arc<dyn Fn(A) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

fn boxed_operation<A, T, E, P, Fut>(operation: P) -> AsyncOperation<A, T, E>
where
    A: 'static,
    T: 'static,
    E: 'static,
    P: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    Arc::new(move |args| operation(args).boxed())
}

/// Breaker around an async primary operation and optional fallback.
pub struct AsyncCircuitBreaker<A, T, E> {
    primary: AsyncOperation<A, T, E>,
    fallback: Option<AsyncOperation<A, T, E>>,
    core: BreakerCore,
}

impl<A, T, E> AsyncCircuitBreaker<A, T, E>
where
    A: 'static,
    T: 'static,
    E: 'static,
{
    /// Start building a breaker around `primary`.
    pub fn builder<P, Fut>(primary: P) -> BreakerBuilder<AsyncOperation<A, T, E>>
    where
        P: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        BreakerBuilder::with_primary(boxed_operation(primary))
    }

    /// Create a breaker without a fallback. `config.name` must be set.
    pub fn new<P, Fut>(primary: P, config: &BreakerConfig) -> Result<Self, ConfigurationError>
    where
        P: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::builder(primary).config(config).build()
    }

    /// Call through the breaker.
    pub async fn invoke(&self, args: A) -> Result<T, BreakerError<E>> {
        if !self.core.admit().uses_primary() {
            return match &self.fallback {
                Some(fallback) => fallback(args).await.map_err(BreakerError::Operation),
                None => Err(self.core.rejection()),
            };
        }

        match (self.primary)(args).await {
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

    pub fn name(&self) -> Option<&str> {
        self.core.name()
    }

    pub fn has_fallback(&self) -> bool {
        self.core.has_fallback()
    }

    pub fn mode(&self) -> BreakerMode {
        self.core.mode()
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        self.core.snapshot()
    }

    pub fn trip(&self) {
        self.core.trip();
    }

    pub fn reset(&self) {
        self.core.reset();
    }
}

impl<A, T, E> std::fmt::Debug for AsyncCircuitBreaker<A, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncCircuitBreaker")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<A, T, E> BreakerBuilder<AsyncOperation<A, T, E>>
where
    A: 'static,
    T: 'static,
    E: 'static,
{
    /// Async operation to run while the breaker is open.
    pub fn fallback<F, Fut>(mut self, fallback: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.fallback = Some(boxed_operation(fallback));
        self
    }

    pub fn build(self) -> Result<AsyncCircuitBreaker<A, T, E>, ConfigurationError> {
        let (primary, fallback, core) = self.finish()?;
        Ok(AsyncCircuitBreaker {
            primary,
            fallback,
            core,
        })
    }
}
