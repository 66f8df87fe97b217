//! Circuit breaker with a fallback path.
//!
//! A breaker wraps a primary operation and an optional fallback. While
//! closed it calls the primary and scores failures; once the score reaches
//! the trigger threshold it opens and routes calls to the fallback (or
//! rejects them) for a fixed number of calls, then lets the primary try
//! again.

pub mod config;
pub mod observability;
pub mod resilience;

pub use config::BreakerConfig;
pub use resilience::{
    AsyncCircuitBreaker, BreakerError, BreakerMode, BreakerSnapshot, CircuitBreaker,
    ConfigurationError,
};
