//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! caller → CircuitBreaker::invoke / AsyncCircuitBreaker::invoke
//!     → shared.rs (lock, state.rs decides route, unlock)
//!     → primary or fallback operation (no lock held)
//!     → shared.rs (lock, record outcome, unlock)
//!     → original result or error back to caller
//! ```
//!
//! # Design Decisions
//! - Closed means the primary is in use, open means the fallback is
//! - One mutex guards mode and both counters
//! - Sync and async breakers share the state machine and builder
//! - Retries, backoff and timeouts belong to the wrapped operations

pub mod async_breaker;
pub mod builder;
pub mod circuit_breaker;
mod shared;
pub mod state;
pub mod types;

pub use async_breaker::{AsyncCircuitBreaker, AsyncOperation};
pub use builder::BreakerBuilder;
pub use circuit_breaker::{CircuitBreaker, Operation};
pub use state::{BreakerState, Route};
pub use types::{BreakerError, BreakerMode, BreakerSnapshot, ConfigurationError};
