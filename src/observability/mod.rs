//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Breakers produce:
//!     → tracing events (transitions, routing, rejections)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured logging with the breaker name as a field
//! - The library only emits events; binaries decide how to subscribe

pub mod logging;

pub use logging::init_logging;
