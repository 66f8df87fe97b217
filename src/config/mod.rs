//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SimulatorConfig (validated, immutable)
//!     → BreakerConfig handed to the breaker builder
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Breakers re-check their own invariants at build time, so a
//!   hand-written BreakerConfig is never trusted blindly

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, LoadError};
pub use schema::BreakerConfig;
pub use schema::ObservabilityConfig;
pub use schema::SimulatorConfig;
pub use validation::ValidationError;
