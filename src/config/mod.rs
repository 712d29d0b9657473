//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (+ .env)
//!     → loader.rs (resolve & parse)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc with every pipeline stage
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - Every field has a default so a bare environment still boots
//! - Validation separates syntactic (parse) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    BodyLimitConfig, CorsConfig, Environment, ObservabilityConfig, RateLimitConfig, ServerConfig,
};
