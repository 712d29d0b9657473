//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (protective response headers)
//!     → cors.rs (origin policy, preflight)
//!     → rate_limit.rs (per-address request budget)
//!     → Pass to body decoding and dispatch
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - No trust in client input beyond the configured proxy hop

pub mod cors;
pub mod headers;
pub mod rate_limit;
