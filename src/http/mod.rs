//! HTTP pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, ordered middleware pipeline)
//!         security headers    (security::headers)
//!         CORS                (security::cors)
//!         body decoding       (body.rs)
//!         rate limiting       (security::rate_limit)
//!         static assets       (static_files.rs)
//!         access logging      (observability::logging)
//!     → handlers.rs (route dispatch, not-found fallback)
//!     → response.rs / error.rs (uniform JSON envelopes)
//! ```
//!
//! Each middleware stage either forwards the (possibly annotated) request to
//! the next stage or terminates the chain by producing a response.

pub mod body;
pub mod handlers;
pub mod response;
pub mod server;
pub mod static_files;

pub use body::DecodedBody;
pub use server::{AppState, HttpServer};
