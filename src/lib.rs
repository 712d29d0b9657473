//! Lisa's AI Meal Planner API — server scaffold library.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorResponder};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
