//! Configuration validation.
//!
//! Semantic checks on top of syntactic resolution. Returns every violation,
//! not just the first, so a broken environment is fixable in one pass.

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;
use crate::security::cors::OriginPattern;

/// A single configuration violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyStaticDir,
    ZeroBodyLimit,
    ZeroRateLimitWindow,
    ZeroRateLimitCeiling,
    InvalidOrigin(String),
    InvalidMetricsAddress(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStaticDir => write!(f, "static_dir must not be empty"),
            Self::ZeroBodyLimit => write!(f, "body.max_bytes must be greater than zero"),
            Self::ZeroRateLimitWindow => {
                write!(f, "rate_limit.window_secs must be greater than zero")
            }
            Self::ZeroRateLimitCeiling => {
                write!(f, "rate_limit.max_requests must be greater than zero")
            }
            Self::InvalidOrigin(origin) => {
                write!(f, "cors.allowed_origins entry {origin:?} is not a valid origin pattern")
            }
            Self::InvalidMetricsAddress(addr) => {
                write!(f, "observability.metrics_address {addr:?} is not a socket address")
            }
        }
    }
}

/// Validate a resolved configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.static_dir.trim().is_empty() {
        errors.push(ValidationError::EmptyStaticDir);
    }
    if config.body.max_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.rate_limit.window_secs == 0 {
        errors.push(ValidationError::ZeroRateLimitWindow);
    }
    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError::ZeroRateLimitCeiling);
    }
    for origin in &config.cors.allowed_origins {
        if OriginPattern::parse(origin).is_none() {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
