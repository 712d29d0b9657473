//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits and carry defaults matching the documented
//! environment contract.

use serde::{Deserialize, Serialize};

/// Process mode, resolved from `NODE_ENV`.
///
/// Anything other than `production` resolves to development, mirroring the
/// convention of the deployment platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Map a raw `NODE_ENV` value to a mode.
    pub fn from_env_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener port (`PORT`).
    pub port: u16,

    /// Process mode (`NODE_ENV`).
    pub environment: Environment,

    /// Derive the client address from `X-Forwarded-For`.
    ///
    /// The scaffold runs behind a reverse proxy, so the peer socket address
    /// is the proxy, not the client.
    pub trust_proxy: bool,

    /// Directory served at the root path namespace.
    pub static_dir: String,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Request body decoding limits.
    pub body: BodyLimitConfig,

    /// Per-client rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            environment: Environment::Development,
            trust_proxy: true,
            static_dir: "public".to_string(),
            cors: CorsConfig::default(),
            body: BodyLimitConfig::default(),
            rate_limit: RateLimitConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Cross-origin resource sharing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed in production mode.
    ///
    /// An entry may carry a single `*` wildcard as the whole leftmost host
    /// label (`https://*.repl.co`); development mode allows every origin.
    pub allowed_origins: Vec<String>,

    /// Permit credentialed requests.
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://replit.com".to_string(),
                "https://*.repl.co".to_string(),
            ],
            allow_credentials: true,
        }
    }
}

/// Request body limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BodyLimitConfig {
    /// Maximum decoded body size in bytes.
    pub max_bytes: usize,
}

impl Default for BodyLimitConfig {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length in seconds.
    pub window_secs: u64,

    /// Maximum requests per client address within a window.
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 15 * 60,
            max_requests: 100,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Fallback log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "meal_planner_api=debug,tower_http=debug".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
