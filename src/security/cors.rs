//! Cross-origin policy.
//!
//! Development reflects every caller so local frontends on any port work.
//! Production restricts to the configured allow-list; entries may use a
//! wildcard subdomain pattern (`https://*.repl.co`). Credentialed requests
//! stay enabled in both modes, which is why origins are reflected rather
//! than answered with `*`.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::config::ServerConfig;

/// One allow-list entry: an exact origin, or a wildcard subdomain pattern
/// with `*` as the whole leftmost host label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPattern {
    Exact(String),
    Subdomain {
        /// Scheme prefix including the separator, e.g. `https://`.
        prefix: String,
        /// Host suffix including the leading dot, e.g. `.repl.co`.
        dot_suffix: String,
    },
}

impl OriginPattern {
    /// Parse a configured pattern. Returns `None` for anything that is not
    /// an origin or places the wildcard somewhere it cannot match.
    pub fn parse(pattern: &str) -> Option<Self> {
        let (scheme, host) = pattern.split_once("://")?;
        if scheme.is_empty() || host.is_empty() {
            return None;
        }
        if let Some(suffix) = host.strip_prefix("*.") {
            if suffix.is_empty() || suffix.contains('*') {
                return None;
            }
            Some(Self::Subdomain {
                prefix: format!("{}://", scheme.to_ascii_lowercase()),
                dot_suffix: format!(".{}", suffix.to_ascii_lowercase()),
            })
        } else if host.contains('*') {
            None
        } else {
            Some(Self::Exact(pattern.to_ascii_lowercase()))
        }
    }

    /// Whether an `Origin` header value satisfies this pattern.
    ///
    /// Subdomain patterns are scheme-anchored suffix matches requiring at
    /// least one extra label; the bare apex does not match.
    pub fn matches(&self, origin: &str) -> bool {
        let origin = origin.to_ascii_lowercase();
        match self {
            Self::Exact(exact) => origin == *exact,
            Self::Subdomain { prefix, dot_suffix } => match origin.strip_prefix(prefix.as_str()) {
                Some(host) => {
                    host.ends_with(dot_suffix.as_str()) && host.len() > dot_suffix.len()
                }
                None => false,
            },
        }
    }
}

/// Build the CORS layer for the current mode.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let allow_origin = if config.environment.is_production() {
        let patterns: Vec<OriginPattern> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|pattern| OriginPattern::parse(pattern))
            .collect();
        AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .is_ok_and(|origin| patterns.iter().any(|p| p.matches(origin)))
        })
    } else {
        AllowOrigin::mirror_request()
    };

    let layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request());

    if config.cors.allow_credentials {
        layer.allow_credentials(true)
    } else {
        layer
    }
}
