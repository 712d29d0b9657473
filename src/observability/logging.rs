//! Structured logging: subscriber setup and the access-log stage.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ServerConfig;
use crate::observability::metrics;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured fallback filter
/// applies. Production emits JSON lines for machine parsing, development a
/// human-readable format.
pub fn init(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.environment.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Middleware stage: one structured line per request reaching dispatch.
pub async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    tracing::info!(
        method = %method,
        path = %path,
        status,
        latency_ms = start.elapsed().as_millis() as u64,
        "request"
    );
    metrics::record_request(method.as_str(), status, start);

    response
}
