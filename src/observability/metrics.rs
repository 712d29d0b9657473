//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method and status
//! - `http_request_duration_seconds` (histogram): latency by method
//! - `http_requests_rate_limited_total` (counter): limiter rejections

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Recording is independent of exposition: the macros below are no-ops
/// until an exporter is installed, so stages record unconditionally.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a rate-limited rejection.
pub fn record_rate_limited() {
    metrics::counter!("http_requests_rate_limited_total").increment(1);
}
