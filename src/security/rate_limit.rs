//! Rate limiting middleware.
//!
//! Fixed-window counters keyed by client address, enforced ahead of static
//! serving and dispatch. Every response passing the limiter carries the
//! draft standard `RateLimit-*` headers.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use axum::middleware::Next;
use axum::response::Response;

use crate::config::RateLimitConfig;
use crate::error::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;

const LIMIT_HEADER: HeaderName = HeaderName::from_static("ratelimit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RESET_HEADER: HeaderName = HeaderName::from_static("ratelimit-reset");

/// One client's window: requests seen since the window opened.
#[derive(Debug)]
struct Window {
    count: u32,
    started_at: Instant,
}

/// Outcome of a rate-limit check, including header material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_secs: u64,
}

/// Shared fixed-window rate limiter state.
pub struct RateLimiterState {
    windows: Mutex<HashMap<String, Window>>,
    limit: u32,
    window: Duration,
}

impl RateLimiterState {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_window(config.max_requests, Duration::from_secs(config.window_secs))
    }

    fn with_window(limit: u32, window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            limit,
            window,
        }
    }

    /// Record one request for `key` and decide whether it may proceed.
    ///
    /// The counter stops at the ceiling; rejected requests do not extend the
    /// window or push the counter past the limit.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");
        let window = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started_at: now,
        });

        if now.duration_since(window.started_at) >= self.window {
            window.count = 0;
            window.started_at = now;
        }

        let allowed = window.count < self.limit;
        if allowed {
            window.count += 1;
        }

        let elapsed = now.duration_since(window.started_at);
        RateLimitDecision {
            allowed,
            limit: self.limit,
            remaining: self.limit - window.count,
            reset_secs: self.window.saturating_sub(elapsed).as_secs(),
        }
    }

    /// Drop windows whose interval has fully elapsed.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");
        windows.retain(|_, window| now.duration_since(window.started_at) < self.window);
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .expect("rate limiter mutex poisoned")
            .len()
    }
}

/// Middleware stage: enforce the per-address request budget.
pub async fn rate_limit_middleware(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request, peer, state.config.trust_proxy);
    let decision = state.rate_limiter.check(&key);

    if decision.allowed {
        let mut response = next.run(request).await;
        apply_headers(response.headers_mut(), &decision);
        return response;
    }

    tracing::warn!(client = %key, "Rate limit exceeded");
    metrics::record_rate_limited();

    let retry_after = decision.reset_secs.max(1);
    let mut response = state.errors.respond(&ApiError::RateLimitExceeded {
        retry_after_secs: retry_after,
    });
    apply_headers(response.headers_mut(), &decision);
    response.headers_mut().insert(RETRY_AFTER, num_header(retry_after));
    response
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(LIMIT_HEADER, num_header(u64::from(decision.limit)));
    headers.insert(REMAINING_HEADER, num_header(u64::from(decision.remaining)));
    headers.insert(RESET_HEADER, num_header(decision.reset_secs));
}

fn num_header(value: u64) -> HeaderValue {
    HeaderValue::from_str(&value.to_string()).expect("numeric header value")
}

/// Key for the window table: the first `X-Forwarded-For` hop when behind the
/// trusted proxy, otherwise the peer socket address.
fn client_key(request: &Request, peer: SocketAddr, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(forwarded) = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
        {
            if let Some(first) = forwarded.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }
    peer.ip().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_is_enforced_and_never_exceeded() {
        let limiter = RateLimiterState::with_window(3, Duration::from_secs(60));

        for remaining in [2, 1, 0] {
            let decision = limiter.check("10.0.0.1");
            assert!(decision.allowed);
            assert_eq!(decision.limit, 3);
            assert_eq!(decision.remaining, remaining);
        }

        // Denied requests keep remaining pinned at zero.
        for _ in 0..2 {
            let decision = limiter.check("10.0.0.1");
            assert!(!decision.allowed);
            assert_eq!(decision.remaining, 0);
        }
    }

    #[test]
    fn clients_are_tracked_independently() {
        let limiter = RateLimiterState::with_window(1, Duration::from_secs(60));

        assert!(limiter.check("10.0.0.1").allowed);
        assert!(!limiter.check("10.0.0.1").allowed);
        assert!(limiter.check("10.0.0.2").allowed);
    }

    #[test]
    fn window_resets_after_the_interval() {
        let limiter = RateLimiterState::with_window(1, Duration::from_millis(20));

        assert!(limiter.check("10.0.0.1").allowed);
        assert!(!limiter.check("10.0.0.1").allowed);

        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.check("10.0.0.1").allowed);
    }

    #[test]
    fn purge_drops_only_expired_windows() {
        let limiter = RateLimiterState::with_window(5, Duration::from_millis(20));

        limiter.check("stale");
        std::thread::sleep(Duration::from_millis(30));
        limiter.check("fresh");

        limiter.purge_expired();
        assert_eq!(limiter.tracked_clients(), 1);
    }

    fn request_with_forwarded(value: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header("x-forwarded-for", value);
        }
        builder.body(axum::body::Body::empty()).unwrap()
    }

    #[test]
    fn client_key_prefers_the_first_forwarded_hop() {
        let peer: SocketAddr = "192.0.2.9:4711".parse().unwrap();

        let request = request_with_forwarded(Some("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_key(&request, peer, true), "203.0.113.7");

        // Untrusted deployments ignore the header entirely.
        assert_eq!(client_key(&request, peer, false), "192.0.2.9");

        let request = request_with_forwarded(None);
        assert_eq!(client_key(&request, peer, true), "192.0.2.9");

        let request = request_with_forwarded(Some("  "));
        assert_eq!(client_key(&request, peer, true), "192.0.2.9");
    }
}
