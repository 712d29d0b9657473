//! Request-scoped error taxonomy and the central error responder.

use axum::http::StatusCode;
use axum::response::Response;
use thiserror::Error;

use crate::config::Environment;
use crate::http::response::error_response;

/// Failures raised by pipeline stages.
///
/// Startup failures (config resolution, listener binding) are handled at the
/// entry point and never reach this type.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body exceeded the configured ceiling.
    #[error("request body exceeds the {limit_bytes} byte limit")]
    PayloadTooLarge { limit_bytes: usize },

    /// Request body could not be decoded.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// Client exhausted its request budget for the current window.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimitExceeded { retry_after_secs: u64 },

    /// No route claimed the request path.
    #[error("route not found: {path}")]
    RouteNotFound { path: String },

    /// Anything unexpected.
    #[error("unexpected server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

const GENERIC_MESSAGE: &str = "An unexpected error occurred";
const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";
const NOT_FOUND_MESSAGE: &str = "Route not found";

/// Renders every pipeline failure as the uniform JSON envelope.
///
/// Owns the mode flag so detail redaction happens in exactly one place:
/// production replaces internal failure detail with a generic message, while
/// the fixed public messages (rate limiting, 404) survive both modes.
#[derive(Debug, Clone, Copy)]
pub struct ErrorResponder {
    environment: Environment,
}

impl ErrorResponder {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    /// Render an error as a response with its associated status code.
    pub fn respond(&self, error: &ApiError) -> Response {
        let status = error.status();
        match error {
            ApiError::RateLimitExceeded { .. } => {
                error_response(status, RATE_LIMIT_MESSAGE, None)
            }
            ApiError::RouteNotFound { path } => {
                error_response(status, NOT_FOUND_MESSAGE, Some(path.clone()))
            }
            _ if self.environment.is_production() => {
                error_response(status, GENERIC_MESSAGE, None)
            }
            _ => error_response(status, &error.to_string(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            ApiError::PayloadTooLarge { limit_bytes: 1 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::MalformedBody("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::RateLimitExceeded { retry_after_secs: 1 }.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::RouteNotFound { path: "/x".into() }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn production_redacts_internal_detail() {
        let responder = ErrorResponder::new(Environment::Production);
        let response = responder.respond(&ApiError::MalformedBody("secret detail".into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "An unexpected error occurred");
    }

    #[tokio::test]
    async fn development_keeps_failure_detail() {
        let responder = ErrorResponder::new(Environment::Development);
        let response = responder.respond(&ApiError::MalformedBody("expected value".into()));

        let body = body_json(response).await;
        assert_eq!(body["error"], "malformed request body: expected value");
    }

    #[tokio::test]
    async fn route_not_found_keeps_path_in_production() {
        let responder = ErrorResponder::new(Environment::Production);
        let response = responder.respond(&ApiError::RouteNotFound { path: "/missing".into() });
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Route not found");
        assert_eq!(body["path"], "/missing");
    }
}
