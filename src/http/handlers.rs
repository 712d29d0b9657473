//! Route handlers for the scaffold's fixed surface.

use axum::extract::State;
use axum::http::Uri;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::ApiError;
use crate::http::server::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,

    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,

    /// Seconds since the server started.
    pub uptime: u64,

    pub environment: &'static str,
}

/// Service info response for the root route.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: EndpointIndex,
}

#[derive(Debug, Serialize)]
pub struct EndpointIndex {
    pub health: &'static str,
    pub api: &'static str,
}

/// `GET /health` — verify the server is running.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp: OffsetDateTime::now_utc(),
        uptime: state.started_at.elapsed().as_secs(),
        environment: state.config.environment.as_str(),
    })
}

/// `GET /` — basic service info.
pub async fn root() -> impl IntoResponse {
    Json(ServiceInfo {
        message: "Lisa's AI Meal Planner API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: EndpointIndex {
            health: "/health",
            api: "/api",
        },
    })
}

/// Fallback for anything no route claimed.
pub async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    state.errors.respond(&ApiError::RouteNotFound {
        path: uri.path().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use crate::config::ServerConfig;

    fn test_router() -> Router {
        let state = AppState::new(ServerConfig::default());
        Router::new()
            .route("/health", get(health).fallback(not_found))
            .route("/", get(root).fallback(not_found))
            .fallback(not_found)
            .with_state(state)
    }

    async fn body_json(body: Body) -> serde_json::Value {
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["environment"], "development");
        assert!(body["uptime"].is_u64());
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn root_reports_service_info() {
        let response = test_router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["message"], "Lisa's AI Meal Planner API");
        assert_eq!(body["version"], "1.0.0");
        assert_eq!(body["endpoints"]["health"], "/health");
        assert_eq!(body["endpoints"]["api"], "/api");
    }

    #[tokio::test]
    async fn unmatched_path_gets_envelope_with_path() {
        let response = test_router()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Route not found");
        assert_eq!(body["path"], "/nope");
    }

    #[tokio::test]
    async fn unmatched_method_falls_through_to_not_found() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["path"], "/health");
    }
}
