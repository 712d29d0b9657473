//! Static asset stage.
//!
//! Tries the public directory ahead of route dispatch; misses fall through
//! to the rest of the chain. Directory requests resolve to `index.html`
//! when one exists, so a shipped frontend shadows the JSON root route.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tower::ServiceExt;

use crate::http::server::AppState;

/// Middleware stage: serve files under the configured public directory.
pub async fn serve_static(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET && request.method() != Method::HEAD {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let probe = Request::from_parts(parts.clone(), Body::empty());

    match state.static_files.clone().oneshot(probe).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.map(Body::new),
        // No such file: hand the original request to the next stage.
        _ => next.run(Request::from_parts(parts, body)).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::middleware;
    use axum::routing::get;
    use axum::Router;

    use crate::config::ServerConfig;

    fn fixture_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "meal-planner-static-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn test_router(static_dir: &std::path::Path) -> Router {
        let config = ServerConfig {
            static_dir: static_dir.to_string_lossy().into_owned(),
            ..ServerConfig::default()
        };
        let state = AppState::new(config);
        Router::new()
            .route("/", get(|| async { "dispatched" }))
            .fallback(|| async { (StatusCode::NOT_FOUND, "miss") })
            .layer(middleware::from_fn_with_state(state, serve_static))
    }

    async fn body_string(body: Body) -> String {
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn existing_file_short_circuits_the_chain() {
        let dir = fixture_dir("hit");
        std::fs::write(dir.join("hello.txt"), "hi from disk").unwrap();

        let response = test_router(&dir)
            .oneshot(
                Request::builder()
                    .uri("/hello.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response.into_body()).await, "hi from disk");
    }

    #[tokio::test]
    async fn missing_file_falls_through() {
        let dir = fixture_dir("miss");

        let response = test_router(&dir)
            .oneshot(
                Request::builder()
                    .uri("/absent.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response.into_body()).await, "miss");
    }

    #[tokio::test]
    async fn root_route_still_dispatches_without_index() {
        let dir = fixture_dir("root");

        let response = test_router(&dir)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response.into_body()).await, "dispatched");
    }

    #[tokio::test]
    async fn non_get_requests_skip_the_static_stage() {
        let dir = fixture_dir("post");
        std::fs::write(dir.join("hello.txt"), "hi from disk").unwrap();

        let response = test_router(&dir)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/hello.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // The file exists but POST goes straight to dispatch.
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response.into_body()).await, "miss");
    }
}
