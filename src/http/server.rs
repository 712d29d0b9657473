//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the Axum router with the ordered middleware pipeline
//! - Construct the application state shared with every stage
//! - Serve with graceful shutdown
//! - Spawn the rate-limit purge task

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::ErrorResponder;
use crate::http::{body, handlers, static_files};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::logging;
use crate::security::rate_limit::{self, RateLimiterState};
use crate::security::{cors, headers};

/// Application state threaded through every pipeline stage.
///
/// Built once at startup; configuration is immutable from then on. The
/// rate-limit table is the only piece of state mutated across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub started_at: Instant,
    pub rate_limiter: Arc<RateLimiterState>,
    pub static_files: ServeDir,
    pub errors: ErrorResponder,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let errors = ErrorResponder::new(config.environment);
        let rate_limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
        let static_files = ServeDir::new(&config.static_dir);
        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            rate_limiter,
            static_files,
            errors,
        }
    }
}

/// HTTP server for the scaffold.
pub struct HttpServer {
    router: Router,
    state: AppState,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let state = AppState::new(config);
        let router = Self::build_router(state.clone());
        Self {
            router,
            state,
            shutdown: Shutdown::new(),
        }
    }

    /// Build the Axum router with the pipeline in its fixed order.
    ///
    /// The last layer added sees the request first, so the layer list below
    /// reads bottom-up as the request-side stage order: security headers,
    /// CORS, body decoding, rate limiting, static assets, access logging,
    /// then dispatch and the not-found fallback.
    fn build_router(state: AppState) -> Router {
        let cors = cors::cors_layer(&state.config);

        Router::new()
            .route("/health", get(handlers::health).fallback(handlers::not_found))
            .route("/", get(handlers::root).fallback(handlers::not_found))
            // API routes will be mounted under /api in future tasks.
            .fallback(handlers::not_found)
            .layer(middleware::from_fn(logging::access_log))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                static_files::serve_static,
            ))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit::rate_limit_middleware,
            ))
            .layer(middleware::from_fn_with_state(state.clone(), body::decode_body))
            .layer(cors)
            .layer(middleware::from_fn(headers::security_headers))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Run the server until a termination signal arrives.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        // Evict stale rate-limit windows in the background.
        let limiter = self.state.rate_limiter.clone();
        let window = Duration::from_secs(self.state.config.rate_limit.window_secs);
        let mut shutdown_rx = self.shutdown.subscribe();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(window);
            ticker.tick().await; // consume the immediate first tick
            loop {
                tokio::select! {
                    _ = ticker.tick() => limiter.purge_expired(),
                    _ = shutdown_rx.recv() => break,
                }
            }
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(signals::shutdown_signal())
            .await?;

        self.shutdown.trigger();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for driving the pipeline in tests.
    pub fn into_router(self) -> Router {
        self.router
    }
}
