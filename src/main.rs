//! Lisa's AI Meal Planner API — server entry point.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────┐
//!                  │              REQUEST PIPELINE                 │
//!                  │                                               │
//!  Client Request  │  security headers → CORS → body decoding     │
//!  ────────────────┼─▶    → rate limiting → static assets         │
//!                  │      → access logging → route dispatch       │
//!  Client Response │      → not-found fallback                    │
//!  ◀───────────────┼── uniform JSON envelopes (error responder)   │
//!                  │                                               │
//!                  │  ┌─────────────────────────────────────────┐ │
//!                  │  │         Cross-Cutting Concerns          │ │
//!                  │  │  config   observability   lifecycle     │ │
//!                  │  └─────────────────────────────────────────┘ │
//!                  └──────────────────────────────────────────────┘
//! ```
//!
//! Startup is fail-fast: configuration resolution and listener binding
//! errors terminate the process with a non-zero exit code. Termination
//! signals drain the listener and exit zero.

use tokio::net::TcpListener;

use meal_planner_api::config::ServerConfig;
use meal_planner_api::http::HttpServer;
use meal_planner_api::observability::{logging, metrics};

#[tokio::main]
async fn main() {
    // Load .env before configuration resolution sees the environment.
    dotenvy::dotenv().ok();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet; stderr is all we have.
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    logging::init(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        port = config.port,
        "meal-planner-api starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = format!("0.0.0.0:{}", config.port);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            tracing::error!(
                port = config.port,
                "Port already in use; stop the other server or set a different PORT"
            );
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!(error = %e, address = %bind_address, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    if let Ok(addr) = listener.local_addr() {
        tracing::info!(
            address = %addr,
            health = %format!("http://{addr}/health"),
            "Listening for connections"
        );
    }

    let server = HttpServer::new(config);
    if let Err(e) = server.run(listener).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
}
