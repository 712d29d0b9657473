//! OS signal handling.
//!
//! SIGINT and SIGTERM both trigger graceful shutdown; the process exits
//! zero once the listener drains. There is no reload signal at this scope.

use tokio::signal;

/// Resolve when a termination signal arrives.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT received, shutting down gracefully"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down gracefully"),
    }
}
