//! Shutdown triggers.
//!
//! # Responsibilities
//! - Wait for Ctrl+C (SIGINT) or an internal [`Shutdown`](super::Shutdown)
//!   broadcast, whichever comes first

use tokio::sync::broadcast;

/// Resolves when Ctrl+C is pressed or `shutdown` fires. If the Ctrl+C
/// handler cannot be installed, only the broadcast can stop the server.
pub async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("Shutdown signal received"),
        _ = shutdown.recv() => tracing::info!("Shutdown requested"),
    }
}
