// Signal handling module
//
// Supported signals:
// - SIGINT:  Graceful shutdown (Ctrl+C)
// - SIGTERM: Graceful shutdown (Unix only)

use crate::logger;

/// Resolve when the process is asked to stop
///
/// A signal that cannot be registered is logged and never fires; the other
/// one still works.
pub async fn shutdown_signal() {
    tokio::select! {
        () = interrupt() => logger::log_warning("SIGINT received, shutting down"),
        () = terminate() => logger::log_warning("SIGTERM received, shutting down"),
    }
}

async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_error(&format!("Failed to register Ctrl+C handler: {e}"));
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            logger::log_error(&format!("Failed to register SIGTERM handler: {e}"));
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
