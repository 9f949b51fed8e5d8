//! Ctrl-C / SIGTERM handling.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancels `cancel` when the process receives an interrupt or terminate signal.
pub(crate) fn spawn_signal_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        if let Some(signal) = wait_for_signal().await {
            info!(signal, "cancellation requested");
            cancel.cancel();
        }
    });
}

/// Returns the name of the signal received, or `None` if listening failed.
#[cfg(unix)]
async fn wait_for_signal() -> Option<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!(error = %e, "failed to install SIGTERM handler");
            return tokio::signal::ctrl_c().await.ok().map(|()| "SIGINT");
        }
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => result.ok().map(|()| "SIGINT"),
        _ = terminate.recv() => Some("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Option<&'static str> {
    tokio::signal::ctrl_c().await.ok().map(|()| "ctrl-c")
}
