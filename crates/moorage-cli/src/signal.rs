//! Process signal handling.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Resolve on SIGINT or SIGTERM (Ctrl+C elsewhere) and name the signal.
pub async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => Ok("SIGTERM"),
            _ = sigint.recv() => Ok("SIGINT"),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok("ctrl-c")
    }
}

/// Cancel `shutdown` on the first termination signal.
pub fn cancel_on_signal(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(signal) => {
                info!(signal, "shutdown signal received");
                shutdown.cancel();
            }
            Err(e) => warn!(error = %e, "could not install signal handlers"),
        }
    });
}
