//! # Process shutdown signal.
//!
//! Hooks that block for the rest of the process lifetime (an API server run as
//! the last startup hook) wait on [`wait_for_shutdown_signal`] to return.
//!
//! **Unix:** `SIGINT`, `SIGTERM`, `SIGQUIT`.
//! **Other platforms:** Ctrl-C via [`tokio::signal::ctrl_c`].

/// Completes when the process receives a termination signal.
///
/// Returns `Err` if a signal listener cannot be registered.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let received = tokio::select! {
        _ = sigint.recv() => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
        _ = sigquit.recv() => "SIGQUIT",
    };
    tracing::info!(signal = received, "shutdown signal received");
    Ok(())
}

/// Completes when the process receives a termination signal.
///
/// Returns `Err` if the Ctrl-C listener cannot be registered.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!(signal = "ctrl-c", "shutdown signal received");
    Ok(())
}
