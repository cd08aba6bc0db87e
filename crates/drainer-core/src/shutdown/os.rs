//! Adapter from process signals to [`ShutdownSignal`].
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::ShutdownSignal;

/// Spawn a task that requests shutdown on SIGINT or SIGTERM (Ctrl-C elsewhere).
///
/// The task ends after the first signal, or as soon as shutdown was requested by
/// some other path. Must be called from within a tokio runtime.
pub fn listen_os_signals(signal: ShutdownSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            name = wait_for_signal() => {
                match name {
                    Some(name) => {
                        info!(signal = name, "termination signal received");
                        signal.request();
                    }
                    None => warn!("failed to install signal handlers; only in-process shutdown is available"),
                }
            }
            _ = signal.requested() => {}
        }
    })
}

#[cfg(unix)]
async fn wait_for_signal() -> Option<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = signal(SignalKind::terminate()).ok()?;
    let mut int = signal(SignalKind::interrupt()).ok()?;
    tokio::select! {
        _ = term.recv() => Some("SIGTERM"),
        _ = int.recv() => Some("SIGINT"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Option<&'static str> {
    tokio::signal::ctrl_c().await.ok().map(|_| "ctrl-c")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listener_exits_when_shutdown_requested_elsewhere() {
        let signal = ShutdownSignal::default();
        let handle = listen_os_signals(signal.clone());

        signal.request();
        handle.await.unwrap();
    }
}
