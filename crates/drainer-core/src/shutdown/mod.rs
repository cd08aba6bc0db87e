//! Graceful shutdown flag shared between the worker loop and signal handlers.
mod os;
pub use os::listen_os_signals;

use drainer_model::JitterWindow;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Stop-request flag plus the post-success jitter window.
///
/// The flag flips from "running" to "stop requested" at most once and never flips back.
/// Clones share the same flag, so one handle goes to the OS-signal shim and another to
/// the worker loop. Besides the polled [`ShutdownSignal::is_requested`], the flag can be
/// awaited with [`ShutdownSignal::requested`], which lets the loop cut a sleep short.
#[derive(Clone, Debug, Default)]
pub struct ShutdownSignal {
    token: CancellationToken,
    jitter: JitterWindow,
}

impl ShutdownSignal {
    pub fn new(jitter: JitterWindow) -> Self {
        Self {
            token: CancellationToken::new(),
            jitter,
        }
    }

    /// Ask every loop holding this signal to stop after its current step.
    ///
    /// Idempotent: later calls are no-ops.
    pub fn request(&self) {
        if !self.token.is_cancelled() {
            info!("shutdown requested");
        }
        self.token.cancel();
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once a stop has been requested (immediately if it already was).
    pub async fn requested(&self) {
        self.token.cancelled().await
    }

    /// Window the post-success pause is drawn from.
    #[inline]
    pub fn jitter(&self) -> JitterWindow {
        self.jitter
    }
}
