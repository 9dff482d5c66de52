use std::sync::Arc;

use tokio::sync::watch;

/// Run-wide cancellation signal. Level triggered: once set it stays set, and
/// every receiver observes it independently.
pub type ShutdownSender = watch::Sender<bool>;
pub type ShutdownReceiver = watch::Receiver<bool>;

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    watch::channel(false)
}

/// Non-blocking check used by workers between iterations.
#[must_use]
pub fn is_shutdown(shutdown_rx: &ShutdownReceiver) -> bool {
    *shutdown_rx.borrow()
}

/// Resolves once the signal is set, or immediately if every sender is gone.
pub async fn wait_for_shutdown(shutdown_rx: &mut ShutdownReceiver) {
    drop(shutdown_rx.wait_for(|cancelled| *cancelled).await);
}

/// Caller-side handle used to end a run early.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    shutdown_tx: Arc<ShutdownSender>,
}

impl CancelHandle {
    pub(crate) const fn new(shutdown_tx: Arc<ShutdownSender>) -> Self {
        Self { shutdown_tx }
    }

    /// Broadcasts cancellation. Returns `true` for the call that actually
    /// flipped the signal.
    pub fn cancel(&self) -> bool {
        !self.shutdown_tx.send_replace(true)
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> ShutdownReceiver {
        self.shutdown_tx.subscribe()
    }
}
