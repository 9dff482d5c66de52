use tracing::info;

use crate::shutdown::{CancelHandle, ShutdownReceiver, wait_for_shutdown};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Cancels the run on Ctrl+C or SIGTERM. Exits on its own once the run has
/// been cancelled by any other path.
pub fn setup_signal_shutdown_handler(cancel: &CancelHandle) -> tokio::task::JoinHandle<()> {
    let cancel = cancel.clone();
    let mut shutdown_rx: ShutdownReceiver = cancel.subscribe();
    tokio::spawn(async move {
        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                eprintln!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                () = wait_for_shutdown(&mut shutdown_rx) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, stopping load test.");
                    cancel.cancel();
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    info!("SIGTERM received, stopping load test.");
                    cancel.cancel();
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                () = wait_for_shutdown(&mut shutdown_rx) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, stopping load test.");
                    cancel.cancel();
                }
            }
        }
    })
}
