//! Shutdown signal handling.
//!
//! SIGTERM and SIGINT (Ctrl+C off Unix) flip a watch channel that the HTTP
//! server and the shutdown path wait on.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Turns process signals into a shutdown notification.
pub struct SignalHandler {
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalHandler {
    /// Creates a new signal handler.
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        }
    }

    /// Spawns the signal listener task. Call once at startup.
    #[cfg(unix)]
    pub fn spawn_listener(&self) {
        let shutdown_tx = self.shutdown_tx.clone();

        tokio::spawn(async move {
            use tokio::signal::unix::{SignalKind, signal};

            let (mut sigterm, mut sigint) =
                match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                    (Ok(term), Ok(int)) => (term, int),
                    (Err(e), _) | (_, Err(e)) => {
                        warn!(error = %e, "Failed to install signal handlers");
                        return;
                    }
                };

            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM, initiating shutdown"),
                _ = sigint.recv() => info!("Received SIGINT, initiating shutdown"),
            }
            let _ = shutdown_tx.send(true);

            debug!("Signal listener stopped");
        });
    }

    /// Non-Unix implementation: Ctrl+C only.
    #[cfg(not(unix))]
    pub fn spawn_listener(&self) {
        let shutdown_tx = self.shutdown_tx.clone();

        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("Received Ctrl+C, initiating shutdown");
                let _ = shutdown_tx.send(true);
            }
        });
    }

    /// Returns a future that completes when a shutdown signal is received.
    pub fn shutdown(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.shutdown_rx.clone(),
        }
    }

    /// Returns true if shutdown has been signaled.
    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Programmatically triggers a shutdown.
    pub fn trigger_shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// A signal that completes when shutdown is signaled.
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Waits for the shutdown signal.
    pub async fn wait(mut self) {
        // A closed channel also means nobody can trigger shutdown any more.
        let _ = self.rx.wait_for(|shutdown| *shutdown).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_shutdown() {
        let handler = SignalHandler::new();
        assert!(!handler.is_shutdown());

        handler.trigger_shutdown();
        assert!(handler.is_shutdown());
    }

    #[tokio::test]
    async fn shutdown_signal_wait() {
        let handler = SignalHandler::new();
        let shutdown = handler.shutdown();

        let tx = handler.shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = tx.send(true);
        });

        let result = tokio::time::timeout(Duration::from_millis(500), shutdown.wait()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn signal_taken_after_trigger_completes_immediately() {
        let handler = SignalHandler::new();
        handler.trigger_shutdown();

        let result =
            tokio::time::timeout(Duration::from_millis(100), handler.shutdown().wait()).await;
        assert!(result.is_ok());
    }
}
