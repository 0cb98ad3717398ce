//! Shutdown coordination for the relay.

use tokio::sync::watch;

/// Hands out listeners and flips them all when shutdown is triggered.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

/// One subscriber's view of the shutdown signal.
#[derive(Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Get a listener to hand to a long-running task.
    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Signal every listener to stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownListener {
    /// Resolve once shutdown is triggered.
    ///
    /// A dropped coordinator counts as shutdown so tasks never hang on a
    /// signal that can no longer arrive.
    pub async fn wait(mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}
