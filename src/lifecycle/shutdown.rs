//! Shutdown coordination.

use tokio::sync::broadcast;

/// Broadcast used to stop background tasks when the listener winds down.
#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe before spawning; the receiver resolves once triggered.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber. Safe to call with none listening.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
