//! Change notification for folder mutations
//!
//! Every applied mutation publishes the resource kind it touched so views
//! can refresh just that kind's tree. Payloads carry no detail; receivers
//! re-read state on each event.

use tokio::sync::broadcast;

use crate::resources::ResourceKind;

/// Emitted after a mutation is applied to a kind's folders or assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderEvent {
    pub kind: ResourceKind,
}

/// Fan-out channel for [`FolderEvent`]s. Slow subscribers drop old events
/// rather than block mutators; the next event triggers a full re-read.
pub struct ChangeBus {
    tx: broadcast::Sender<FolderEvent>,
}

impl ChangeBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(32);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FolderEvent> {
        self.tx.subscribe()
    }

    /// Publish a change for one kind. A send with no live subscribers is
    /// not an error.
    pub fn notify(&self, kind: ResourceKind) {
        let _ = self.tx.send(FolderEvent { kind });
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}
