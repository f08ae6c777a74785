//! Application state management for Tauri.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use crate::dragdrop::DropEvent;
use crate::processing::ConversionOrchestrator;

/// Application state managed by Tauri.
///
/// Holds the single orchestrator instance and the sending half of the drop
/// event stream. There is deliberately no other shared state: the seen-event
/// set, the in-flight gate and the result collection all live inside the
/// orchestrator/deduplicator pair.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<ConversionOrchestrator>,
    drop_events: mpsc::UnboundedSender<DropEvent>,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<ConversionOrchestrator>,
        drop_events: mpsc::UnboundedSender<DropEvent>,
    ) -> Self {
        Self {
            orchestrator,
            drop_events,
        }
    }

    pub fn orchestrator(&self) -> &Arc<ConversionOrchestrator> {
        &self.orchestrator
    }

    /// Feed a native drop notification into the deduplicator stream.
    pub fn submit_drop(&self, event: DropEvent) {
        if self.drop_events.send(event).is_err() {
            // Only happens during shutdown, after the consumer task is gone.
            warn!("Drop event stream is closed; notification discarded");
        }
    }
}
