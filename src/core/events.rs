//! Frontend notification of result changes.

use tauri::Emitter;

use crate::core::types::ConversionRecord;

/// Event name the results view listens on.
pub const RESULTS_EVENT: &str = "conversion-results";

/// Observer of result-store changes.
///
/// The orchestrator pushes a full ordered snapshot through this seam after
/// every record transition, so the results view re-renders without polling.
pub trait ResultsNotifier: Send + Sync {
    fn results_changed(&self, records: &[ConversionRecord]);
}

/// Production notifier: emits the snapshot to all windows as a Tauri event.
pub struct WindowEventNotifier {
    app: tauri::AppHandle,
}

impl WindowEventNotifier {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl ResultsNotifier for WindowEventNotifier {
    fn results_changed(&self, records: &[ConversionRecord]) {
        // Emission failure only means no window is listening yet.
        let _ = self.app.emit(RESULTS_EVENT, records);
    }
}
