//! Tauri command handlers for the conversion pipeline.

use tauri::State;
use tracing::debug;

use crate::core::{AppState, ConversionRecord, InputFile};
use crate::dragdrop::DropEvent;
use crate::utils::ConverterResult;

/// Converts a batch of picker-supplied files to WebP.
///
/// This is the picker input channel: the frontend passes file objects that
/// already carry name + bytes. Files are processed strictly in input order;
/// the call returns once every file has a terminal record.
///
/// # Arguments
/// * `state` - Application state containing the orchestrator
/// * `files` - Ordered batch of files (name, optional mime, bytes)
///
/// # Errors
/// `BatchInProgress` when another batch is already mid-flight; per-file
/// failures never fail the command, they end up in the results.
#[tauri::command]
pub async fn convert_files(
    state: State<'_, AppState>,
    files: Vec<InputFile>,
) -> ConverterResult<()> {
    debug!("Received convert_files command for {} file(s)", files.len());
    state.orchestrator().convert_batch(files).await
}

/// Forwards a native drag-and-drop notification into the drop pipeline.
///
/// This is the drop input channel. The webview may redeliver the same
/// notification; the deduplicator makes delivery idempotent, so this command
/// never fails and returns without waiting for the resulting batch.
///
/// # Arguments
/// * `event_id` - The webview's drop event identifier
/// * `paths` - Absolute paths of the dropped files
#[tauri::command]
pub fn notify_file_drop(state: State<'_, AppState>, event_id: u32, paths: Vec<String>) {
    debug!("Drop event {} with {} path(s)", event_id, paths.len());
    state.submit_drop(DropEvent {
        id: event_id,
        paths: paths.into_iter().map(Into::into).collect(),
    });
}

/// Returns the ordered snapshot of all conversion records.
#[tauri::command]
pub fn get_results(state: State<'_, AppState>) -> Vec<ConversionRecord> {
    state.orchestrator().store().snapshot()
}

/// Clears the results view. Records are never deleted any other way.
#[tauri::command]
pub fn clear_results(state: State<'_, AppState>) {
    debug!("Clearing conversion results");
    state.orchestrator().store().clear();
}
