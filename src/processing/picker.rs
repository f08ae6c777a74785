//! Destination prompt for the converted file.

use async_trait::async_trait;
use tauri_plugin_dialog::DialogExt;
use tokio::sync::oneshot;
use tracing::debug;

/// Filter entry shown in the save dialog.
const FILTER_NAME: &str = "WebP Image";
const FILTER_EXTENSIONS: &[&str] = &["webp"];

/// Asks the user where the converted file should be written.
///
/// `None` means the prompt was dismissed without a selection.
#[async_trait]
pub trait DestinationPicker: Send + Sync {
    async fn pick_save_path(&self, suggested_name: &str) -> Option<String>;
}

/// Production picker: the platform save dialog via `tauri-plugin-dialog`.
pub struct SaveDialogPicker {
    app: tauri::AppHandle,
}

impl SaveDialogPicker {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

#[async_trait]
impl DestinationPicker for SaveDialogPicker {
    async fn pick_save_path(&self, suggested_name: &str) -> Option<String> {
        // The dialog API is callback-based; bridge it to async with a oneshot.
        let (tx, rx) = oneshot::channel();
        self.app
            .dialog()
            .file()
            .set_file_name(suggested_name)
            .add_filter(FILTER_NAME, FILTER_EXTENSIONS)
            .save_file(move |path| {
                let _ = tx.send(path);
            });

        match rx.await {
            Ok(Some(path)) => Some(path.to_string()),
            Ok(None) => None,
            Err(_) => {
                debug!("Save dialog closed without a reply");
                None
            }
        }
    }
}
