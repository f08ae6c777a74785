// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// This is the primary entry point for the WebP Converter application.
// The lib.rs file serves only as a public API for external consumers.

mod commands;
mod core;
mod dragdrop;
mod processing;
mod utils;

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tauri::Manager;

use crate::commands::{clear_results, convert_files, get_results, notify_file_drop};
use crate::core::{AppState, WindowEventNotifier};
use crate::dragdrop::DropDeduplicator;
use crate::processing::{ConversionOrchestrator, CwebpSidecar, SaveDialogPicker, TempStager};

// Import the window-vibrancy crate only on macOS
#[cfg(target_os = "macos")]
use window_vibrancy::{apply_vibrancy, NSVisualEffectMaterial};

fn main() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_thread_names(false) // Remove thread names
        .with_target(false)       // Remove module path
        .with_ansi(true)         // Keep colored output
        .with_writer(std::io::stdout)
        .compact();              // Use compact formatter instead of pretty

    subscriber.init();

    info!("=== Application Starting ===");

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_process::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_fs::init())
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_os::init())
        .plugin(tauri_plugin_opener::init())
        .invoke_handler(tauri::generate_handler![
            convert_files,
            notify_file_drop,
            get_results,
            clear_results,
        ])
        .setup(|app| {
            let app_handle = app.app_handle().clone();

            // Wire the pipeline: scratch dir, sidecar encoder, save dialog,
            // results event, all owned by a single orchestrator instance.
            let cache_dir = app_handle.path().app_cache_dir()?;
            let orchestrator = Arc::new(ConversionOrchestrator::new(
                TempStager::new(cache_dir),
                Arc::new(CwebpSidecar::new(app_handle.clone())),
                Arc::new(SaveDialogPicker::new(app_handle.clone())),
                Arc::new(WindowEventNotifier::new(app_handle.clone())),
            ));
            debug!("✓ Conversion orchestrator initialized");

            // Single subscription to native drop notifications: the command
            // layer feeds the sender, one consumer task drains it for the
            // lifetime of the process.
            let (drop_tx, drop_rx) = mpsc::unbounded_channel();
            let deduplicator = DropDeduplicator::new(orchestrator.clone());
            tauri::async_runtime::spawn(deduplicator.run(drop_rx));
            debug!("✓ Drop event pipeline started");

            app.manage(AppState::new(orchestrator, drop_tx));

            // Register updater plugin (desktop only)
            #[cfg(desktop)]
            {
                app.handle()
                    .plugin(tauri_plugin_updater::Builder::new().build())
                    .expect("Failed to initialize updater plugin");
                debug!("✓ Updater plugin initialized");
            }

            #[cfg(target_os = "macos")]
            {
                let window = app.get_webview_window("main").unwrap();
                info!("Applying vibrancy effect for macOS");
                // Note: This requires macOSPrivateApi=true in tauri.conf.json
                apply_vibrancy(&window, NSVisualEffectMaterial::HudWindow, None, None)
                    .expect("Failed to apply vibrancy effect on macOS");
            }

            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    info!("Starting application event loop...");
    app.run(|_app_handle, event| {
        if let tauri::RunEvent::Exit = event {
            info!("Application exiting");
        }
    });
}
