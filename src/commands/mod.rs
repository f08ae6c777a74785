//! Tauri command handlers exposed to the frontend.

pub mod convert;

pub use convert::{clear_results, convert_files, get_results, notify_file_drop};
