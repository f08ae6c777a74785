// Module declarations in dependency order
pub mod commands;
pub mod core;
pub mod dragdrop;
pub mod processing;
pub mod utils;

// Public exports for external consumers
pub use crate::core::{AppState, ConversionRecord, ConversionStatus, InputFile, ResultStore};
pub use crate::dragdrop::{DropDeduplicator, DropEvent};
pub use crate::processing::{ConversionOrchestrator, TempStager};
pub use crate::utils::{ConverterError, ConverterResult};
pub use crate::commands::*;

// This library file is used as a public API for consuming this crate as a library.
// The actual application entry point is in main.rs.
