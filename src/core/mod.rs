//! Core application types and state management.
//!
//! This module contains the fundamental types used throughout the application:
//! - [`AppState`]: Application state managed by Tauri
//! - [`ConversionRecord`] / [`ConversionStatus`]: Per-file lifecycle reporting
//! - [`ResultStore`]: Ordered collection of conversion records
//! - [`InputFile`]: The typed file both input channels converge on

mod events;
mod state;
mod store;
mod types;

pub use events::{RESULTS_EVENT, ResultsNotifier, WindowEventNotifier};
pub use state::AppState;
pub use store::{RecordId, ResultStore};
pub use types::{ConversionRecord, ConversionStatus, EncoderOutput, InputFile};
