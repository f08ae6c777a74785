//! The conversion pipeline: staging, destination prompt, encoder invocation,
//! and the orchestrator that sequences them per batch.

mod encoder;
mod orchestrator;
mod picker;
mod stager;

pub use encoder::{CwebpSidecar, Encoder};
pub use orchestrator::{BatchDispatcher, ConversionOrchestrator};
pub use picker::{DestinationPicker, SaveDialogPicker};
pub use stager::TempStager;
