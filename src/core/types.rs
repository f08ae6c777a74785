//! Core types for conversion inputs and per-file results.

use serde::{Deserialize, Serialize};

use crate::utils::mime_for_name;

/// Lifecycle state of one file's conversion.
///
/// Transitions are strictly forward: `Queued -> Converting -> Success | Error`.
/// [`super::ResultStore`] rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStatus {
    Queued,
    Converting,
    Success,
    Error,
}

impl ConversionStatus {
    /// Whether a record in `self` may move to `next`.
    pub fn can_advance_to(self, next: ConversionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Converting)
                | (Self::Converting, Self::Success)
                | (Self::Converting, Self::Error)
        )
    }

    /// Success and Error are terminal; no further transitions occur.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

/// One file's conversion outcome as shown in the results view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// Display name of the input file
    #[serde(rename = "originalName")]
    pub original_name: String,
    /// Destination path, set only on success
    #[serde(rename = "outputPath")]
    pub output_path: String,
    /// Current lifecycle state
    pub status: ConversionStatus,
    /// Human-readable outcome detail, set on terminal states
    pub message: String,
    /// Wall-clock seconds of the encode step, set only on success
    #[serde(rename = "conversionTime")]
    pub conversion_time: Option<f64>,
}

impl ConversionRecord {
    pub fn queued(original_name: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            output_path: String::new(),
            status: ConversionStatus::Queued,
            message: String::new(),
            conversion_time: None,
        }
    }
}

/// A typed input file; both input channels converge on this.
///
/// The picker channel carries it over IPC directly, the drop channel
/// reconstructs it from a path read plus the mime classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputFile {
    pub name: String,
    /// MIME string; reconstructed from the extension when the source channel
    /// did not provide one
    #[serde(default)]
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = Some(mime_for_name(&name).to_string());
        Self { name, mime, bytes }
    }
}

/// Captured outcome of one external encoder invocation.
#[derive(Debug, Clone)]
pub struct EncoderOutput {
    /// Process exit code; `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl EncoderOutput {
    /// Exit code 0 is the only success signal.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}
