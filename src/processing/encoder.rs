//! External encoder invocation.

use async_trait::async_trait;
use std::path::Path;
use tauri_plugin_shell::ShellExt;
use tracing::debug;

use crate::core::EncoderOutput;
use crate::utils::{ConverterError, ConverterResult};

/// Name of the bundled encoder binary (see `externalBin` in tauri.conf.json).
const SIDECAR_NAME: &str = "cwebp";

/// Spawns the external encoder once per file and reports its exit.
///
/// Implementations must pass exactly the input path and `-o <output>`; no
/// quality or tuning flags are wired through in this version.
#[async_trait]
pub trait Encoder: Send + Sync {
    async fn run(&self, input_path: &Path, output_path: &Path) -> ConverterResult<EncoderOutput>;
}

/// Production encoder: runs the bundled `cwebp` sidecar process.
pub struct CwebpSidecar {
    app: tauri::AppHandle,
}

impl CwebpSidecar {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

#[async_trait]
impl Encoder for CwebpSidecar {
    async fn run(&self, input_path: &Path, output_path: &Path) -> ConverterResult<EncoderOutput> {
        let input = input_path.to_string_lossy().to_string();
        let output = output_path.to_string_lossy().to_string();

        let command = self
            .app
            .shell()
            .sidecar(SIDECAR_NAME)
            .map_err(|e| {
                ConverterError::unexpected(format!("Failed to resolve {SIDECAR_NAME} sidecar: {e}"))
            })?
            .args([input.as_str(), "-o", output.as_str()]);

        debug!("Running {SIDECAR_NAME} {input} -o {output}");
        // No timeout: a hung encoder blocks the batch until it exits.
        let process_output = command.output().await.map_err(|e| {
            ConverterError::unexpected(format!("Failed to run {SIDECAR_NAME}: {e}"))
        })?;

        Ok(EncoderOutput {
            code: process_output.status.code(),
            stdout: String::from_utf8_lossy(&process_output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&process_output.stderr).into_owned(),
        })
    }
}
