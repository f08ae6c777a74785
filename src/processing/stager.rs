//! Staging of input bytes to the process-owned scratch directory.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tracing::debug;

use crate::utils::{ConverterError, ConverterResult};

/// Writes input bytes to uniquely named files under the app cache directory
/// so the external encoder can read them by path.
#[derive(Debug, Clone)]
pub struct TempStager {
    cache_dir: PathBuf,
}

impl TempStager {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Write `bytes` to `{cache_dir}/input_{unix_millis}_{original_name}`.
    ///
    /// The cache directory is (re)created on every call. The timestamp keeps
    /// same-named files apart across and within a batch; millisecond
    /// granularity is enough for a single-user desktop app.
    pub async fn stage(&self, bytes: &[u8], original_name: &str) -> ConverterResult<PathBuf> {
        fs::create_dir_all(&self.cache_dir).await.map_err(|e| {
            ConverterError::staging(format!("Failed to create cache directory: {e}"))
        })?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let staged = self.cache_dir.join(format!("input_{millis}_{original_name}"));

        fs::write(&staged, bytes)
            .await
            .map_err(|e| ConverterError::staging(format!("Failed to write staged file: {e}")))?;

        debug!("Staged '{}' at {}", original_name, staged.display());
        Ok(staged)
    }

    /// Best-effort removal of a staged file.
    ///
    /// Never raises and never blocks batch progress; a file that is already
    /// gone or unremovable is only worth a debug line.
    pub async fn cleanup(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            debug!("Cleanup of {} skipped: {}", path.display(), e);
        }
    }
}
