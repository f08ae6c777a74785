//! Sequential batch conversion pipeline.
//!
//! Turns an ordered batch of input files into stage -> prompt -> encode ->
//! report -> cleanup steps, one file at a time. The external encoder is
//! treated as a possibly resource-heavy, non-reentrant tool, so there is no
//! intra-batch parallelism and only one batch may be in flight at a time.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

use crate::core::{InputFile, ResultStore, ResultsNotifier};
use crate::processing::encoder::Encoder;
use crate::processing::picker::DestinationPicker;
use crate::processing::stager::TempStager;
use crate::utils::{ConverterError, ConverterResult, with_webp_extension};

/// Recorded when the encoder fails without writing anything to stderr.
const GENERIC_ENCODE_FAILURE: &str = "Conversion failed";

/// Dispatch target for the drop pipeline.
///
/// Lets the deduplicator hand batches over without knowing the concrete
/// orchestrator, and lets its tests script the far side.
#[async_trait]
pub trait BatchDispatcher: Send + Sync {
    /// Whether a batch is currently mid-flight.
    fn batch_in_progress(&self) -> bool;

    /// Hand an ordered batch over for sequential conversion.
    async fn dispatch(&self, files: Vec<InputFile>) -> ConverterResult<()>;
}

pub struct ConversionOrchestrator {
    store: ResultStore,
    stager: TempStager,
    encoder: Arc<dyn Encoder>,
    picker: Arc<dyn DestinationPicker>,
    notifier: Arc<dyn ResultsNotifier>,
    busy: AtomicBool,
}

/// Releases the batch gate when the batch scope ends, on every exit path.
struct BatchGuard<'a>(&'a AtomicBool);

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Outcome of a successful stage-prompt-encode run for one file.
struct EncodeOutcome {
    output_path: String,
    seconds: f64,
}

impl ConversionOrchestrator {
    pub fn new(
        stager: TempStager,
        encoder: Arc<dyn Encoder>,
        picker: Arc<dyn DestinationPicker>,
        notifier: Arc<dyn ResultsNotifier>,
    ) -> Self {
        Self {
            store: ResultStore::new(),
            stager,
            encoder,
            picker,
            notifier,
            busy: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Whether a batch is currently in flight.
    pub fn in_progress(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Convert a batch of files strictly in input order.
    ///
    /// Fails fast with [`ConverterError::BatchInProgress`] when another batch
    /// holds the gate. Otherwise every file is driven to a terminal record —
    /// a per-file failure never aborts the batch — and the call returns `Ok`
    /// regardless of how many files individually failed.
    pub async fn convert_batch(&self, files: Vec<InputFile>) -> ConverterResult<()> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ConverterError::BatchInProgress);
        }
        let _gate = BatchGuard(&self.busy);

        info!("Converting batch of {} file(s)", files.len());
        for file in files {
            self.convert_file(file).await;
        }
        Ok(())
    }

    /// Drive one file to a terminal record.
    ///
    /// The record is inserted and advanced to `Converting` before any I/O so
    /// observers see it immediately. Every failure becomes the record's
    /// message; nothing escapes to the batch loop.
    async fn convert_file(&self, file: InputFile) {
        let id = self.store.insert_queued(&file.name);
        self.notify();
        self.store.mark_converting(id);
        self.notify();

        match self.stage_and_encode(&file).await {
            Ok(outcome) => {
                let message = format!("Converted successfully in {:.2}s", outcome.seconds);
                self.store
                    .complete(id, &outcome.output_path, &message, outcome.seconds);
                debug!(
                    "'{}' -> {} ({:.2}s)",
                    file.name, outcome.output_path, outcome.seconds
                );
            }
            Err(e) => {
                self.store.fail(id, &e.to_string());
                debug!("'{}' failed: {}", file.name, e);
            }
        }
        self.notify();
    }

    /// Stage, prompt, encode. Once staging has succeeded the staged file is
    /// removed on every exit path before the result is returned.
    async fn stage_and_encode(&self, file: &InputFile) -> ConverterResult<EncodeOutcome> {
        let staged = self.stager.stage(&file.bytes, &file.name).await?;
        let result = self.encode_staged(&staged, &file.name).await;
        self.stager.cleanup(&staged).await;
        result
    }

    async fn encode_staged(
        &self,
        staged: &Path,
        original_name: &str,
    ) -> ConverterResult<EncodeOutcome> {
        let suggested = with_webp_extension(original_name);
        let Some(output_path) = self.picker.pick_save_path(&suggested).await else {
            return Err(ConverterError::Cancelled);
        };

        let started = Instant::now();
        let output = self.encoder.run(staged, Path::new(&output_path)).await?;
        let seconds = round_hundredths(started.elapsed().as_secs_f64());

        if output.success() {
            Ok(EncodeOutcome {
                output_path,
                seconds,
            })
        } else {
            let stderr = output.stderr.trim();
            let message = if stderr.is_empty() {
                GENERIC_ENCODE_FAILURE.to_string()
            } else {
                stderr.to_string()
            };
            Err(ConverterError::encode(message))
        }
    }

    fn notify(&self) {
        self.notifier.results_changed(&self.store.snapshot());
    }
}

#[async_trait]
impl BatchDispatcher for ConversionOrchestrator {
    fn batch_in_progress(&self) -> bool {
        self.in_progress()
    }

    async fn dispatch(&self, files: Vec<InputFile>) -> ConverterResult<()> {
        self.convert_batch(files).await
    }
}

/// Two-decimal rounding to match the elapsed-time display format.
fn round_hundredths(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConversionRecord, ConversionStatus, EncoderOutput};
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use tokio::sync::oneshot;

    struct ScriptedEncoder {
        code: i32,
        stderr: &'static str,
        calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    }

    impl ScriptedEncoder {
        fn exiting(code: i32, stderr: &'static str) -> Arc<Self> {
            Arc::new(Self {
                code,
                stderr,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Encoder for ScriptedEncoder {
        async fn run(&self, input: &Path, output: &Path) -> ConverterResult<EncoderOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((input.to_path_buf(), output.to_path_buf()));
            Ok(EncoderOutput {
                code: Some(self.code),
                stdout: String::new(),
                stderr: self.stderr.to_string(),
            })
        }
    }

    /// Pops one scripted response per prompt; `None` means cancelled.
    struct ScriptedPicker {
        responses: Mutex<VecDeque<Option<String>>>,
    }

    impl ScriptedPicker {
        fn with(responses: Vec<Option<&str>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|r| r.map(str::to_string))
                        .collect(),
                ),
            })
        }
    }

    #[async_trait]
    impl DestinationPicker for ScriptedPicker {
        async fn pick_save_path(&self, _suggested_name: &str) -> Option<String> {
            self.responses.lock().unwrap().pop_front().flatten()
        }
    }

    /// Blocks the first prompt until released, then answers with a fixed path.
    struct BlockingPicker {
        gate: Mutex<Option<oneshot::Receiver<()>>>,
        path: String,
    }

    #[async_trait]
    impl DestinationPicker for BlockingPicker {
        async fn pick_save_path(&self, _suggested_name: &str) -> Option<String> {
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Some(self.path.clone())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        snapshots: Mutex<Vec<Vec<ConversionRecord>>>,
    }

    impl ResultsNotifier for RecordingNotifier {
        fn results_changed(&self, records: &[ConversionRecord]) {
            self.snapshots.lock().unwrap().push(records.to_vec());
        }
    }

    fn orchestrator(
        dir: &TempDir,
        encoder: Arc<ScriptedEncoder>,
        picker: Arc<dyn DestinationPicker>,
    ) -> ConversionOrchestrator {
        ConversionOrchestrator::new(
            TempStager::new(dir.path().to_path_buf()),
            encoder,
            picker,
            Arc::new(RecordingNotifier::default()),
        )
    }

    fn cache_is_empty(dir: &TempDir) -> bool {
        std::fs::read_dir(dir.path()).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn successful_file_ends_with_a_success_record() {
        let dir = TempDir::new().unwrap();
        let encoder = ScriptedEncoder::exiting(0, "");
        let picker = ScriptedPicker::with(vec![Some("/out/photo.webp")]);
        let orch = orchestrator(&dir, encoder.clone(), picker);

        orch.convert_batch(vec![InputFile::new("photo.png", b"bytes".to_vec())])
            .await
            .unwrap();

        let record = &orch.store().snapshot()[0];
        assert_eq!(record.original_name, "photo.png");
        assert_eq!(record.output_path, "/out/photo.webp");
        assert_eq!(record.status, ConversionStatus::Success);
        assert!(record.message.starts_with("Converted successfully in"));
        assert!(record.conversion_time.is_some());

        // The encoder saw the staged copy, not the original name.
        let calls = encoder.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let staged_name = calls[0].0.file_name().unwrap().to_str().unwrap();
        assert!(staged_name.starts_with("input_"));
        assert!(staged_name.ends_with("_photo.png"));
        assert_eq!(calls[0].1, PathBuf::from("/out/photo.webp"));

        assert!(cache_is_empty(&dir));
        assert!(!orch.in_progress());
    }

    #[tokio::test]
    async fn cancelled_prompt_skips_the_encoder() {
        let dir = TempDir::new().unwrap();
        let encoder = ScriptedEncoder::exiting(0, "");
        let picker = ScriptedPicker::with(vec![None]);
        let orch = orchestrator(&dir, encoder.clone(), picker);

        orch.convert_batch(vec![InputFile::new("photo.png", b"bytes".to_vec())])
            .await
            .unwrap();

        let record = &orch.store().snapshot()[0];
        assert_eq!(record.status, ConversionStatus::Error);
        assert_eq!(record.message, "Cancelled by user");
        assert!(record.output_path.is_empty());
        assert_eq!(encoder.call_count(), 0);
        assert!(cache_is_empty(&dir));
    }

    #[tokio::test]
    async fn encoder_failure_surfaces_stderr() {
        let dir = TempDir::new().unwrap();
        let encoder = ScriptedEncoder::exiting(2, "bad format");
        let picker = ScriptedPicker::with(vec![Some("/out/photo.webp")]);
        let orch = orchestrator(&dir, encoder, picker);

        orch.convert_batch(vec![InputFile::new("photo.png", b"bytes".to_vec())])
            .await
            .unwrap();

        let record = &orch.store().snapshot()[0];
        assert_eq!(record.status, ConversionStatus::Error);
        assert_eq!(record.message, "bad format");
        assert!(cache_is_empty(&dir));
    }

    #[tokio::test]
    async fn silent_encoder_failure_gets_the_generic_message() {
        let dir = TempDir::new().unwrap();
        let encoder = ScriptedEncoder::exiting(1, "");
        let picker = ScriptedPicker::with(vec![Some("/out/photo.webp")]);
        let orch = orchestrator(&dir, encoder, picker);

        orch.convert_batch(vec![InputFile::new("photo.png", b"bytes".to_vec())])
            .await
            .unwrap();

        assert_eq!(orch.store().snapshot()[0].message, "Conversion failed");
    }

    #[tokio::test]
    async fn staging_failure_does_not_abort_the_batch() {
        let dir = TempDir::new().unwrap();
        let encoder = ScriptedEncoder::exiting(0, "");
        let picker = ScriptedPicker::with(vec![Some("/out/a.webp"), Some("/out/b.webp")]);
        let orch = orchestrator(&dir, encoder.clone(), picker);

        // A name with a path separator lands in a directory that does not
        // exist, so the staged write fails for this file only.
        orch.convert_batch(vec![
            InputFile::new("missing-dir/a.png", b"a".to_vec()),
            InputFile::new("b.png", b"b".to_vec()),
        ])
        .await
        .unwrap();

        let snapshot = orch.store().snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].status, ConversionStatus::Error);
        assert!(snapshot[0].message.starts_with("Staging failed"));
        assert_eq!(snapshot[1].status, ConversionStatus::Success);
        assert_eq!(encoder.call_count(), 1);
        assert!(cache_is_empty(&dir));
    }

    #[tokio::test]
    async fn every_file_ends_terminal_in_input_order() {
        let dir = TempDir::new().unwrap();
        let encoder = ScriptedEncoder::exiting(0, "");
        // Second prompt cancelled, the others answered.
        let picker =
            ScriptedPicker::with(vec![Some("/out/a.webp"), None, Some("/out/c.webp")]);
        let orch = orchestrator(&dir, encoder, picker);

        orch.convert_batch(vec![
            InputFile::new("a.png", b"a".to_vec()),
            InputFile::new("b.png", b"b".to_vec()),
            InputFile::new("c.png", b"c".to_vec()),
        ])
        .await
        .unwrap();

        let snapshot = orch.store().snapshot();
        assert_eq!(snapshot.len(), 3);
        let names: Vec<_> = snapshot.iter().map(|r| r.original_name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png", "c.png"]);
        assert!(snapshot.iter().all(|r| r.status.is_terminal()));
        assert_eq!(snapshot[1].message, "Cancelled by user");
    }

    #[tokio::test]
    async fn a_file_reaches_terminal_state_before_the_next_one_starts() {
        let dir = TempDir::new().unwrap();
        let encoder = ScriptedEncoder::exiting(0, "");
        let picker = ScriptedPicker::with(vec![Some("/out/a.webp"), Some("/out/b.webp")]);
        let notifier = Arc::new(RecordingNotifier::default());
        let orch = ConversionOrchestrator::new(
            TempStager::new(dir.path().to_path_buf()),
            encoder,
            picker,
            notifier.clone(),
        );

        orch.convert_batch(vec![
            InputFile::new("a.png", b"a".to_vec()),
            InputFile::new("b.png", b"b".to_vec()),
        ])
        .await
        .unwrap();

        // In the first snapshot where the second file shows up as converting,
        // the first file must already be terminal.
        let snapshots = notifier.snapshots.lock().unwrap();
        let second_converting = snapshots
            .iter()
            .find(|s| s.len() == 2 && s[1].status == ConversionStatus::Converting)
            .expect("second file never reached converting");
        assert!(second_converting[0].status.is_terminal());
    }

    #[tokio::test]
    async fn a_second_batch_is_rejected_while_one_is_in_flight() {
        let dir = TempDir::new().unwrap();
        let encoder = ScriptedEncoder::exiting(0, "");
        let (release, gate) = oneshot::channel();
        let picker = Arc::new(BlockingPicker {
            gate: Mutex::new(Some(gate)),
            path: "/out/a.webp".to_string(),
        });
        let orch = Arc::new(orchestrator(&dir, encoder, picker));

        let background = {
            let orch = orch.clone();
            tokio::spawn(async move {
                orch.convert_batch(vec![InputFile::new("a.png", b"a".to_vec())])
                    .await
            })
        };

        while !orch.in_progress() {
            tokio::task::yield_now().await;
        }

        let rejected = orch
            .convert_batch(vec![InputFile::new("b.png", b"b".to_vec())])
            .await;
        assert!(matches!(rejected, Err(ConverterError::BatchInProgress)));
        // The in-flight batch's records are untouched by the rejected call.
        assert_eq!(orch.store().len(), 1);

        release.send(()).unwrap();
        background.await.unwrap().unwrap();

        assert!(!orch.in_progress());
        assert_eq!(orch.store().snapshot()[0].status, ConversionStatus::Success);
    }

    #[test]
    fn elapsed_seconds_round_to_hundredths() {
        assert_eq!(round_hundredths(0.42137), 0.42);
        assert_eq!(round_hundredths(1.005), 1.0); // float repr of 1.005 is just below
        assert_eq!(round_hundredths(2.999), 3.0);
    }
}
