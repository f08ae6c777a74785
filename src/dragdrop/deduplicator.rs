//! Drop-event deduplication and dispatch.
//!
//! Native layers may redeliver the same drop notification, and a user can
//! drop again while a batch is still running. This module makes delivery
//! idempotent and guarantees at most one in-flight drop session: a
//! notification arriving mid-batch is ignored, never queued or merged.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::core::InputFile;
use crate::processing::BatchDispatcher;
use crate::utils::{file_name_or_unknown, mime_for_name};

/// Quiescence window after which seen event ids are forgotten.
///
/// Eviction bounds memory, it is not needed for correctness of a single
/// session: a real duplicate of an in-flight drop arrives well within the
/// window, and after a second of silence the session has completed.
pub const DEFAULT_QUIESCENCE: Duration = Duration::from_secs(1);

/// One native drag-and-drop notification from the webview.
#[derive(Debug, Clone)]
pub struct DropEvent {
    /// Webview event identifier; opaque here, only compared for equality
    pub id: u32,
    /// Absolute filesystem paths of the dropped files
    pub paths: Vec<PathBuf>,
}

/// Consumes the single stream of drop notifications and turns each accepted
/// one into a batch dispatch.
pub struct DropDeduplicator {
    dispatcher: Arc<dyn BatchDispatcher>,
    quiescence: Duration,
    seen: HashSet<u32>,
    last_event_at: Option<Instant>,
    dispatching: Arc<AtomicBool>,
}

impl DropDeduplicator {
    pub fn new(dispatcher: Arc<dyn BatchDispatcher>) -> Self {
        Self::with_quiescence(dispatcher, DEFAULT_QUIESCENCE)
    }

    pub fn with_quiescence(dispatcher: Arc<dyn BatchDispatcher>, quiescence: Duration) -> Self {
        Self {
            dispatcher,
            quiescence,
            seen: HashSet::new(),
            last_event_at: None,
            dispatching: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Consume the drop-event stream until the sending half closes.
    ///
    /// This is the only subscription to native drop notifications; once the
    /// stream ends the intake is torn down for the rest of the process.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<DropEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        debug!("Drop event stream ended");
    }

    /// Decide what to do with one notification, at arrival time.
    ///
    /// The id is recorded as seen before the in-flight check, so a
    /// redelivered duplicate can never race past the gate while a session is
    /// being set up. The session itself runs on a separate task; keeping this
    /// method synchronous is what makes the gate an arrival-time check rather
    /// than a queue.
    pub(crate) fn handle(&mut self, event: DropEvent) {
        let now = Instant::now();
        if let Some(last) = self.last_event_at {
            if now.duration_since(last) >= self.quiescence {
                self.seen.clear();
            }
        }
        self.last_event_at = Some(now);

        if !self.seen.insert(event.id) {
            debug!("Ignoring duplicate delivery of drop event {}", event.id);
            return;
        }

        if self.is_dispatching() || self.dispatcher.batch_in_progress() {
            debug!("Drop event {} arrived mid-batch; ignored", event.id);
            return;
        }

        self.dispatching.store(true, Ordering::Release);
        let dispatcher = Arc::clone(&self.dispatcher);
        let dispatching = Arc::clone(&self.dispatching);
        tokio::spawn(async move {
            let files = read_dropped_files(&event.paths).await;
            if !files.is_empty() {
                if let Err(e) = dispatcher.dispatch(files).await {
                    warn!("Dropped batch was not accepted: {e}");
                }
            }
            dispatching.store(false, Ordering::Release);
        });
    }

    pub(crate) fn is_dispatching(&self) -> bool {
        self.dispatching.load(Ordering::Acquire)
    }
}

/// Read each dropped path into a typed input file.
///
/// An unreadable path is logged and skipped; it never aborts the rest of the
/// session.
async fn read_dropped_files(paths: &[PathBuf]) -> Vec<InputFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let name = file_name_or_unknown(path);
                let mime = Some(mime_for_name(&name).to_string());
                files.push(InputFile { name, mime, bytes });
            }
            Err(e) => {
                warn!("Skipping unreadable dropped path {}: {}", path.display(), e);
            }
        }
    }
    files
}
