//! Ordered, append-only store of per-file conversion records.

use std::sync::Mutex;
use tracing::warn;

use crate::core::types::{ConversionRecord, ConversionStatus};

/// Handle to one record in the store.
///
/// Records are addressed by insertion index rather than by file name, so two
/// same-named files in one batch keep independent records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(usize);

/// Append-only collection of conversion records, in batch input order.
///
/// Records are only ever appended and advanced forward through their
/// lifecycle; the whole collection is cleared solely by the user-triggered
/// "clear results" affordance. Mutated from the single orchestrator control
/// flow, read from the command layer, so a plain mutex suffices. The lock is
/// never held across an await point.
#[derive(Debug, Default)]
pub struct ResultStore {
    records: Mutex<Vec<ConversionRecord>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `Queued` record and return its handle.
    pub fn insert_queued(&self, original_name: &str) -> RecordId {
        let mut records = self.records.lock().unwrap();
        records.push(ConversionRecord::queued(original_name));
        RecordId(records.len() - 1)
    }

    /// Advance a record to `Converting`.
    pub fn mark_converting(&self, id: RecordId) {
        self.advance(id, |record| {
            record.status = ConversionStatus::Converting;
        });
    }

    /// Terminate a record as `Success` with its destination and timing.
    pub fn complete(&self, id: RecordId, output_path: &str, message: &str, conversion_time: f64) {
        self.advance(id, |record| {
            record.status = ConversionStatus::Success;
            record.output_path = output_path.to_string();
            record.message = message.to_string();
            record.conversion_time = Some(conversion_time);
        });
    }

    /// Terminate a record as `Error` with a display message.
    pub fn fail(&self, id: RecordId, message: &str) {
        self.advance(id, |record| {
            record.status = ConversionStatus::Error;
            record.message = message.to_string();
        });
    }

    /// Ordered snapshot of all records.
    pub fn snapshot(&self) -> Vec<ConversionRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every record. Only the explicit user affordance calls this.
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }

    fn advance(&self, id: RecordId, mutate: impl FnOnce(&mut ConversionRecord)) {
        let mut records = self.records.lock().unwrap();
        let Some(record) = records.get_mut(id.0) else {
            warn!("No conversion record at index {}", id.0);
            return;
        };

        // Dry-run the mutation on a copy to learn the target status, then
        // apply only if the transition moves forward.
        let mut next = record.clone();
        mutate(&mut next);
        if record.status.can_advance_to(next.status) {
            *record = next;
        } else {
            warn!(
                "Ignoring status regression for '{}': {:?} -> {:?}",
                record.original_name, record.status, next.status
            );
        }
    }
}
