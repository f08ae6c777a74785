//! Native drag-and-drop intake: idempotent delivery and serialized dispatch.

mod deduplicator;

pub use deduplicator::{DEFAULT_QUIESCENCE, DropDeduplicator, DropEvent};
