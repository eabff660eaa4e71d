mod engine;
mod entry;

pub use engine::{COMPRESSION_DISTANCE, DEFAULT_MAX_HISTORY, History};
pub use entry::{ActionKind, HistoryEntry, HistoryEntryId};

pub use crate::error::HistoryAdvisory;

/// Result type for history navigation. `Ok` carries the new cursor position.
pub type HistoryResult = Result<usize, HistoryAdvisory>;
