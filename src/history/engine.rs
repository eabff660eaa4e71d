use super::entry::{ActionKind, HistoryEntry, HistoryEntryId};
use super::{HistoryAdvisory, HistoryResult};
use crate::document::{Document, DocumentSnapshot};

/// Default capacity of the history
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Entries further than this behind the cursor get compressed
pub const COMPRESSION_DISTANCE: usize = 10;

/// Linear, bounded undo/redo timeline of document snapshots.
///
/// Each entry holds the document state *after* its action, so the entry under
/// the cursor always matches the live document. Recording a new action drops
/// every entry after the cursor.
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// `None` while the history is empty
    current: Option<usize>,
    max_size: usize,
    compression_distance: usize,
    recording: bool,
    compression_pending: bool,
    next_id: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            current: None,
            max_size: max_size.max(1),
            compression_distance: COMPRESSION_DISTANCE,
            recording: true,
            compression_pending: false,
            next_id: 1,
        }
    }

    pub fn with_compression_distance(mut self, distance: usize) -> Self {
        self.compression_distance = distance;
        self
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_entry(&self) -> Option<&HistoryEntry> {
        self.current.and_then(|index| self.entries.get(index))
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_some_and(|index| index > 0)
    }

    /// Description of the action [`History::undo`] would revert
    pub fn undo_description(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.current_entry().map(|entry| entry.description())
    }

    /// Description of the action [`History::redo`] would reapply
    pub fn redo_description(&self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        let next = self.current.map_or(0, |index| index + 1);
        self.entries.get(next).map(|entry| entry.description())
    }

    pub fn can_redo(&self) -> bool {
        match self.current {
            Some(index) => index + 1 < self.entries.len(),
            None => false,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    pub fn has_pending_compression(&self) -> bool {
        self.compression_pending
    }

    /// Record a new state. Returns `None` while recording is disabled.
    pub fn push_entry(
        &mut self,
        kind: ActionKind,
        description: impl Into<String>,
        snapshot: DocumentSnapshot,
    ) -> Option<HistoryEntryId> {
        if !self.recording {
            return None;
        }

        // The redo branch is gone as soon as something new happens
        let keep = self.current.map_or(0, |index| index + 1);
        if keep < self.entries.len() {
            log::debug!("Discarding {} redo entries", self.entries.len() - keep);
            self.entries.truncate(keep);
        }

        let id = HistoryEntryId(self.next_id);
        self.next_id += 1;
        let description = description.into();
        log::debug!("History push {} {:?}: {}", id, kind, description);
        self.entries.push(HistoryEntry::new(id, kind, description, snapshot));

        if self.entries.len() > self.max_size {
            let evicted = self.entries.remove(0);
            log::debug!("History full, evicted {}", evicted.id());
        }
        self.current = Some(self.entries.len() - 1);
        self.compression_pending = true;
        Some(id)
    }

    pub fn undo(&mut self, doc: &mut Document) -> HistoryResult {
        let Some(index) = self.current.filter(|index| *index > 0) else {
            log::debug!("Undo unavailable");
            return Err(HistoryAdvisory::NothingToUndo);
        };
        self.restore_at(index - 1, doc);
        Ok(index - 1)
    }

    pub fn redo(&mut self, doc: &mut Document) -> HistoryResult {
        if !self.can_redo() {
            log::debug!("Redo unavailable");
            return Err(HistoryAdvisory::NothingToRedo);
        }
        let index = self.current.map_or(0, |index| index + 1);
        self.restore_at(index, doc);
        Ok(index)
    }

    /// Move the cursor directly to `index` and restore that state
    pub fn go_to(&mut self, index: usize, doc: &mut Document) -> HistoryResult {
        if index >= self.entries.len() {
            return Err(HistoryAdvisory::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        self.restore_at(index, doc);
        Ok(index)
    }

    fn restore_at(&mut self, index: usize, doc: &mut Document) {
        let entry = &self.entries[index];
        log::debug!("Restoring history {} ({})", entry.id(), entry.description());
        let outcome = doc.restore(entry.snapshot());
        if outcome.canvas_resized {
            log::debug!("Canvas resized by history restore");
        }
        self.current = Some(index);
    }

    /// Drop presentation data from entries far enough behind the cursor.
    ///
    /// Returns how many entries were compressed. Safe to call any number of times.
    pub fn compress(&mut self) -> usize {
        let Some(current) = self.current else {
            return 0;
        };
        let end = current.saturating_sub(self.compression_distance);
        let compressed = self.entries[..end]
            .iter_mut()
            .map(|entry| entry.compress())
            .filter(|done| *done)
            .count();
        if compressed > 0 {
            log::debug!("Compressed {} history entries", compressed);
        }
        compressed
    }

    /// Run work deferred by [`History::push_entry`]. Called once per frame.
    pub fn run_deferred(&mut self) -> usize {
        if !std::mem::take(&mut self.compression_pending) {
            return 0;
        }
        self.compress()
    }

    /// Change the capacity, trimming the oldest entries if needed
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size.max(1);
        if self.entries.len() <= self.max_size {
            return;
        }
        let trimmed = self.entries.len() - self.max_size;
        self.entries.drain(..trimmed);
        self.current = self.current.map(|index| index.saturating_sub(trimmed));
        log::debug!("History capacity now {}, trimmed {}", self.max_size, trimmed);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
        self.compression_pending = false;
    }
}
