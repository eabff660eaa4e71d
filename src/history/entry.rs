use crate::document::DocumentSnapshot;
use crate::util::time;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistoryEntryId(pub u64);

impl fmt::Display for HistoryEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of edit produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Project,
    CreateLayer,
    DeleteLayer,
    DuplicateLayer,
    MoveLayer,
    LayerProperty,
    RenameLayer,
    Transform,
    Selection,
    Clipboard,
    Import,
    Stroke,
    Shape,
    Text,
    Adjustment,
    Canvas,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Project => "Project",
            ActionKind::CreateLayer => "New Layer",
            ActionKind::DeleteLayer => "Delete Layer",
            ActionKind::DuplicateLayer => "Duplicate Layer",
            ActionKind::MoveLayer => "Reorder Layer",
            ActionKind::LayerProperty => "Layer Properties",
            ActionKind::RenameLayer => "Rename Layer",
            ActionKind::Transform => "Transform",
            ActionKind::Selection => "Selection",
            ActionKind::Clipboard => "Clipboard",
            ActionKind::Import => "Import",
            ActionKind::Stroke => "Brush Stroke",
            ActionKind::Shape => "Shape",
            ActionKind::Text => "Text",
            ActionKind::Adjustment => "Adjustment",
            ActionKind::Canvas => "Canvas Size",
        }
    }
}

/// One recorded state of the document
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    id: HistoryEntryId,
    kind: ActionKind,
    description: String,
    timestamp: f64,
    snapshot: DocumentSnapshot,
    compressed: bool,
}

impl HistoryEntry {
    pub(super) fn new(id: HistoryEntryId, kind: ActionKind, description: String, snapshot: DocumentSnapshot) -> Self {
        Self {
            id,
            kind,
            description,
            timestamp: time::now_secs(),
            snapshot,
            compressed: false,
        }
    }

    pub fn id(&self) -> HistoryEntryId {
        self.id
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn snapshot(&self) -> &DocumentSnapshot {
        &self.snapshot
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Swap in a presentation-free snapshot. Idempotent.
    pub(super) fn compress(&mut self) -> bool {
        if self.compressed {
            return false;
        }
        self.snapshot = self.snapshot.without_presentation();
        self.compressed = true;
        true
    }
}
