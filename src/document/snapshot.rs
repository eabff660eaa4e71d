use super::Document;
use crate::layer::{Layer, LayerId, Presentation};
use crate::selection::Selection;

/// Immutable copy of the undoable part of a document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    layers: Vec<Layer>,
    active_layer_id: Option<LayerId>,
    selection: Option<Selection>,
    canvas_size: [u32; 2],
}

impl DocumentSnapshot {
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn active_layer_id(&self) -> Option<LayerId> {
        self.active_layer_id
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn canvas_size(&self) -> [u32; 2] {
        self.canvas_size
    }

    /// True when any layer still carries presentation data
    pub fn has_presentation(&self) -> bool {
        self.layers.iter().any(|layer| !layer.presentation.is_empty())
    }

    /// A copy with every surface back-reference and cached bitmap dropped
    pub fn without_presentation(&self) -> Self {
        let layers = self
            .layers
            .iter()
            .map(|layer| Layer {
                presentation: Presentation::default(),
                ..layer.clone()
            })
            .collect();
        Self {
            layers,
            active_layer_id: self.active_layer_id,
            selection: self.selection.clone(),
            canvas_size: self.canvas_size,
        }
    }
}

/// What [`Document::restore`] had to change beyond the layer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub canvas_resized: bool,
}

impl Document {
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            layers: self.layers.clone(),
            active_layer_id: self.active_layer_id,
            selection: self.selection.clone(),
            canvas_size: self.canvas_size,
        }
    }

    /// Replace layers, active layer and selection in one step.
    ///
    /// The canvas size is only touched when it differs.
    pub fn restore(&mut self, snapshot: &DocumentSnapshot) -> RestoreOutcome {
        let layers = snapshot.layers.clone();
        let selection = snapshot.selection.clone();

        self.layers = layers;
        self.active_layer_id = snapshot.active_layer_id;
        self.selection = selection;
        self.renumber();

        let canvas_resized = self.canvas_size != snapshot.canvas_size;
        if canvas_resized {
            self.canvas_size = snapshot.canvas_size;
        }
        self.bump();
        RestoreOutcome { canvas_resized }
    }
}
