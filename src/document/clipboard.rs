use super::Document;
use crate::layer::{Layer, LayerKind, LayerOverrides};

/// The single clipboard slot
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardItem {
    pub kind: LayerKind,
    /// Deep copy of the layer at copy time
    pub payload: Layer,
}

impl Document {
    pub fn clipboard(&self) -> Option<&ClipboardItem> {
        self.clipboard.as_ref()
    }

    /// Copy the active layer. Returns false when there is no active layer.
    pub fn copy(&mut self) -> bool {
        let Some(layer) = self.active_layer() else {
            return false;
        };
        let item = ClipboardItem {
            kind: layer.kind(),
            payload: layer.clone(),
        };
        log::debug!("Copied layer '{}'", item.payload.name);
        self.clipboard = Some(item);
        true
    }

    /// Copy the active layer, then delete it
    pub fn cut(&mut self) -> bool {
        let Some(id) = self.active_layer_id else {
            return false;
        };
        self.copy() && self.delete_layer(id)
    }

    /// Create a new layer from the clipboard contents. The pasted layer always gets a fresh id.
    pub fn paste(&mut self) -> Option<&Layer> {
        let item = self.clipboard.clone()?;
        Some(self.create_layer(item.kind, LayerOverrides::from_layer(&item.payload)))
    }
}
