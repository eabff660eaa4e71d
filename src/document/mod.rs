//! The editable document: layers, active layer, selection, colors and project info.
//!
//! Every mutation keeps the layer list in paint order (index == z-index) and
//! bumps [`Document::revision`] so the rendering bridge can tell when to
//! reconcile. Operations that reference a missing layer return `false` / `None`
//! and leave the document untouched.

mod clipboard;
mod project;
mod snapshot;

pub use clipboard::ClipboardItem;
pub use project::{ColorMode, FORMAT_VERSION, NewProjectOptions, ProjectInfo, ProjectRecord};
pub use snapshot::{DocumentSnapshot, RestoreOutcome};

use crate::color::ColorState;
use crate::error::{ProjectError, ProjectResult};
use crate::layer::{
    BlendMode, Layer, LayerContent, LayerId, LayerKind, LayerOverrides, Presentation,
};
use crate::selection::Selection;
use crate::util::time;
use egui::{Color32, Pos2, Rect, Vec2};

pub const DEFAULT_CANVAS_SIZE: [u32; 2] = [800, 600];
pub const BACKGROUND_LAYER_NAME: &str = "Background";

const DEFAULT_TEXT_SIZE: Vec2 = Vec2::new(200.0, 50.0);
const DEFAULT_SHAPE_SIZE: Vec2 = Vec2::new(100.0, 100.0);

/// Direction for [`Document::move_layer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerMove {
    /// One step towards the top of the stack
    Up,
    /// One step towards the bottom
    Down,
    Top,
    Bottom,
}

#[derive(Debug, Clone)]
pub struct Document {
    /// Paint order, bottom first
    layers: Vec<Layer>,
    active_layer_id: Option<LayerId>,
    selection: Option<Selection>,
    /// Width, height in pixels
    canvas_size: [u32; 2],
    colors: ColorState,
    project: ProjectInfo,
    clipboard: Option<ClipboardItem>,
    revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        let [width, height] = DEFAULT_CANVAS_SIZE;
        let mut doc = Self::empty();
        doc.install_project(width, height, NewProjectOptions::default());
        doc
    }
}

impl Document {
    /// A document holding a fresh project of the given size
    pub fn new(width: u32, height: u32, options: NewProjectOptions) -> ProjectResult<Self> {
        let mut doc = Self::empty();
        doc.new_project(width, height, options)?;
        Ok(doc)
    }

    fn empty() -> Self {
        Self {
            layers: Vec::new(),
            active_layer_id: None,
            selection: None,
            canvas_size: DEFAULT_CANVAS_SIZE,
            colors: ColorState::default(),
            project: ProjectInfo::new(NewProjectOptions::default()),
            clipboard: None,
            revision: 0,
        }
    }

    // ---------------------------------------------------------------------
    // Queries

    /// Layers in paint order, bottom first
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn active_layer_id(&self) -> Option<LayerId> {
        self.active_layer_id
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.active_layer_id.and_then(|id| self.layer(id))
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn canvas_size(&self) -> [u32; 2] {
        self.canvas_size
    }

    pub fn canvas_rect(&self) -> Rect {
        let [w, h] = self.canvas_size;
        Rect::from_min_size(Pos2::ZERO, Vec2::new(w as f32, h as f32))
    }

    pub fn colors(&self) -> &ColorState {
        &self.colors
    }

    pub fn project(&self) -> &ProjectInfo {
        &self.project
    }

    /// Increases on every change to document state
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    /// Re-establish index == z-index after any structural change
    fn renumber(&mut self) {
        for (z, layer) in self.layers.iter_mut().enumerate() {
            layer.z_index = z;
        }
    }

    fn with_layer_mut(&mut self, id: LayerId, f: impl FnOnce(&mut Layer)) -> bool {
        let Some(layer) = self.layers.iter_mut().find(|layer| layer.id == id) else {
            log::debug!("Layer {} not found", id);
            return false;
        };
        f(layer);
        layer.touch();
        self.bump();
        true
    }

    // ---------------------------------------------------------------------
    // Layer lifecycle

    /// Create a layer of `kind` on top of the stack and make it active.
    pub fn create_layer(&mut self, kind: LayerKind, overrides: LayerOverrides) -> &Layer {
        let name = format!("{} {}", kind.label(), self.layers.len() + 1);
        let content = LayerContent::default_for(kind, self.colors.foreground());
        let mut layer = Layer::new(&name, content);

        let canvas = self.canvas_rect();
        let (position, size) = match kind {
            LayerKind::Raster | LayerKind::Adjustment | LayerKind::Group => (Pos2::ZERO, canvas.size()),
            LayerKind::Text => (canvas.center() - DEFAULT_TEXT_SIZE / 2.0, DEFAULT_TEXT_SIZE),
            LayerKind::Shape => (canvas.center() - DEFAULT_SHAPE_SIZE / 2.0, DEFAULT_SHAPE_SIZE),
        };
        layer.position = position;
        layer.size = size;
        layer.apply_overrides(overrides);

        let id = layer.id;
        log::debug!("Created {:?} layer '{}' ({})", kind, layer.name, id);
        self.layers.push(layer);
        self.renumber();
        self.active_layer_id = Some(id);
        self.bump();

        let index = self.layers.len() - 1;
        &self.layers[index]
    }

    /// Remove a layer. Returns false when `id` is absent.
    pub fn delete_layer(&mut self, id: LayerId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.layers.remove(index);
        for layer in &mut self.layers {
            if let LayerContent::Group(group) = &mut layer.content {
                group.children.retain(|child| *child != id);
            }
        }
        self.renumber();

        if self.active_layer_id == Some(id) {
            self.active_layer_id = if self.layers.is_empty() {
                None
            } else {
                Some(self.layers[index.min(self.layers.len() - 1)].id)
            };
        }
        log::debug!("Deleted layer {}", id);
        self.bump();
        true
    }

    /// Copy a layer under a new id, directly above the source. The copy becomes active.
    pub fn duplicate_layer(&mut self, id: LayerId) -> Option<&Layer> {
        let index = self.index_of(id)?;
        let source = &self.layers[index];
        let now = time::now_secs();
        let copy = Layer {
            id: LayerId::new(),
            name: format!("{} copy", source.name),
            created_at: now,
            updated_at: now,
            presentation: Presentation::default(),
            ..source.clone()
        };
        let copy_id = copy.id;
        self.layers.insert(index + 1, copy);
        self.renumber();
        self.active_layer_id = Some(copy_id);
        self.bump();
        Some(&self.layers[index + 1])
    }

    /// Reposition a layer in paint order. Moving past either end is a no-op.
    pub fn move_layer(&mut self, id: LayerId, direction: LayerMove) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let last = self.layers.len() - 1;
        let target = match direction {
            LayerMove::Up => (index + 1).min(last),
            LayerMove::Down => index.saturating_sub(1),
            LayerMove::Top => last,
            LayerMove::Bottom => 0,
        };
        if target == index {
            return false;
        }
        let layer = self.layers.remove(index);
        self.layers.insert(target, layer);
        self.renumber();
        self.bump();
        true
    }

    pub fn set_active_layer(&mut self, id: LayerId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        if self.active_layer_id != Some(id) {
            self.active_layer_id = Some(id);
            self.bump();
        }
        true
    }

    // ---------------------------------------------------------------------
    // Layer properties

    /// Opacity is clamped to 0..=100
    pub fn set_layer_opacity(&mut self, id: LayerId, opacity: i32) -> bool {
        let opacity = opacity.clamp(0, 100) as u8;
        self.with_layer_mut(id, |layer| layer.opacity = opacity)
    }

    pub fn set_layer_blend_mode(&mut self, id: LayerId, blend_mode: BlendMode) -> bool {
        self.with_layer_mut(id, |layer| layer.blend_mode = blend_mode)
    }

    pub fn set_layer_visibility(&mut self, id: LayerId, visible: bool) -> bool {
        self.with_layer_mut(id, |layer| layer.visible = visible)
    }

    pub fn set_layer_locked(&mut self, id: LayerId, locked: bool) -> bool {
        self.with_layer_mut(id, |layer| layer.locked = locked)
    }

    pub fn rename_layer(&mut self, id: LayerId, name: impl Into<String>) -> bool {
        let name = name.into();
        self.with_layer_mut(id, |layer| layer.name = name)
    }

    pub fn set_layer_bounds(&mut self, id: LayerId, position: Pos2, size: Vec2) -> bool {
        let size = size.max(Vec2::ZERO);
        self.with_layer_mut(id, |layer| {
            layer.position = position;
            layer.size = size;
        })
    }

    pub fn translate_layer(&mut self, id: LayerId, delta: Vec2) -> bool {
        self.with_layer_mut(id, |layer| layer.position += delta)
    }

    /// Replace a layer's payload. Fails when the kinds differ.
    pub fn set_layer_content(&mut self, id: LayerId, content: LayerContent) -> bool {
        let same_kind = self
            .layer(id)
            .is_some_and(|layer| layer.kind() == content.kind());
        if !same_kind {
            return false;
        }
        self.with_layer_mut(id, |layer| layer.content = content)
    }

    /// Attach presentation data. This is not document state and does not bump the revision.
    pub fn set_layer_presentation(&mut self, id: LayerId, presentation: Presentation) -> bool {
        match self.layers.iter_mut().find(|layer| layer.id == id) {
            Some(layer) => {
                layer.presentation = presentation;
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // Selection

    /// Replace the selection. Degenerate (zero-area) selections are discarded.
    pub fn set_selection(&mut self, selection: Selection) -> bool {
        if selection.is_degenerate() {
            log::debug!("Discarding degenerate selection {:?}", selection.bounds());
            return false;
        }
        self.selection = Some(selection);
        self.bump();
        true
    }

    pub fn select_all(&mut self) -> bool {
        self.set_selection(Selection::rectangle(self.canvas_rect()))
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.selection.take().is_none() {
            return false;
        }
        self.bump();
        true
    }

    // ---------------------------------------------------------------------
    // Colors

    pub fn set_foreground_color(&mut self, color: Color32) {
        self.colors.set_foreground(color);
        self.bump();
    }

    pub fn set_background_color(&mut self, color: Color32) {
        self.colors.set_background(color);
        self.bump();
    }

    pub fn swap_colors(&mut self) {
        self.colors.swap();
        self.bump();
    }

    // ---------------------------------------------------------------------
    // Canvas

    pub fn resize_canvas(&mut self, width: u32, height: u32) -> ProjectResult<()> {
        if width == 0 || height == 0 {
            return Err(ProjectError::InvalidCanvas { width, height });
        }
        if self.canvas_size != [width, height] {
            self.canvas_size = [width, height];
            self.bump();
        }
        Ok(())
    }
}
