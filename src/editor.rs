//! Wires the document, history, tools and rendering bridge together.
//!
//! Every undoable operation follows the same shape: mutate the document, and
//! if anything changed, push a snapshot. Undo/redo restore a snapshot and let
//! the bridge reconcile on the next sync.

use crate::bridge::RenderBridge;
use crate::document::{Document, LayerMove, NewProjectOptions, ProjectRecord};
use crate::error::{ProjectResult, ToolError};
use crate::history::{ActionKind, History, HistoryResult};
use crate::layer::{
    BlendMode, LayerContent, LayerId, LayerKind, LayerOverrides, RasterContent, ShapeContent,
    ShapeGeometry, TextContent,
};
use crate::selection::Selection;
use crate::surface::{PointerEvent, SharedSurface};
use crate::tool::{ToolController, ToolId, ToolOptions, ToolOutcome};
use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// User-tunable editor configuration, persisted with the app state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct EditorSettings {
    pub history_size: usize,
    pub compression_distance: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Dots per inch for new projects
    pub resolution: u32,
    pub brush_width: f32,
    pub font_family: String,
    pub font_size: f32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        let [canvas_width, canvas_height] = crate::document::DEFAULT_CANVAS_SIZE;
        Self {
            history_size: crate::history::DEFAULT_MAX_HISTORY,
            compression_distance: crate::history::COMPRESSION_DISTANCE,
            canvas_width,
            canvas_height,
            resolution: 72,
            brush_width: crate::tool::types::DEFAULT_BRUSH_WIDTH,
            font_family: crate::layer::DEFAULT_FONT_FAMILY.to_owned(),
            font_size: crate::layer::DEFAULT_FONT_SIZE,
        }
    }
}

impl EditorSettings {
    pub fn project_options(&self) -> NewProjectOptions {
        NewProjectOptions {
            resolution: self.resolution,
            ..NewProjectOptions::default()
        }
    }
}

const DEFAULT_TEXT_BOX: Vec2 = Vec2::new(200.0, 50.0);
const LINE_WIDTH: f32 = 2.0;

pub struct Editor {
    document: Document,
    history: History,
    tools: ToolController,
    bridge: RenderBridge,
    surface: Option<SharedSurface>,
    settings: EditorSettings,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("document", &self.document.project().name)
            .field("history", &self.history.len())
            .field("tools", &self.tools)
            .field("has_surface", &self.surface.is_some())
            .finish()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl Editor {
    pub fn new(settings: EditorSettings) -> Self {
        let document = match Document::new(
            settings.canvas_width,
            settings.canvas_height,
            settings.project_options(),
        ) {
            Ok(document) => document,
            Err(err) => {
                log::warn!("{err}, falling back to the default canvas");
                Document::default()
            }
        };
        let history = History::new(settings.history_size)
            .with_compression_distance(settings.compression_distance);

        let mut tools = ToolController::default();
        tools.set_options(ToolId::Brush, ToolOptions::Brush {
            width: settings.brush_width,
        });
        tools.set_options(ToolId::Text, ToolOptions::Text {
            font_family: settings.font_family.clone(),
            font_size: settings.font_size,
        });

        let mut editor = Self {
            document,
            history,
            tools,
            bridge: RenderBridge::new(),
            surface: None,
            settings,
        };
        editor.record(ActionKind::Project, "New Project");
        editor
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tools(&self) -> &ToolController {
        &self.tools
    }

    pub fn bridge(&self) -> &RenderBridge {
        &self.bridge
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn set_history_size(&mut self, size: usize) {
        self.settings.history_size = size;
        self.history.set_max_size(size);
    }

    fn record(&mut self, kind: ActionKind, description: impl Into<String>) {
        self.history
            .push_entry(kind, description, self.document.snapshot());
    }

    fn layer_name(&self, id: LayerId) -> String {
        self.document
            .layer(id)
            .map(|layer| layer.name.clone())
            .unwrap_or_default()
    }

    // ---------------------------------------------------------------------
    // Surface

    /// Bind the rendering surface used by tools and the bridge
    pub fn attach_surface(&mut self, surface: SharedSurface) {
        self.bridge.detach();
        self.tools.set_surface(Some(surface.clone()));
        self.surface = Some(surface);
        self.sync();
    }

    pub fn detach_surface(&mut self) {
        self.tools.deactivate_current();
        self.tools.set_surface(None);
        self.bridge.detach();
        self.surface = None;
    }

    /// Reconcile the surface with the document if it changed
    pub fn sync(&mut self) {
        let Some(surface) = self.surface.clone() else {
            return;
        };
        let report = {
            let mut surface_ref = surface.borrow_mut();
            self.bridge.sync_if_changed(&self.document, &mut *surface_ref)
        };
        if report.is_some() {
            self.refresh_presentation();
        }
    }

    fn refresh_presentation(&mut self) {
        let updates: Vec<_> = self
            .document
            .layers()
            .iter()
            .filter_map(|layer| {
                let object = self.bridge.object_for(layer.id);
                (layer.presentation.surface_object != object).then(|| {
                    let mut presentation = layer.presentation.clone();
                    presentation.surface_object = object;
                    (layer.id, presentation)
                })
            })
            .collect();
        for (id, presentation) in updates {
            self.document.set_layer_presentation(id, presentation);
        }
    }

    /// Per-frame housekeeping: deferred history work and surface reconciliation
    pub fn tick(&mut self) {
        self.history.run_deferred();
        self.sync();
    }

    // ---------------------------------------------------------------------
    // Project

    pub fn new_project(&mut self, width: u32, height: u32, options: NewProjectOptions) -> ProjectResult<()> {
        self.document.new_project(width, height, options)?;
        self.history.clear();
        self.record(ActionKind::Project, "New Project");
        self.sync();
        Ok(())
    }

    pub fn load_project(&mut self, record: ProjectRecord) -> ProjectResult<()> {
        let name = record.name.clone();
        self.document.load_project(record)?;
        self.history.clear();
        self.record(ActionKind::Project, format!("Open {name}"));
        self.sync();
        Ok(())
    }

    pub fn save_project(&mut self) -> ProjectRecord {
        self.document.save_project()
    }

    pub fn resize_canvas(&mut self, width: u32, height: u32) -> ProjectResult<()> {
        let before = self.document.canvas_size();
        self.document.resize_canvas(width, height)?;
        if before != self.document.canvas_size() {
            self.record(ActionKind::Canvas, format!("Canvas {width}x{height}"));
        }
        Ok(())
    }

    /// Decode an image into a new raster layer sized to the image
    pub fn import_image(&mut self, name: &str, bytes: &[u8]) -> ProjectResult<LayerId> {
        let imported = self.bridge.pixels_mut().import(bytes)?;
        let [w, h] = imported.size;
        let overrides = LayerOverrides::named(name)
            .with_bounds(Pos2::ZERO, Vec2::new(w as f32, h as f32))
            .with_content(LayerContent::Raster(RasterContent {
                storage: Some(imported.storage),
            }));
        let layer = self.document.create_layer(LayerKind::Raster, overrides);
        let id = layer.id;
        let mut presentation = layer.presentation.clone();
        presentation.thumbnail = Some(imported.thumbnail);
        self.document.set_layer_presentation(id, presentation);
        log::info!("Imported '{}' as layer {} ({}x{})", name, id, w, h);
        self.record(ActionKind::Import, format!("Import {name}"));
        Ok(id)
    }

    // ---------------------------------------------------------------------
    // Layers

    pub fn create_layer(&mut self, kind: LayerKind, overrides: LayerOverrides) -> LayerId {
        let id = self.document.create_layer(kind, overrides).id;
        self.record(ActionKind::CreateLayer, format!("New {}", self.layer_name(id)));
        id
    }

    pub fn delete_layer(&mut self, id: LayerId) -> bool {
        let name = self.layer_name(id);
        let deleted = self.document.delete_layer(id);
        if deleted {
            self.record(ActionKind::DeleteLayer, format!("Delete {name}"));
        }
        deleted
    }

    pub fn duplicate_layer(&mut self, id: LayerId) -> Option<LayerId> {
        let copy = self.document.duplicate_layer(id)?.id;
        self.record(ActionKind::DuplicateLayer, format!("Duplicate {}", self.layer_name(id)));
        Some(copy)
    }

    pub fn move_layer(&mut self, id: LayerId, direction: LayerMove) -> bool {
        let moved = self.document.move_layer(id, direction);
        if moved {
            self.record(ActionKind::MoveLayer, format!("Move {} {:?}", self.layer_name(id), direction));
        }
        moved
    }

    pub fn set_active_layer(&mut self, id: LayerId) -> bool {
        self.document.set_active_layer(id)
    }

    pub fn set_layer_opacity(&mut self, id: LayerId, opacity: i32) -> bool {
        let changed = self.document.set_layer_opacity(id, opacity);
        if changed {
            self.record(ActionKind::LayerProperty, format!("Opacity {}", opacity.clamp(0, 100)));
        }
        changed
    }

    pub fn set_layer_blend_mode(&mut self, id: LayerId, blend_mode: BlendMode) -> bool {
        let changed = self.document.set_layer_blend_mode(id, blend_mode);
        if changed {
            self.record(ActionKind::LayerProperty, format!("Blend {}", blend_mode.label()));
        }
        changed
    }

    pub fn set_layer_visibility(&mut self, id: LayerId, visible: bool) -> bool {
        let changed = self.document.set_layer_visibility(id, visible);
        if changed {
            let what = if visible { "Show" } else { "Hide" };
            self.record(ActionKind::LayerProperty, format!("{what} {}", self.layer_name(id)));
        }
        changed
    }

    pub fn set_layer_locked(&mut self, id: LayerId, locked: bool) -> bool {
        let changed = self.document.set_layer_locked(id, locked);
        if changed {
            let what = if locked { "Lock" } else { "Unlock" };
            self.record(ActionKind::LayerProperty, format!("{what} {}", self.layer_name(id)));
        }
        changed
    }

    pub fn rename_layer(&mut self, id: LayerId, name: &str) -> bool {
        let changed = self.document.rename_layer(id, name);
        if changed {
            self.record(ActionKind::RenameLayer, format!("Rename to {name}"));
        }
        changed
    }

    pub fn set_layer_content(&mut self, id: LayerId, content: LayerContent) -> bool {
        let kind = match content.kind() {
            LayerKind::Text => ActionKind::Text,
            LayerKind::Adjustment => ActionKind::Adjustment,
            _ => ActionKind::LayerProperty,
        };
        let changed = self.document.set_layer_content(id, content);
        if changed {
            self.record(kind, format!("Edit {}", self.layer_name(id)));
        }
        changed
    }

    // ---------------------------------------------------------------------
    // Selection, colors, clipboard

    pub fn set_selection(&mut self, selection: Selection) -> bool {
        let changed = self.document.set_selection(selection);
        if changed {
            self.record(ActionKind::Selection, "Select");
        }
        changed
    }

    pub fn select_all(&mut self) -> bool {
        let changed = self.document.select_all();
        if changed {
            self.record(ActionKind::Selection, "Select All");
        }
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.document.clear_selection();
        if changed {
            self.record(ActionKind::Selection, "Deselect");
        }
        changed
    }

    pub fn set_foreground_color(&mut self, color: Color32) {
        self.document.set_foreground_color(color);
        self.refresh_color_dependent_tool();
    }

    pub fn set_background_color(&mut self, color: Color32) {
        self.document.set_background_color(color);
    }

    pub fn swap_colors(&mut self) {
        self.document.swap_colors();
        self.refresh_color_dependent_tool();
    }

    /// Brush and pencil read the foreground color on activation, so cycle them
    fn refresh_color_dependent_tool(&mut self) {
        let Some(id) = self.tools.active_tool() else {
            return;
        };
        if matches!(id, ToolId::Brush | ToolId::Pencil) {
            if let Err(err) = self.tools.activate(id, &self.document) {
                log::warn!("Could not refresh {id}: {err}");
            }
        }
    }

    pub fn copy(&mut self) -> bool {
        self.document.copy()
    }

    pub fn cut(&mut self) -> bool {
        let name = self
            .document
            .active_layer()
            .map(|layer| layer.name.clone())
            .unwrap_or_default();
        let cut = self.document.cut();
        if cut {
            self.record(ActionKind::Clipboard, format!("Cut {name}"));
        }
        cut
    }

    pub fn paste(&mut self) -> Option<LayerId> {
        let id = self.document.paste()?.id;
        self.record(ActionKind::Clipboard, format!("Paste {}", self.layer_name(id)));
        Some(id)
    }

    // ---------------------------------------------------------------------
    // History

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> HistoryResult {
        let index = self.history.undo(&mut self.document)?;
        self.sync();
        Ok(index)
    }

    pub fn redo(&mut self) -> HistoryResult {
        let index = self.history.redo(&mut self.document)?;
        self.sync();
        Ok(index)
    }

    pub fn go_to_history(&mut self, index: usize) -> HistoryResult {
        let index = self.history.go_to(index, &mut self.document)?;
        self.sync();
        Ok(index)
    }

    // ---------------------------------------------------------------------
    // Tools

    pub fn active_tool(&self) -> Option<ToolId> {
        self.tools.active_tool()
    }

    pub fn activate_tool(&mut self, id: ToolId) -> Result<(), ToolError> {
        self.tools.activate(id, &self.document)
    }

    pub fn activate_tool_by_name(&mut self, name: &str) -> Result<(), ToolError> {
        self.tools.activate_by_name(name, &self.document)
    }

    pub fn deactivate_tool(&mut self) {
        self.tools.deactivate_current();
    }

    pub fn tool_options(&self, id: ToolId) -> Option<ToolOptions> {
        self.tools.options(id)
    }

    /// Takes effect on the tool's next gesture; re-activates it if it is live
    pub fn set_tool_options(&mut self, id: ToolId, options: ToolOptions) -> bool {
        let applied = self.tools.set_options(id, options);
        if applied && self.tools.active_tool() == Some(id) {
            if let Err(err) = self.tools.activate(id, &self.document) {
                log::warn!("Could not re-activate {id}: {err}");
            }
        }
        applied
    }

    /// Feed a pointer event to the active tool and apply whatever it produced
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<ToolOutcome> {
        let outcome = self.tools.handle_pointer(event, &self.document)?;
        self.apply_outcome(outcome.clone());
        Some(outcome)
    }

    /// Turn a finished tool interaction into document operations.
    ///
    /// Returns true when the document changed.
    pub fn apply_outcome(&mut self, outcome: ToolOutcome) -> bool {
        match outcome {
            ToolOutcome::Picked { object } => match self.bridge.layer_for(object) {
                Some(id) => self.document.set_active_layer(id),
                None => false,
            },
            ToolOutcome::Moved { object, delta } => {
                let Some(id) = self.bridge.layer_for(object) else {
                    return false;
                };
                if self.document.layer(id).is_none_or(|layer| layer.locked) {
                    log::debug!("Not moving locked layer {}", id);
                    return false;
                }
                let moved = self.document.translate_layer(id, delta);
                if moved {
                    self.record(ActionKind::Transform, format!("Move {}", self.layer_name(id)));
                }
                moved
            }
            ToolOutcome::Stroke {
                points,
                color,
                width,
                erase,
            } => {
                if points.len() < 2 {
                    return false;
                }
                let bounds = Rect::from_points(&points);
                let local = points.iter().map(|p| Pos2::ZERO + (*p - bounds.min)).collect();
                let content = LayerContent::Shape(ShapeContent {
                    geometry: ShapeGeometry::Path(local),
                    fill: None,
                    stroke: Some(color),
                    stroke_width: width,
                    corner_radius: 0.0,
                    erase,
                });
                let (name, description) = if erase {
                    ("Eraser", "Erase")
                } else {
                    ("Stroke", "Brush Stroke")
                };
                let overrides = LayerOverrides::named(name)
                    .with_bounds(bounds.min, bounds.size())
                    .with_content(content);
                self.document.create_layer(LayerKind::Shape, overrides);
                self.record(ActionKind::Stroke, description);
                true
            }
            ToolOutcome::Selection(selection) => {
                if selection.is_degenerate() {
                    // A click without a drag drops the current selection
                    return self.clear_selection();
                }
                self.set_selection(selection)
            }
            ToolOutcome::Shape { geometry, bounds } => {
                let has_extent = match geometry {
                    ShapeGeometry::Line { .. } => bounds.width() > 0.0 || bounds.height() > 0.0,
                    _ => bounds.width() > 0.0 && bounds.height() > 0.0,
                };
                if !has_extent {
                    return false;
                }
                let label = geometry.label();
                let foreground = self.document.colors().foreground();
                let content = LayerContent::Shape(match geometry {
                    geometry @ ShapeGeometry::Line { .. } => ShapeContent {
                        geometry,
                        fill: None,
                        stroke: Some(foreground),
                        stroke_width: LINE_WIDTH,
                        corner_radius: 0.0,
                        erase: false,
                    },
                    geometry => ShapeContent {
                        geometry,
                        ..ShapeContent::filled(foreground)
                    },
                });
                let overrides = LayerOverrides::named(label)
                    .with_bounds(bounds.min, bounds.size())
                    .with_content(content);
                self.document.create_layer(LayerKind::Shape, overrides);
                self.record(ActionKind::Shape, format!("Draw {label}"));
                true
            }
            ToolOutcome::TextBox {
                bounds,
                font_family,
                font_size,
            } => {
                let size = if bounds.width() > 0.0 && bounds.height() > 0.0 {
                    bounds.size()
                } else {
                    DEFAULT_TEXT_BOX
                };
                let content = LayerContent::Text(TextContent {
                    font_family,
                    font_size,
                    fill: self.document.colors().foreground(),
                    ..TextContent::default()
                });
                let overrides = LayerOverrides::named("Text")
                    .with_bounds(bounds.min, size)
                    .with_content(content);
                self.document.create_layer(LayerKind::Text, overrides);
                self.record(ActionKind::Text, "Add Text");
                true
            }
        }
    }
}
