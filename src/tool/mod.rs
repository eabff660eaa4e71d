//! Interactive tools and the state machine that binds one of them to the
//! rendering surface at a time.

mod controller;
mod gesture;
mod registry;
pub mod types;

pub use controller::{ToolController, ToolState};
pub use gesture::{DragGesture, drag_rect};
pub use registry::ToolRegistry;

use crate::document::Document;
use crate::layer::ShapeGeometry;
use crate::selection::{Selection, SelectionMode};
use crate::surface::{ObjectId, PointerEvent, RenderSurface};
use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies a tool in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToolId {
    Select,
    Brush,
    Pencil,
    Eraser,
    Marquee,
    Shape,
    Text,
    Pan,
}

impl ToolId {
    pub const ALL: [ToolId; 8] = [
        ToolId::Select,
        ToolId::Brush,
        ToolId::Pencil,
        ToolId::Eraser,
        ToolId::Marquee,
        ToolId::Shape,
        ToolId::Text,
        ToolId::Pan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolId::Select => "select",
            ToolId::Brush => "brush",
            ToolId::Pencil => "pencil",
            ToolId::Eraser => "eraser",
            ToolId::Marquee => "marquee",
            ToolId::Shape => "shape",
            ToolId::Text => "text",
            ToolId::Pan => "pan",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolId {
    type Err = crate::error::ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::error::ToolError::UnknownTool(s.to_owned()))
    }
}

/// Per-tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolOptions {
    /// Stroke width of the brush, pencil and eraser
    Brush { width: f32 },
    Marquee { mode: SelectionMode, feather: f32 },
    Shape { geometry: ShapeGeometry },
    Text { font_family: String, font_size: f32 },
}

/// Result of a finished interaction, applied to the document by the editor
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// An object on the surface was clicked
    Picked { object: ObjectId },
    /// A picked object was dragged by `delta`
    Moved { object: ObjectId, delta: Vec2 },
    /// A free-hand stroke in world coordinates. Eraser strokes set `erase`.
    Stroke {
        points: Vec<Pos2>,
        color: Color32,
        width: f32,
        erase: bool,
    },
    Selection(Selection),
    Shape { geometry: ShapeGeometry, bounds: Rect },
    TextBox { bounds: Rect, font_family: String, font_size: f32 },
}

/// An interaction mode that can be bound to the rendering surface.
///
/// `deactivate` must undo every surface change `activate` made, and discard
/// any preview object left behind by an unfinished gesture.
pub trait ToolBehavior {
    fn activate(&mut self, surface: &mut dyn RenderSurface, doc: &Document);

    fn deactivate(&mut self, surface: &mut dyn RenderSurface);

    fn pointer_down(&mut self, _pos: Pos2, _surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        None
    }

    fn pointer_move(&mut self, _pos: Pos2, _surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        None
    }

    fn pointer_up(&mut self, _pos: Pos2, _surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        None
    }

    fn handle_pointer(
        &mut self,
        event: PointerEvent,
        surface: &mut dyn RenderSurface,
        doc: &Document,
    ) -> Option<ToolOutcome> {
        match event {
            PointerEvent::Down(pos) => self.pointer_down(pos, surface, doc),
            PointerEvent::Move(pos) => self.pointer_move(pos, surface, doc),
            PointerEvent::Up(pos) => self.pointer_up(pos, surface, doc),
        }
    }

    fn options(&self) -> Option<ToolOptions> {
        None
    }

    /// Returns false when the options belong to a different tool
    fn set_options(&mut self, _options: ToolOptions) -> bool {
        false
    }
}
