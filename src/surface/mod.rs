//! The narrow contract between the editor core and whatever draws the canvas.
//!
//! The core only ever creates, updates, removes and reorders drawables, flips a
//! handful of interaction toggles, and receives pointer events in world space.
//! [`Scene`] is an in-memory implementation used by the egui canvas and by tests.

mod scene;

pub use scene::{Scene, SceneObject};

use crate::layer::{BlendMode, PixelStorageId};
use crate::tool::ToolId;
use egui::{Color32, CursorIcon, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Identifier of a drawable object on the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// The kind of primitive a drawable is built from
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Image { storage: Option<PixelStorageId> },
    Rect { corner_radius: f32 },
    Ellipse,
    /// Segment between two world points
    Line { from: Pos2, to: Pos2 },
    Polygon { sides: u32 },
    Path { points: Vec<Pos2> },
    Text { content: String, font_size: f32 },
    /// Non-painting placeholder for groups and adjustments
    Group,
}

impl Primitive {
    /// Whether an existing object can be updated in place to this primitive
    pub fn same_variant(&self, other: &Primitive) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Mutable properties of a drawable
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableProps {
    pub bounds: Rect,
    pub visible: bool,
    /// 0.0..=1.0
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub fill: Option<Color32>,
    pub stroke: Option<Color32>,
    pub stroke_width: f32,
    /// Dashed outline, used for marquee previews
    pub dashed: bool,
    /// Removes what is painted below instead of covering it
    pub erase: bool,
}

impl DrawableProps {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            visible: true,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            dashed: false,
            erase: false,
        }
    }
}

/// Free-drawing configuration of the surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DrawingMode {
    #[default]
    Off,
    Brush { color: Color32, width: f32 },
    /// Hard-edged, fully opaque
    Pencil { color: Color32, width: f32 },
    Eraser { width: f32 },
}

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 8.0;
/// Factor applied by one zoom in / zoom out step
pub const ZOOM_STEP: f32 = 1.2;

/// Pointer events in world (canvas) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
}

impl PointerEvent {
    pub fn pos(&self) -> Pos2 {
        match self {
            PointerEvent::Down(pos) | PointerEvent::Move(pos) | PointerEvent::Up(pos) => *pos,
        }
    }
}

/// Operations the editor core issues against the rendering surface.
pub trait RenderSurface {
    fn create_object(&mut self, primitive: Primitive, props: DrawableProps) -> ObjectId;

    /// Returns false when `id` is unknown
    fn remove_object(&mut self, id: ObjectId) -> bool;

    /// Returns false when `id` is unknown
    fn update_object(&mut self, id: ObjectId, primitive: Option<Primitive>, props: DrawableProps) -> bool;

    /// Paint order, bottom first. Objects not listed keep their relative order above these.
    fn reorder(&mut self, order: &[ObjectId]);

    /// Topmost object whose bounds contain `pos`
    fn hit_test(&self, pos: Pos2) -> Option<ObjectId>;

    fn set_drawing_mode(&mut self, mode: DrawingMode);

    /// Enable click-to-select of surface objects
    fn set_object_selection(&mut self, enabled: bool);

    fn set_cursor(&mut self, cursor: CursorIcon);

    /// Route pointer events to `tool`
    fn add_pointer_listener(&mut self, tool: ToolId);

    fn remove_pointer_listener(&mut self, tool: ToolId);

    /// Shift the viewport so the canvas moves by `delta` world units
    fn pan_by(&mut self, delta: Vec2);

    /// Scale of the viewport, clamped to `MIN_ZOOM..=MAX_ZOOM`
    fn set_zoom(&mut self, zoom: f32);
}

/// The surface as shared between the tool controller, the bridge and the canvas view.
///
/// Everything runs on one thread, so a `RefCell` is enough.
pub type SharedSurface = Rc<RefCell<dyn RenderSurface>>;
