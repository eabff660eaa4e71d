use crate::document::Document;
use crate::surface::{DrawableProps, DrawingMode, ObjectId, Primitive, RenderSurface};
use crate::tool::{ToolBehavior, ToolId, ToolOptions, ToolOutcome};
use egui::{Color32, CursorIcon, Pos2, Rect};

pub const DEFAULT_BRUSH_WIDTH: f32 = 5.0;
pub const DEFAULT_PENCIL_WIDTH: f32 = 2.0;
pub const DEFAULT_ERASER_WIDTH: f32 = 20.0;
const MIN_WIDTH: f32 = 0.5;

/// Which free-hand mode a [`BrushTool`] draws in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushKind {
    Brush,
    /// Thin, hard-edged and always fully opaque
    Pencil,
    /// Strokes remove paint; color is ignored
    Eraser,
}

impl BrushKind {
    pub fn tool_id(&self) -> ToolId {
        match self {
            BrushKind::Brush => ToolId::Brush,
            BrushKind::Pencil => ToolId::Pencil,
            BrushKind::Eraser => ToolId::Eraser,
        }
    }

    pub fn default_width(&self) -> f32 {
        match self {
            BrushKind::Brush => DEFAULT_BRUSH_WIDTH,
            BrushKind::Pencil => DEFAULT_PENCIL_WIDTH,
            BrushKind::Eraser => DEFAULT_ERASER_WIDTH,
        }
    }
}

/// Free-hand drawing
#[derive(Debug)]
pub struct BrushTool {
    kind: BrushKind,
    width: f32,
    color: Color32,
    // Transient state: the stroke being drawn (if any)
    points: Vec<Pos2>,
    preview: Option<ObjectId>,
}

impl Default for BrushTool {
    fn default() -> Self {
        Self::new(BrushKind::Brush)
    }
}

impl BrushTool {
    pub fn new(kind: BrushKind) -> Self {
        Self {
            kind,
            width: kind.default_width(),
            color: Color32::BLACK,
            points: Vec::new(),
            preview: None,
        }
    }

    pub fn pencil() -> Self {
        Self::new(BrushKind::Pencil)
    }

    pub fn eraser() -> Self {
        Self::new(BrushKind::Eraser)
    }

    pub fn kind(&self) -> BrushKind {
        self.kind
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    fn drawing_mode(&self) -> DrawingMode {
        match self.kind {
            BrushKind::Brush => DrawingMode::Brush {
                color: self.color,
                width: self.width,
            },
            BrushKind::Pencil => DrawingMode::Pencil {
                color: self.color,
                width: self.width,
            },
            BrushKind::Eraser => DrawingMode::Eraser { width: self.width },
        }
    }

    fn preview_props(&self) -> DrawableProps {
        DrawableProps {
            stroke: Some(self.color),
            stroke_width: self.width,
            erase: self.kind == BrushKind::Eraser,
            ..DrawableProps::new(Rect::from_points(&self.points))
        }
    }

    fn clear_stroke(&mut self, surface: &mut dyn RenderSurface) {
        if let Some(preview) = self.preview.take() {
            surface.remove_object(preview);
        }
        self.points.clear();
    }
}

impl ToolBehavior for BrushTool {
    fn activate(&mut self, surface: &mut dyn RenderSurface, doc: &Document) {
        self.color = match self.kind {
            BrushKind::Brush => doc.colors().foreground(),
            BrushKind::Pencil => doc.colors().foreground().to_opaque(),
            BrushKind::Eraser => Color32::WHITE,
        };
        surface.set_drawing_mode(self.drawing_mode());
        surface.set_cursor(CursorIcon::Crosshair);
        surface.add_pointer_listener(self.kind.tool_id());
    }

    fn deactivate(&mut self, surface: &mut dyn RenderSurface) {
        self.clear_stroke(surface);
        surface.set_drawing_mode(DrawingMode::Off);
        surface.set_cursor(CursorIcon::Default);
        surface.remove_pointer_listener(self.kind.tool_id());
    }

    fn pointer_down(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        self.clear_stroke(surface);
        self.points.push(pos);
        let primitive = Primitive::Path {
            points: self.points.clone(),
        };
        self.preview = Some(surface.create_object(primitive, self.preview_props()));
        None
    }

    fn pointer_move(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        let preview = self.preview?;
        self.points.push(pos);
        let primitive = Primitive::Path {
            points: self.points.clone(),
        };
        surface.update_object(preview, Some(primitive), self.preview_props());
        None
    }

    fn pointer_up(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        self.preview?;
        if self.points.last() != Some(&pos) {
            self.points.push(pos);
        }
        let points = std::mem::take(&mut self.points);
        self.clear_stroke(surface);
        Some(ToolOutcome::Stroke {
            points,
            color: self.color,
            width: self.width,
            erase: self.kind == BrushKind::Eraser,
        })
    }

    fn options(&self) -> Option<ToolOptions> {
        Some(ToolOptions::Brush { width: self.width })
    }

    fn set_options(&mut self, options: ToolOptions) -> bool {
        match options {
            ToolOptions::Brush { width } => {
                self.width = width.max(MIN_WIDTH);
                true
            }
            _ => false,
        }
    }
}
