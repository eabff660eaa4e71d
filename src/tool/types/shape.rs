use crate::document::Document;
use crate::layer::ShapeGeometry;
use crate::surface::{DrawableProps, Primitive, RenderSurface};
use crate::tool::{DragGesture, ToolBehavior, ToolId, ToolOptions, ToolOutcome};
use egui::{CursorIcon, Pos2, Rect};

/// Drag out a rectangle, ellipse, line or polygon
#[derive(Debug)]
pub struct ShapeTool {
    geometry: ShapeGeometry,
    gesture: DragGesture,
}

impl Default for ShapeTool {
    fn default() -> Self {
        Self {
            geometry: ShapeGeometry::Rectangle,
            gesture: DragGesture::default(),
        }
    }
}

fn preview_primitive(geometry: &ShapeGeometry, anchor: Pos2, pos: Pos2) -> Primitive {
    match geometry {
        ShapeGeometry::Rectangle | ShapeGeometry::Path(_) => Primitive::Rect { corner_radius: 0.0 },
        ShapeGeometry::Ellipse => Primitive::Ellipse,
        ShapeGeometry::Line { .. } => Primitive::Line { from: anchor, to: pos },
        ShapeGeometry::Polygon { sides } => Primitive::Polygon { sides: *sides },
    }
}

impl ToolBehavior for ShapeTool {
    fn activate(&mut self, surface: &mut dyn RenderSurface, _doc: &Document) {
        surface.set_cursor(CursorIcon::Crosshair);
        surface.add_pointer_listener(ToolId::Shape);
    }

    fn deactivate(&mut self, surface: &mut dyn RenderSurface) {
        self.gesture.cancel(surface);
        surface.set_cursor(CursorIcon::Default);
        surface.remove_pointer_listener(ToolId::Shape);
    }

    fn pointer_down(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, doc: &Document) -> Option<ToolOutcome> {
        let foreground = doc.colors().foreground();
        let style = DrawableProps {
            fill: Some(foreground.gamma_multiply(0.5)),
            stroke: Some(foreground),
            stroke_width: 1.0,
            ..DrawableProps::new(Rect::NOTHING)
        };
        self.gesture
            .begin(pos, preview_primitive(&self.geometry, pos, pos), style, surface);
        None
    }

    fn pointer_move(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        match (&self.geometry, self.gesture.anchor()) {
            // Lines follow the pointer rather than the normalized rectangle
            (ShapeGeometry::Line { .. }, Some(anchor)) => {
                self.gesture
                    .reshape(pos, preview_primitive(&self.geometry, anchor, pos), surface);
            }
            _ => {
                self.gesture.update(pos, surface);
            }
        }
        None
    }

    fn pointer_up(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        let anchor = self.gesture.anchor()?;
        let bounds = self.gesture.finish(pos, surface)?;
        let geometry = match self.geometry {
            ShapeGeometry::Line { .. } => ShapeGeometry::Line {
                from: Pos2::ZERO + (anchor - bounds.min),
                to: Pos2::ZERO + (pos - bounds.min),
            },
            ref geometry => geometry.clone(),
        };
        Some(ToolOutcome::Shape { geometry, bounds })
    }

    fn options(&self) -> Option<ToolOptions> {
        Some(ToolOptions::Shape {
            geometry: self.geometry.clone(),
        })
    }

    fn set_options(&mut self, options: ToolOptions) -> bool {
        match options {
            ToolOptions::Shape { geometry } => {
                self.geometry = geometry;
                true
            }
            _ => false,
        }
    }
}
