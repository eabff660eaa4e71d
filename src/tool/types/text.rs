use super::dashed_outline;
use crate::document::Document;
use crate::layer::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};
use crate::surface::{Primitive, RenderSurface};
use crate::tool::{DragGesture, ToolBehavior, ToolId, ToolOptions, ToolOutcome};
use egui::{CursorIcon, Pos2};

/// Click or drag to place a text box
#[derive(Debug)]
pub struct TextTool {
    font_family: String,
    font_size: f32,
    gesture: DragGesture,
}

impl Default for TextTool {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            font_size: DEFAULT_FONT_SIZE,
            gesture: DragGesture::default(),
        }
    }
}

impl ToolBehavior for TextTool {
    fn activate(&mut self, surface: &mut dyn RenderSurface, _doc: &Document) {
        surface.set_cursor(CursorIcon::Text);
        surface.add_pointer_listener(ToolId::Text);
    }

    fn deactivate(&mut self, surface: &mut dyn RenderSurface) {
        self.gesture.cancel(surface);
        surface.set_cursor(CursorIcon::Default);
        surface.remove_pointer_listener(ToolId::Text);
    }

    fn pointer_down(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        self.gesture
            .begin(pos, Primitive::Rect { corner_radius: 0.0 }, dashed_outline(), surface);
        None
    }

    fn pointer_move(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        self.gesture.update(pos, surface);
        None
    }

    fn pointer_up(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        let bounds = self.gesture.finish(pos, surface)?;
        Some(ToolOutcome::TextBox {
            bounds,
            font_family: self.font_family.clone(),
            font_size: self.font_size,
        })
    }

    fn options(&self) -> Option<ToolOptions> {
        Some(ToolOptions::Text {
            font_family: self.font_family.clone(),
            font_size: self.font_size,
        })
    }

    fn set_options(&mut self, options: ToolOptions) -> bool {
        match options {
            ToolOptions::Text { font_family, font_size } => {
                self.font_family = font_family;
                self.font_size = font_size.max(1.0);
                true
            }
            _ => false,
        }
    }
}
