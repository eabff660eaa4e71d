use super::dashed_outline;
use crate::document::Document;
use crate::selection::{Selection, SelectionMode};
use crate::surface::{Primitive, RenderSurface};
use crate::tool::{DragGesture, ToolBehavior, ToolId, ToolOptions, ToolOutcome};
use egui::{CursorIcon, Pos2};

/// Drag out a rectangular or elliptical selection
#[derive(Debug, Default)]
pub struct MarqueeTool {
    mode: SelectionMode,
    feather: f32,
    gesture: DragGesture,
}

impl MarqueeTool {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

impl ToolBehavior for MarqueeTool {
    fn activate(&mut self, surface: &mut dyn RenderSurface, _doc: &Document) {
        surface.set_cursor(CursorIcon::Crosshair);
        surface.add_pointer_listener(ToolId::Marquee);
    }

    fn deactivate(&mut self, surface: &mut dyn RenderSurface) {
        self.gesture.cancel(surface);
        surface.set_cursor(CursorIcon::Default);
        surface.remove_pointer_listener(ToolId::Marquee);
    }

    fn pointer_down(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        let primitive = match self.mode {
            SelectionMode::Rectangle => Primitive::Rect { corner_radius: 0.0 },
            SelectionMode::Ellipse => Primitive::Ellipse,
        };
        self.gesture.begin(pos, primitive, dashed_outline(), surface);
        None
    }

    fn pointer_move(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        self.gesture.update(pos, surface);
        None
    }

    fn pointer_up(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        let rect = self.gesture.finish(pos, surface)?;
        Some(ToolOutcome::Selection(Selection::from_mode(self.mode, rect, self.feather)))
    }

    fn options(&self) -> Option<ToolOptions> {
        Some(ToolOptions::Marquee {
            mode: self.mode,
            feather: self.feather,
        })
    }

    fn set_options(&mut self, options: ToolOptions) -> bool {
        match options {
            ToolOptions::Marquee { mode, feather } => {
                self.mode = mode;
                self.feather = feather.max(0.0);
                true
            }
            _ => false,
        }
    }
}
