use crate::document::Document;
use crate::surface::RenderSurface;
use crate::tool::{ToolBehavior, ToolId, ToolOutcome};
use egui::{CursorIcon, Pos2};

/// Drag the viewport around
#[derive(Debug, Default)]
pub struct PanTool {
    /// World point grabbed on pointer down. It stays under the pointer while panning.
    grab: Option<Pos2>,
}

impl ToolBehavior for PanTool {
    fn activate(&mut self, surface: &mut dyn RenderSurface, _doc: &Document) {
        self.grab = None;
        surface.set_cursor(CursorIcon::Grab);
        surface.add_pointer_listener(ToolId::Pan);
    }

    fn deactivate(&mut self, surface: &mut dyn RenderSurface) {
        self.grab = None;
        surface.set_cursor(CursorIcon::Default);
        surface.remove_pointer_listener(ToolId::Pan);
    }

    fn pointer_down(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        self.grab = Some(pos);
        surface.set_cursor(CursorIcon::Grabbing);
        None
    }

    fn pointer_move(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        let grab = self.grab?;
        surface.pan_by(pos - grab);
        None
    }

    fn pointer_up(&mut self, _pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        self.grab = None;
        surface.set_cursor(CursorIcon::Grab);
        None
    }
}
