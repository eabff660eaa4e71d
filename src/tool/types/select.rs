use crate::document::Document;
use crate::surface::{ObjectId, RenderSurface};
use crate::tool::{ToolBehavior, ToolId, ToolOutcome};
use egui::{CursorIcon, Pos2};

/// Object selection: click picks the topmost object, dragging moves it.
#[derive(Debug, Default)]
pub struct SelectTool {
    drag: Option<(ObjectId, Pos2)>,
}

impl ToolBehavior for SelectTool {
    fn activate(&mut self, surface: &mut dyn RenderSurface, _doc: &Document) {
        self.drag = None;
        surface.set_object_selection(true);
        surface.set_cursor(CursorIcon::PointingHand);
        surface.add_pointer_listener(ToolId::Select);
    }

    fn deactivate(&mut self, surface: &mut dyn RenderSurface) {
        self.drag = None;
        surface.set_object_selection(false);
        surface.set_cursor(CursorIcon::Default);
        surface.remove_pointer_listener(ToolId::Select);
    }

    fn pointer_down(&mut self, pos: Pos2, surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        let object = surface.hit_test(pos)?;
        self.drag = Some((object, pos));
        Some(ToolOutcome::Picked { object })
    }

    fn pointer_up(&mut self, pos: Pos2, _surface: &mut dyn RenderSurface, _doc: &Document) -> Option<ToolOutcome> {
        let (object, start) = self.drag.take()?;
        let delta = pos - start;
        if delta == egui::Vec2::ZERO {
            return None;
        }
        Some(ToolOutcome::Moved { object, delta })
    }
}
