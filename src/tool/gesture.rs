use crate::surface::{DrawableProps, ObjectId, Primitive, RenderSurface};
use egui::{Pos2, Rect, pos2, vec2};

/// Rectangle spanned by a drag from `anchor` to `current`, in any direction.
pub fn drag_rect(anchor: Pos2, current: Pos2) -> Rect {
    let left = if current.x < anchor.x { current.x } else { anchor.x };
    let top = if current.y < anchor.y { current.y } else { anchor.y };
    let width = (current.x - anchor.x).abs();
    let height = (current.y - anchor.y).abs();
    Rect::from_min_size(pos2(left, top), vec2(width, height))
}

/// Press / drag / release tracking with a provisional preview object.
#[derive(Debug, Default)]
pub struct DragGesture {
    anchor: Option<Pos2>,
    preview: Option<ObjectId>,
    style: Option<DrawableProps>,
}

impl DragGesture {
    pub fn is_open(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn anchor(&self) -> Option<Pos2> {
        self.anchor
    }

    pub fn preview(&self) -> Option<ObjectId> {
        self.preview
    }

    /// Capture the anchor and put a zero-size preview on the surface
    pub fn begin(&mut self, pos: Pos2, primitive: Primitive, style: DrawableProps, surface: &mut dyn RenderSurface) {
        self.cancel(surface);
        let props = DrawableProps {
            bounds: Rect::from_min_size(pos, egui::Vec2::ZERO),
            ..style.clone()
        };
        self.preview = Some(surface.create_object(primitive, props));
        self.anchor = Some(pos);
        self.style = Some(style);
    }

    /// Resize the preview to span anchor..pos. No-op when no gesture is open.
    pub fn update(&mut self, pos: Pos2, surface: &mut dyn RenderSurface) -> Option<Rect> {
        self.resize(pos, None, surface)
    }

    /// Like [`DragGesture::update`], also swapping the preview's primitive
    pub fn reshape(&mut self, pos: Pos2, primitive: Primitive, surface: &mut dyn RenderSurface) -> Option<Rect> {
        self.resize(pos, Some(primitive), surface)
    }

    fn resize(&mut self, pos: Pos2, primitive: Option<Primitive>, surface: &mut dyn RenderSurface) -> Option<Rect> {
        let anchor = self.anchor?;
        let rect = drag_rect(anchor, pos);
        if let (Some(preview), Some(style)) = (self.preview, &self.style) {
            let props = DrawableProps {
                bounds: rect,
                ..style.clone()
            };
            surface.update_object(preview, primitive, props);
        }
        Some(rect)
    }

    /// Close the gesture and return its final bounds. Zero-size results are allowed.
    pub fn finish(&mut self, pos: Pos2, surface: &mut dyn RenderSurface) -> Option<Rect> {
        let anchor = self.anchor?;
        let rect = drag_rect(anchor, pos);
        self.cancel(surface);
        Some(rect)
    }

    /// Drop the preview and any in-progress anchor
    pub fn cancel(&mut self, surface: &mut dyn RenderSurface) {
        if let Some(preview) = self.preview.take() {
            surface.remove_object(preview);
        }
        self.anchor = None;
        self.style = None;
    }
}
