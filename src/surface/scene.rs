use super::{DrawableProps, DrawingMode, MAX_ZOOM, MIN_ZOOM, ObjectId, Primitive, RenderSurface, ZOOM_STEP};
use crate::tool::ToolId;
use egui::{CursorIcon, Pos2, Vec2};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub primitive: Primitive,
    pub props: DrawableProps,
}

/// Retained, in-memory drawable set.
#[derive(Debug)]
pub struct Scene {
    objects: HashMap<ObjectId, SceneObject>,
    /// Bottom first
    order: Vec<ObjectId>,
    next_id: u64,
    drawing_mode: DrawingMode,
    object_selection: bool,
    cursor: CursorIcon,
    pointer_listeners: Vec<ToolId>,
    view_offset: Vec2,
    zoom: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
            drawing_mode: DrawingMode::Off,
            object_selection: false,
            cursor: CursorIcon::Default,
            pointer_listeners: Vec::new(),
            view_offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Objects in paint order, bottom first
    pub fn objects_in_order(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.order
            .iter()
            .filter_map(|id| self.objects.get(id).map(|obj| (*id, obj)))
    }

    pub fn order(&self) -> &[ObjectId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn drawing_mode(&self) -> DrawingMode {
        self.drawing_mode
    }

    pub fn object_selection(&self) -> bool {
        self.object_selection
    }

    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }

    pub fn pointer_listeners(&self) -> &[ToolId] {
        &self.pointer_listeners
    }

    pub fn view_offset(&self) -> Vec2 {
        self.view_offset
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    /// Back to 100% with the canvas at its home position
    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.view_offset = Vec2::ZERO;
    }

    /// True when no tool has left any interaction configuration behind
    pub fn is_pristine(&self) -> bool {
        self.drawing_mode == DrawingMode::Off
            && !self.object_selection
            && self.cursor == CursorIcon::Default
            && self.pointer_listeners.is_empty()
    }
}

impl RenderSurface for Scene {
    fn create_object(&mut self, primitive: Primitive, props: DrawableProps) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, SceneObject { primitive, props });
        self.order.push(id);
        id
    }

    fn remove_object(&mut self, id: ObjectId) -> bool {
        if self.objects.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|o| *o != id);
        true
    }

    fn update_object(&mut self, id: ObjectId, primitive: Option<Primitive>, props: DrawableProps) -> bool {
        let Some(object) = self.objects.get_mut(&id) else {
            return false;
        };
        if let Some(primitive) = primitive {
            object.primitive = primitive;
        }
        object.props = props;
        true
    }

    fn reorder(&mut self, order: &[ObjectId]) {
        let listed: Vec<ObjectId> = order
            .iter()
            .copied()
            .filter(|id| self.objects.contains_key(id))
            .collect();
        let rest: Vec<ObjectId> = self
            .order
            .iter()
            .copied()
            .filter(|id| !listed.contains(id))
            .collect();
        self.order = listed;
        self.order.extend(rest);
    }

    fn hit_test(&self, pos: Pos2) -> Option<ObjectId> {
        self.order.iter().rev().copied().find(|id| {
            self.objects
                .get(id)
                .is_some_and(|obj| obj.props.visible && obj.props.bounds.contains(pos))
        })
    }

    fn set_drawing_mode(&mut self, mode: DrawingMode) {
        self.drawing_mode = mode;
    }

    fn set_object_selection(&mut self, enabled: bool) {
        self.object_selection = enabled;
    }

    fn set_cursor(&mut self, cursor: CursorIcon) {
        self.cursor = cursor;
    }

    fn add_pointer_listener(&mut self, tool: ToolId) {
        if !self.pointer_listeners.contains(&tool) {
            self.pointer_listeners.push(tool);
        }
    }

    fn remove_pointer_listener(&mut self, tool: ToolId) {
        self.pointer_listeners.retain(|t| *t != tool);
    }

    fn pan_by(&mut self, delta: Vec2) {
        // The offset is kept in screen points
        self.view_offset += delta * self.zoom;
    }

    fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }
}
