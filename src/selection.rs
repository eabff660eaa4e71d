use egui::{Rect, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionShape {
    Rectangle(Rect),
    Ellipse(Rect),
}

/// The active selection region.
///
/// Selections are replaced wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub shape: SelectionShape,
    pub feather: f32,
    pub anti_alias: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SelectionMode {
    #[default]
    Rectangle,
    Ellipse,
}

impl Selection {
    pub fn new(shape: SelectionShape) -> Self {
        Self {
            shape,
            feather: 0.0,
            anti_alias: true,
            active: true,
        }
    }

    pub fn rectangle(rect: Rect) -> Self {
        Self::new(SelectionShape::Rectangle(rect))
    }

    pub fn from_mode(mode: SelectionMode, rect: Rect, feather: f32) -> Self {
        let shape = match mode {
            SelectionMode::Rectangle => SelectionShape::Rectangle(rect),
            SelectionMode::Ellipse => SelectionShape::Ellipse(rect),
        };
        Self {
            feather: feather.max(0.0),
            ..Self::new(shape)
        }
    }

    pub fn bounds(&self) -> Rect {
        match &self.shape {
            SelectionShape::Rectangle(rect) | SelectionShape::Ellipse(rect) => *rect,
        }
    }

    /// True for selections that enclose no area
    pub fn is_degenerate(&self) -> bool {
        let size: Vec2 = self.bounds().size();
        !(size.x > 0.0 && size.y > 0.0)
    }
}
