pub mod brush;
pub mod marquee;
pub mod pan;
pub mod select;
pub mod shape;
pub mod text;

pub use brush::{BrushKind, BrushTool, DEFAULT_BRUSH_WIDTH, DEFAULT_ERASER_WIDTH, DEFAULT_PENCIL_WIDTH};
pub use marquee::MarqueeTool;
pub use pan::PanTool;
pub use select::SelectTool;
pub use shape::ShapeTool;
pub use text::TextTool;

use crate::surface::DrawableProps;
use egui::{Color32, Rect};

/// Dashed outline style shared by the drag previews
pub(crate) fn dashed_outline() -> DrawableProps {
    DrawableProps {
        stroke: Some(Color32::from_gray(40)),
        stroke_width: 1.0,
        dashed: true,
        ..DrawableProps::new(Rect::NOTHING)
    }
}
