use crate::surface::ObjectId;
use crate::util::time;
use egui::{Color32, ColorImage, Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A unique identifier for a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub Uuid);

impl LayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to backing pixel storage owned by the rendering bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelStorageId(pub Uuid);

impl PixelStorageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PixelStorageId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Raster,
    Text,
    Shape,
    Adjustment,
    Group,
}

impl LayerKind {
    pub fn label(&self) -> &'static str {
        match self {
            LayerKind::Raster => "Layer",
            LayerKind::Text => "Text",
            LayerKind::Shape => "Shape",
            LayerKind::Adjustment => "Adjustment",
            LayerKind::Group => "Group",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub const ALL: [BlendMode; 16] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BlendMode::Normal => "Normal",
            BlendMode::Multiply => "Multiply",
            BlendMode::Screen => "Screen",
            BlendMode::Overlay => "Overlay",
            BlendMode::Darken => "Darken",
            BlendMode::Lighten => "Lighten",
            BlendMode::ColorDodge => "Color Dodge",
            BlendMode::ColorBurn => "Color Burn",
            BlendMode::HardLight => "Hard Light",
            BlendMode::SoftLight => "Soft Light",
            BlendMode::Difference => "Difference",
            BlendMode::Exclusion => "Exclusion",
            BlendMode::Hue => "Hue",
            BlendMode::Saturation => "Saturation",
            BlendMode::Color => "Color",
            BlendMode::Luminosity => "Luminosity",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RasterContent {
    /// `None` until pixels have been imported or painted
    pub storage: Option<PixelStorageId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_FONT_SIZE: f32 = 24.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u16,
    pub align: TextAlign,
    pub fill: Color32,
    pub line_height: f32,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            content: "Text".to_owned(),
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: 400,
            align: TextAlign::Left,
            fill: Color32::BLACK,
            line_height: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeGeometry {
    Rectangle,
    Ellipse,
    /// Endpoints in layer-local coordinates, in the order they were drawn
    Line { from: Pos2, to: Pos2 },
    Polygon { sides: u32 },
    /// Free-form path in layer-local coordinates
    Path(Vec<Pos2>),
}

impl ShapeGeometry {
    /// A line whose endpoints are filled in when it is drawn
    pub const LINE: ShapeGeometry = ShapeGeometry::Line {
        from: Pos2::ZERO,
        to: Pos2::ZERO,
    };

    pub fn label(&self) -> &'static str {
        match self {
            ShapeGeometry::Rectangle => "Rectangle",
            ShapeGeometry::Ellipse => "Ellipse",
            ShapeGeometry::Line { .. } => "Line",
            ShapeGeometry::Polygon { .. } => "Polygon",
            ShapeGeometry::Path(_) => "Path",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeContent {
    pub geometry: ShapeGeometry,
    pub fill: Option<Color32>,
    pub stroke: Option<Color32>,
    pub stroke_width: f32,
    pub corner_radius: f32,
    /// Eraser strokes remove what lies below instead of painting
    #[serde(default)]
    pub erase: bool,
}

impl ShapeContent {
    /// A filled rectangle with no outline
    pub fn filled(fill: Color32) -> Self {
        Self {
            geometry: ShapeGeometry::Rectangle,
            fill: Some(fill),
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 0.0,
            erase: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustmentKind {
    BrightnessContrast,
    HueSaturation,
    Levels,
    Curves,
    Invert,
    Threshold,
}

impl AdjustmentKind {
    pub const ALL: [AdjustmentKind; 6] = [
        AdjustmentKind::BrightnessContrast,
        AdjustmentKind::HueSaturation,
        AdjustmentKind::Levels,
        AdjustmentKind::Curves,
        AdjustmentKind::Invert,
        AdjustmentKind::Threshold,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdjustmentKind::BrightnessContrast => "Brightness/Contrast",
            AdjustmentKind::HueSaturation => "Hue/Saturation",
            AdjustmentKind::Levels => "Levels",
            AdjustmentKind::Curves => "Curves",
            AdjustmentKind::Invert => "Invert",
            AdjustmentKind::Threshold => "Threshold",
        }
    }

    /// Valid range of the named parameter
    pub fn param_range(param: &str) -> std::ops::RangeInclusive<f32> {
        match param {
            "hue" => -180.0..=180.0,
            "gamma" => 0.1..=10.0,
            "black" | "white" | "level" => 0.0..=255.0,
            _ => -100.0..=100.0,
        }
    }

    /// Parameter names and neutral values for this adjustment
    pub fn default_params(&self) -> BTreeMap<String, f32> {
        let pairs: &[(&str, f32)] = match self {
            AdjustmentKind::BrightnessContrast => &[("brightness", 0.0), ("contrast", 0.0)],
            AdjustmentKind::HueSaturation => {
                &[("hue", 0.0), ("saturation", 0.0), ("lightness", 0.0)]
            }
            AdjustmentKind::Levels => &[("black", 0.0), ("gamma", 1.0), ("white", 255.0)],
            AdjustmentKind::Curves => &[("shadows", 0.0), ("midtones", 0.0), ("highlights", 0.0)],
            AdjustmentKind::Invert => &[],
            AdjustmentKind::Threshold => &[("level", 128.0)],
        };
        pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentContent {
    pub kind: AdjustmentKind,
    pub params: BTreeMap<String, f32>,
}

impl AdjustmentContent {
    pub fn new(kind: AdjustmentKind) -> Self {
        Self {
            kind,
            params: kind.default_params(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupContent {
    pub children: Vec<LayerId>,
    pub expanded: bool,
}

impl Default for GroupContent {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            expanded: true,
        }
    }
}

/// Kind-specific payload of a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerContent {
    Raster(RasterContent),
    Text(TextContent),
    Shape(ShapeContent),
    Adjustment(AdjustmentContent),
    Group(GroupContent),
}

impl LayerContent {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerContent::Raster(_) => LayerKind::Raster,
            LayerContent::Text(_) => LayerKind::Text,
            LayerContent::Shape(_) => LayerKind::Shape,
            LayerContent::Adjustment(_) => LayerKind::Adjustment,
            LayerContent::Group(_) => LayerKind::Group,
        }
    }

    /// Default payload for a freshly created layer of `kind`.
    ///
    /// Shapes are filled with `foreground`.
    pub fn default_for(kind: LayerKind, foreground: Color32) -> Self {
        match kind {
            LayerKind::Raster => LayerContent::Raster(RasterContent::default()),
            LayerKind::Text => LayerContent::Text(TextContent::default()),
            LayerKind::Shape => LayerContent::Shape(ShapeContent::filled(foreground)),
            LayerKind::Adjustment => {
                LayerContent::Adjustment(AdjustmentContent::new(AdjustmentKind::BrightnessContrast))
            }
            LayerKind::Group => LayerContent::Group(GroupContent::default()),
        }
    }
}

/// Presentation-side data attached to a layer.
///
/// Never serialized. History compression drops it from old snapshots since the
/// bridge can always regenerate it from the rest of the layer.
#[derive(Clone, Default)]
pub struct Presentation {
    /// Non-owning back-reference to the layer's object on the rendering surface
    pub surface_object: Option<ObjectId>,
    /// Cached bitmap used for thumbnails
    pub thumbnail: Option<Arc<ColorImage>>,
}

impl Presentation {
    pub fn is_empty(&self) -> bool {
        self.surface_object.is_none() && self.thumbnail.is_none()
    }
}

impl PartialEq for Presentation {
    fn eq(&self, other: &Self) -> bool {
        self.surface_object == other.surface_object
            && self.thumbnail.as_ref().map(|t| t.size) == other.thumbnail.as_ref().map(|t| t.size)
    }
}

impl fmt::Debug for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presentation")
            .field("surface_object", &self.surface_object)
            .field("thumbnail", &self.thumbnail.as_ref().map(|_| "<bitmap>"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique identifier for the layer
    pub id: LayerId,
    /// Display name of the layer
    pub name: String,
    /// Whether the layer is currently visible
    pub visible: bool,
    /// Locked layers are not editable by tools
    pub locked: bool,
    /// 0..=100
    pub opacity: u8,
    pub blend_mode: BlendMode,
    pub position: Pos2,
    pub size: Vec2,
    /// Content of the layer
    pub content: LayerContent,
    /// Paint order, lowest first. Dense over the document's layer list.
    pub z_index: usize,
    pub created_at: f64,
    pub updated_at: f64,
    #[serde(skip)]
    pub presentation: Presentation,
}

impl Layer {
    pub fn new(name: &str, content: LayerContent) -> Self {
        let now = time::now_secs();
        Self {
            id: LayerId::new(),
            name: name.to_string(),
            visible: true,
            locked: false,
            opacity: 100,
            blend_mode: BlendMode::Normal,
            position: Pos2::ZERO,
            size: Vec2::ZERO,
            content,
            z_index: 0,
            created_at: now,
            updated_at: now,
            presentation: Presentation::default(),
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.content.kind()
    }

    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(self.position, self.size)
    }

    pub fn touch(&mut self) {
        self.updated_at = time::now_secs();
    }

    /// Apply every field present in `overrides`.
    ///
    /// A content override is only taken when it matches this layer's kind.
    pub fn apply_overrides(&mut self, overrides: LayerOverrides) {
        if let Some(name) = overrides.name {
            self.name = name;
        }
        if let Some(visible) = overrides.visible {
            self.visible = visible;
        }
        if let Some(locked) = overrides.locked {
            self.locked = locked;
        }
        if let Some(opacity) = overrides.opacity {
            self.opacity = opacity.min(100);
        }
        if let Some(blend_mode) = overrides.blend_mode {
            self.blend_mode = blend_mode;
        }
        if let Some(position) = overrides.position {
            self.position = position;
        }
        if let Some(size) = overrides.size {
            self.size = size;
        }
        if let Some(content) = overrides.content {
            if content.kind() == self.kind() {
                self.content = content;
            } else {
                log::warn!(
                    "Ignoring {:?} payload for {:?} layer {}",
                    content.kind(),
                    self.kind(),
                    self.id
                );
            }
        }
    }
}

/// Optional field values applied on top of a new layer's defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerOverrides {
    pub name: Option<String>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub opacity: Option<u8>,
    pub blend_mode: Option<BlendMode>,
    pub position: Option<Pos2>,
    pub size: Option<Vec2>,
    pub content: Option<LayerContent>,
}

impl LayerOverrides {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Every user-visible field of `layer`, used by paste
    pub fn from_layer(layer: &Layer) -> Self {
        Self {
            name: Some(layer.name.clone()),
            visible: Some(layer.visible),
            locked: Some(layer.locked),
            opacity: Some(layer.opacity),
            blend_mode: Some(layer.blend_mode),
            position: Some(layer.position),
            size: Some(layer.size),
            content: Some(layer.content.clone()),
        }
    }

    pub fn with_bounds(mut self, position: Pos2, size: Vec2) -> Self {
        self.position = Some(position);
        self.size = Some(size);
        self
    }

    pub fn with_content(mut self, content: LayerContent) -> Self {
        self.content = Some(content);
        self
    }
}
