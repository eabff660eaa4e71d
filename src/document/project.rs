use super::{BACKGROUND_LAYER_NAME, Document};
use crate::error::{ProjectError, ProjectResult};
use crate::layer::{Layer, LayerContent, LayerKind, RasterContent};
use crate::util::time;
use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Current version of the persisted project format
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    #[default]
    Rgb,
    Grayscale,
    Cmyk,
}

/// Options for [`Document::new_project`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewProjectOptions {
    pub name: String,
    /// Dots per inch
    pub resolution: u32,
    pub color_mode: ColorMode,
    pub background_color: Color32,
}

impl Default for NewProjectOptions {
    fn default() -> Self {
        Self {
            name: "Untitled".to_owned(),
            resolution: 72,
            color_mode: ColorMode::Rgb,
            background_color: Color32::WHITE,
        }
    }
}

/// Project-level metadata carried by a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: Uuid,
    pub name: String,
    pub resolution: u32,
    pub color_mode: ColorMode,
    pub background_color: Color32,
    pub metadata: BTreeMap<String, String>,
    pub created_at: f64,
    pub updated_at: f64,
}

impl ProjectInfo {
    pub fn new(options: NewProjectOptions) -> Self {
        let now = time::now_secs();
        Self {
            id: Uuid::new_v4(),
            name: options.name,
            resolution: options.resolution,
            color_mode: options.color_mode,
            background_color: options.background_color,
            metadata: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// The persisted form of a document.
///
/// Layers carry no presentation data; the rendering bridge rebuilds it after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: Uuid,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub resolution: u32,
    pub color_mode: ColorMode,
    pub background_color: Color32,
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub format_version: u32,
    pub created_at: f64,
    pub updated_at: f64,
}

impl ProjectRecord {
    pub fn to_json(&self) -> ProjectResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> ProjectResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn write_to(&self, path: impl AsRef<std::path::Path>) -> ProjectResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn read_from(path: impl AsRef<std::path::Path>) -> ProjectResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl Document {
    /// Replace everything with a single locked background layer covering the canvas.
    pub fn new_project(&mut self, width: u32, height: u32, options: NewProjectOptions) -> ProjectResult<()> {
        if width == 0 || height == 0 {
            return Err(ProjectError::InvalidCanvas { width, height });
        }
        self.install_project(width, height, options);
        Ok(())
    }

    pub(super) fn install_project(&mut self, width: u32, height: u32, options: NewProjectOptions) {
        log::info!("New project '{}' ({}x{})", options.name, width, height);
        self.canvas_size = [width, height];
        self.project = ProjectInfo::new(options);

        let mut background = Layer::new(
            BACKGROUND_LAYER_NAME,
            LayerContent::Raster(RasterContent::default()),
        );
        background.locked = true;
        background.position = Pos2::ZERO;
        background.size = self.canvas_rect().size();
        debug_assert_eq!(background.kind(), LayerKind::Raster);

        self.active_layer_id = Some(background.id);
        self.layers = vec![background];
        self.renumber();
        self.selection = None;
        self.bump();
    }

    /// Produce the persisted record for the current document
    pub fn save_project(&mut self) -> ProjectRecord {
        self.project.updated_at = time::now_secs();
        let [width, height] = self.canvas_size;
        log::info!("Saving project '{}' ({} layers)", self.project.name, self.layers.len());
        ProjectRecord {
            id: self.project.id,
            name: self.project.name.clone(),
            width,
            height,
            resolution: self.project.resolution,
            color_mode: self.project.color_mode,
            background_color: self.project.background_color,
            layers: self.layers.clone(),
            metadata: self.project.metadata.clone(),
            format_version: FORMAT_VERSION,
            created_at: self.project.created_at,
            updated_at: self.project.updated_at,
        }
    }

    /// Replace the document with a persisted record.
    ///
    /// Layers are ordered by their stored z-index and renumbered; the topmost
    /// layer becomes active. The document is untouched on error.
    pub fn load_project(&mut self, record: ProjectRecord) -> ProjectResult<()> {
        if record.format_version > FORMAT_VERSION {
            return Err(ProjectError::UnsupportedFormat {
                found: record.format_version,
                supported: FORMAT_VERSION,
            });
        }
        if record.width == 0 || record.height == 0 {
            return Err(ProjectError::InvalidCanvas {
                width: record.width,
                height: record.height,
            });
        }

        let mut layers = record.layers;
        layers.sort_by_key(|layer| layer.z_index);
        for layer in &mut layers {
            layer.opacity = layer.opacity.min(100);
        }

        log::info!("Loaded project '{}' ({} layers)", record.name, layers.len());
        self.project = ProjectInfo {
            id: record.id,
            name: record.name,
            resolution: record.resolution,
            color_mode: record.color_mode,
            background_color: record.background_color,
            metadata: record.metadata,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        self.canvas_size = [record.width, record.height];
        // The bottom layer (usually the background) starts active
        self.active_layer_id = layers.first().map(|layer| layer.id);
        self.layers = layers;
        self.renumber();
        self.selection = None;
        self.bump();
        Ok(())
    }
}
