#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod bridge;
pub mod color;
pub mod document;
pub mod editor;
pub mod error;
pub mod history;
pub mod layer;
pub mod panels;
pub mod selection;
pub mod surface;
pub mod tool;
pub mod util;

pub use app::EditorApp;
pub use bridge::{PixelStore, RenderBridge};
pub use document::{Document, DocumentSnapshot, LayerMove, NewProjectOptions, ProjectRecord};
pub use editor::{Editor, EditorSettings};
pub use error::{HistoryAdvisory, ProjectError, ToolError};
pub use history::History;
pub use layer::{Layer, LayerId, LayerKind, LayerOverrides};
pub use selection::Selection;
pub use surface::{RenderSurface, Scene, SharedSurface};
pub use tool::{ToolController, ToolId, ToolOutcome};
