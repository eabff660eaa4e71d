use thiserror::Error;

/// Errors that can occur during tool state transitions.
///
/// Both variants leave the tool state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// No rendering surface has been bound yet
    #[error("rendering surface is not ready")]
    SurfaceNotReady,
    /// The requested tool is not part of the registry
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

/// Advisory conditions reported by history navigation.
///
/// These are not failures: the requested step is simply skipped and the
/// document is left as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryAdvisory {
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error("history index {index} is out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
}

/// Errors that can occur while saving, loading or importing project data
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Failed to (de)serialize project: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to access project file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported project format version {found} (supported up to {supported})")]
    UnsupportedFormat { found: u32, supported: u32 },

    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },
}

/// Result type for project persistence operations
pub type ProjectResult<T> = Result<T, ProjectError>;
