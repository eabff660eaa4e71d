use super::{ToolId, ToolOptions, ToolOutcome, ToolRegistry};
use crate::document::Document;
use crate::error::ToolError;
use crate::surface::{PointerEvent, SharedSurface};
use std::fmt;

/// Which tool, if any, is bound to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolState {
    #[default]
    Idle,
    Active(ToolId),
}

/// Enforces that at most one tool is live on the rendering surface.
///
/// All activation and deactivation goes through here so a tool's surface
/// configuration is always torn down before another one is set up.
pub struct ToolController {
    registry: ToolRegistry,
    state: ToolState,
    surface: Option<SharedSurface>,
    /// The surface the active tool was activated on
    bound: Option<SharedSurface>,
}

impl fmt::Debug for ToolController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolController")
            .field("registry", &self.registry)
            .field("state", &self.state)
            .field("has_surface", &self.surface.is_some())
            .finish()
    }
}

impl Default for ToolController {
    fn default() -> Self {
        Self::new(ToolRegistry::with_default_tools())
    }
}

impl ToolController {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            state: ToolState::Idle,
            surface: None,
            bound: None,
        }
    }

    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn active_tool(&self) -> Option<ToolId> {
        match self.state {
            ToolState::Active(id) => Some(id),
            ToolState::Idle => None,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Bind a new surface for future activations. The active tool is left as is.
    pub fn set_surface(&mut self, surface: Option<SharedSurface>) {
        self.surface = surface;
    }

    /// Bind `id` to the surface, tearing down the current tool first.
    ///
    /// Re-activating the active tool still runs a full deactivate/activate cycle.
    pub fn activate(&mut self, id: ToolId, doc: &Document) -> Result<(), ToolError> {
        let Some(surface) = self.surface.clone() else {
            log::warn!("Cannot activate {}: surface not ready", id);
            return Err(ToolError::SurfaceNotReady);
        };
        if !self.registry.contains(id) {
            log::warn!("Cannot activate unregistered tool {}", id);
            return Err(ToolError::UnknownTool(id.name().to_owned()));
        }

        self.deactivate_current();

        if let Some(tool) = self.registry.get_mut(id) {
            let mut surface_ref = surface.borrow_mut();
            tool.activate(&mut *surface_ref, doc);
        }
        self.state = ToolState::Active(id);
        self.bound = Some(surface);
        log::info!("Activated tool {}", id);
        Ok(())
    }

    pub fn activate_by_name(&mut self, name: &str, doc: &Document) -> Result<(), ToolError> {
        let id: ToolId = name.parse()?;
        self.activate(id, doc)
    }

    /// Return to `Idle`. No-op when idle.
    pub fn deactivate_current(&mut self) {
        let ToolState::Active(id) = self.state else {
            return;
        };
        let bound = self.bound.take();
        if let (Some(tool), Some(surface)) = (self.registry.get_mut(id), bound) {
            let mut surface_ref = surface.borrow_mut();
            tool.deactivate(&mut *surface_ref);
        }
        self.state = ToolState::Idle;
        log::debug!("Deactivated tool {}", id);
    }

    /// Forward a pointer event to the active tool
    pub fn handle_pointer(&mut self, event: PointerEvent, doc: &Document) -> Option<ToolOutcome> {
        let ToolState::Active(id) = self.state else {
            return None;
        };
        let surface = self.bound.clone()?;
        let tool = self.registry.get_mut(id)?;
        let mut surface_ref = surface.borrow_mut();
        tool.handle_pointer(event, &mut *surface_ref, doc)
    }

    pub fn options(&self, id: ToolId) -> Option<ToolOptions> {
        self.registry.options(id)
    }

    pub fn set_options(&mut self, id: ToolId, options: ToolOptions) -> bool {
        self.registry.set_options(id, options)
    }
}
