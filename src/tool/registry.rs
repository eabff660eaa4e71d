use super::types::{BrushTool, MarqueeTool, PanTool, SelectTool, ShapeTool, TextTool};
use super::{ToolBehavior, ToolId, ToolOptions};
use std::collections::BTreeMap;
use std::fmt;

/// Catalog of tool behaviours keyed by [`ToolId`]. Fixed once built.
pub struct ToolRegistry {
    tools: BTreeMap<ToolId, Box<dyn ToolBehavior>>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_default_tools()
    }
}

impl ToolRegistry {
    pub fn empty() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Every built-in tool with its default options
    pub fn with_default_tools() -> Self {
        Self::empty()
            .with(ToolId::Select, SelectTool::default())
            .with(ToolId::Brush, BrushTool::default())
            .with(ToolId::Pencil, BrushTool::pencil())
            .with(ToolId::Eraser, BrushTool::eraser())
            .with(ToolId::Marquee, MarqueeTool::default())
            .with(ToolId::Shape, ShapeTool::default())
            .with(ToolId::Text, TextTool::default())
            .with(ToolId::Pan, PanTool::default())
    }

    /// Register `behavior` under `id`, replacing any previous registration
    pub fn with(mut self, id: ToolId, behavior: impl ToolBehavior + 'static) -> Self {
        self.tools.insert(id, Box::new(behavior));
        self
    }

    pub fn contains(&self, id: ToolId) -> bool {
        self.tools.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ToolId> + '_ {
        self.tools.keys().copied()
    }

    pub(super) fn get_mut(&mut self, id: ToolId) -> Option<&mut (dyn ToolBehavior + 'static)> {
        self.tools.get_mut(&id).map(|tool| tool.as_mut())
    }

    pub fn options(&self, id: ToolId) -> Option<ToolOptions> {
        self.tools.get(&id).and_then(|tool| tool.options())
    }

    pub fn set_options(&mut self, id: ToolId, options: ToolOptions) -> bool {
        self.tools
            .get_mut(&id)
            .is_some_and(|tool| tool.set_options(options))
    }
}
