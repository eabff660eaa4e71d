use egui::Color32;
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in the recent-colors list
pub const MAX_RECENT_COLORS: usize = 10;

/// Foreground/background colors plus a most-recently-used list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorState {
    foreground: Color32,
    background: Color32,
    /// Newest first, no duplicates
    recent: Vec<Color32>,
}

impl Default for ColorState {
    fn default() -> Self {
        Self {
            foreground: Color32::BLACK,
            background: Color32::WHITE,
            recent: Vec::new(),
        }
    }
}

impl ColorState {
    pub fn foreground(&self) -> Color32 {
        self.foreground
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn recent(&self) -> &[Color32] {
        &self.recent
    }

    pub fn set_foreground(&mut self, color: Color32) {
        self.foreground = color;
        self.push_recent(color);
    }

    pub fn set_background(&mut self, color: Color32) {
        self.background = color;
        self.push_recent(color);
    }

    /// Exchange foreground and background. The recent list is left alone.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.foreground, &mut self.background);
    }

    fn push_recent(&mut self, color: Color32) {
        self.recent.retain(|c| *c != color);
        self.recent.insert(0, color);
        self.recent.truncate(MAX_RECENT_COLORS);
    }
}
