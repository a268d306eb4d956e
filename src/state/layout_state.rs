//! UI layout state management.

use serde::{Deserialize, Serialize};

/// Persisted sizes of the resizable panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutState {
    /// Width of the details side panel, in points
    details_width: f32,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutState {
    pub fn new() -> Self {
        Self { details_width: 280.0 }
    }

    pub fn with_details_width(details_width: f32) -> Self {
        Self { details_width }
    }

    pub fn details_width(&self) -> f32 {
        self.details_width
    }

    /// Records the width after the user dragged the panel edge.
    pub fn set_details_width(&mut self, width: f32) {
        self.details_width = width.max(120.0);
    }
}
