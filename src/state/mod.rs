//! State management modules for the hierarchy viewer.
//!
//! This module contains state-only logic (no UI concerns):
//! - Dataset state (loaded records, source path)
//! - Chart state (chart, filters, persisted chart settings)
//! - Selection state (hovered node)
//! - Theme state (theme manager, current theme)
//! - Layout state (side panel width)

mod dataset_state;
mod chart_state;
mod selection;
mod theme_state;
mod layout_state;

pub use dataset_state::DatasetState;
pub use chart_state::{ChartSettings, ChartState};
pub use selection::SelectionState;
pub use theme_state::ThemeState;
pub use layout_state::LayoutState;
