//! UI panel rendering subsystem
//!
//! - Header panel (file controls, chart options, theme selector)
//! - Chart panel (canvas, hover tooltip, click to filter)
//! - Details panel (hovered node, filters, legend)
//! - Status bar (dataset summary, memory)
//! - Panel manager (panel orchestration and layout)

pub mod header;
pub mod chart_panel;
pub mod details_panel;
pub mod status_bar;
pub mod panel_manager;
