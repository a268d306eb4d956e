//! Rendering subsystem for drawing prepared charts
//!
//! - Chart rendering (rectangles, sunburst arcs, node-link diagrams)
//! - Text utilities (label measurement and truncation)

pub mod chart_renderer;
pub mod text_utils;
