//! Domain logic for the hierarchy viewer.
//!
//! Pure computations with no egui dependency: chart kinds, the combined
//! layout and hit testing.

pub mod chart_layout;

pub use chart_layout::{radial_direction, ChartKind, ChartLayout, NodeShape};
