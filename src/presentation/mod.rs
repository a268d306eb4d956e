//! Presentation layer for visual styling and color mapping.
//!
//! Kept apart from the chart logic: node fills, strokes and the active
//! theme's palette.

pub mod color_mapping;
