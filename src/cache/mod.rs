//! Caching modules for performance optimization.

pub mod chart_cache;

// Re-export commonly used types
pub use chart_cache::{ChartCache, FilterSummary};
