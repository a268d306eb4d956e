//! Centralized application state for the hierarchy viewer.
//!
//! Focused state components each own one aspect of the application; this
//! struct composes them and hosts the few operations that span several.

use rhier::Filterable;
use tracing::{debug, warn};

use crate::cache::{ChartCache, FilterSummary};
use crate::state::{ChartSettings, ChartState, DatasetState, LayoutState, SelectionState, ThemeState};

/// Main application state composed of focused state components.
pub struct AppState {
    // ===== Focused State Components =====
    /// Loaded dataset and source file
    pub dataset: DatasetState,

    /// Chart, filters and chart settings
    pub chart: ChartState,

    /// Hovered node
    pub selection: SelectionState,

    /// Theme and styling state
    pub theme: ThemeState,

    /// UI layout state
    pub layout: LayoutState,

    // ===== Top-Level State =====
    /// Current error message to display (if any)
    pub error_message: Option<String>,

    /// Prepared chart cache
    pub chart_cache: ChartCache,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings("Light".to_string(), ChartSettings::default(), LayoutState::new())
    }

    /// Creates a state with preferences loaded from storage.
    pub fn with_settings(theme_name: String, chart_settings: ChartSettings, layout: LayoutState) -> Self {
        Self {
            dataset: DatasetState::new(),
            chart: ChartState::with_settings(chart_settings),
            selection: SelectionState::new(),
            theme: ThemeState::with_theme(theme_name),
            layout,
            error_message: None,
            chart_cache: ChartCache::new(),
        }
    }

    // ===== High-Level Coordination Methods =====

    /// Clears the dataset, filters and caches before a new load.
    pub fn reset_dataset_state(&mut self) {
        self.dataset.clear();
        self.selection.clear();
        self.chart.chart_mut().clear_filters();
        self.error_message = None;
        self.chart_cache.invalidate();
    }

    /// Rebuilds the prepared chart when the dataset, settings or canvas size
    /// changed since the last build.
    pub fn prepare_chart(&mut self, width: f32, height: f32) {
        let size = [width.max(0.0).round() as u32, height.max(0.0).round() as u32];
        let generation = self.dataset.generation();
        if self.chart_cache.is_valid(generation, size, self.chart.settings()) {
            return;
        }

        self.chart.apply_settings(size[0] as f64, size[1] as f64);
        let prepared = match self.chart.chart().prepare(self.dataset.records()) {
            Ok(prepared) => {
                debug!(nodes = prepared.hierarchy.len(), width = size[0], height = size[1], "chart rebuilt");
                Some(prepared)
            }
            Err(e) => {
                warn!(error = %e, "chart build failed");
                self.error_message = Some(format!("Error building chart: {}", e));
                None
            }
        };
        let settings = self.chart.settings().clone();
        self.chart_cache.store(generation, size, &settings, prepared);
    }

    /// Recounts records and value under the active filters.
    pub fn refresh_filter_summary(&mut self) {
        let chart = self.chart.chart();
        let passing = chart.filter_records(self.dataset.records());
        let value: f64 = passing
            .iter()
            .filter_map(|r| chart.accessors().value(r).ok())
            .filter(|v| v.is_finite())
            .sum();
        self.chart_cache.filter_summary = Some(FilterSummary {
            records: passing.len(),
            value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhier::{DataRecord, Dataset, DatasetFooter, DatasetHeader, DatasetMetadata, PathKey};

    fn dataset() -> Dataset {
        Dataset {
            metadata: DatasetMetadata {
                header: DatasetHeader {
                    version: "1.0".to_string(),
                    metadata: serde_json::Value::Null,
                },
                footer: Some(DatasetFooter { total_records: Some(3) }),
                source: "test".to_string(),
            },
            records: vec![
                DataRecord::new(["US", "East"], 30.0),
                DataRecord::new(["US", "West"], 10.0),
                DataRecord::new(["CA"], 20.0),
            ],
        }
    }

    #[test]
    fn test_prepare_chart_is_cached() {
        let mut state = AppState::new();
        state.dataset.load_dataset(dataset(), None);

        state.prepare_chart(300.0, 200.0);
        let nodes = state.chart_cache.prepared.as_ref().unwrap().hierarchy.len();
        assert_eq!(nodes, 5);
        assert_eq!(state.chart_cache.palette_slots.len(), nodes);

        // Same inputs: nothing rebuilt, so the slots stay identical.
        let slots = state.chart_cache.palette_slots.clone();
        state.prepare_chart(300.0, 200.0);
        assert_eq!(state.chart_cache.palette_slots, slots);
        assert!(state.error_message.is_none());
    }

    #[test]
    fn test_filter_summary_follows_clicks() {
        let mut state = AppState::new();
        state.dataset.load_dataset(dataset(), None);

        state.refresh_filter_summary();
        assert_eq!(state.chart_cache.filter_summary.unwrap().records, 3);

        state.chart.chart_mut().filter_on_path(&PathKey::from(["US"]));
        state.refresh_filter_summary();
        let summary = state.chart_cache.filter_summary.unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.value, 40.0);
    }

    #[test]
    fn test_reset_clears_filters() {
        let mut state = AppState::new();
        state.dataset.load_dataset(dataset(), None);
        state.chart.chart_mut().filter_on_path(&PathKey::from(["CA"]));
        state.error_message = Some("old".to_string());

        state.reset_dataset_state();
        assert!(!state.chart.chart().has_filter());
        assert!(state.dataset.dataset().is_none());
        assert!(state.error_message.is_none());
    }
}
