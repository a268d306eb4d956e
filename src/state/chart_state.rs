//! Chart and chart settings state.

use rhier::{ChildOrdering, DataRecord, HierarchyChart, LinkShape, Orientation};
use serde::{Deserialize, Serialize};

use crate::domain::{ChartKind, ChartLayout};

/// User-facing chart options, persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub kind: ChartKind,
    pub orientation: Orientation,
    /// Node-link charts only
    pub radial: bool,
    pub link_shape: LinkShape,
    pub ordering: ChildOrdering,
    /// Gap between nodes for partition and treemap charts, in pixels
    pub padding: f32,
    /// Sunburst hole as a fraction of the radius
    pub inner_radius_ratio: f32,
    pub show_labels: bool,
    /// Clicks zoom (sunburst, partition) or fold subtrees instead of filtering
    pub collapsible: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            kind: ChartKind::Sunburst,
            orientation: Orientation::Horizontal,
            radial: false,
            link_shape: LinkShape::Dogleg,
            ordering: ChildOrdering::Key,
            padding: 1.0,
            inner_radius_ratio: 0.2,
            show_labels: true,
            collapsible: false,
        }
    }
}

/// The chart (accessors, layout, filters) plus its settings.
pub struct ChartState {
    chart: HierarchyChart<DataRecord, ChartLayout>,
    settings: ChartSettings,
}

impl Default for ChartState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartState {
    pub fn new() -> Self {
        Self::with_settings(ChartSettings::default())
    }

    pub fn with_settings(settings: ChartSettings) -> Self {
        let chart = HierarchyChart::builder(DataRecord::accessors(), ChartLayout::default())
            .ordering(settings.ordering)
            .root_name("All")
            .collapsible(settings.collapsible)
            .build();
        Self { chart, settings }
    }

    pub fn chart(&self) -> &HierarchyChart<DataRecord, ChartLayout> {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut HierarchyChart<DataRecord, ChartLayout> {
        &mut self.chart
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ChartSettings {
        &mut self.settings
    }

    /// Pushes the current settings into the chart for a canvas of the given
    /// size.
    pub fn apply_settings(&mut self, width: f64, height: f64) {
        self.chart
            .set_layout(ChartLayout::from_settings(&self.settings, width, height));
        self.chart.set_ordering(self.settings.ordering);
        if self.chart.is_collapsible() != self.settings.collapsible {
            self.chart.set_collapsible(self.settings.collapsible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_fill_missing_fields() {
        let settings: ChartSettings = serde_json::from_str(r#"{"kind":"Treemap"}"#).unwrap();
        assert_eq!(settings.kind, ChartKind::Treemap);
        assert_eq!(settings.link_shape, LinkShape::Dogleg);
        assert!(settings.show_labels);
    }

    #[test]
    fn test_apply_settings_switches_layout() {
        let mut state = ChartState::new();
        state.settings_mut().kind = ChartKind::Tree;
        state.settings_mut().ordering = ChildOrdering::ValueDescending;
        state.apply_settings(400.0, 300.0);

        assert!(matches!(state.chart().layout(), ChartLayout::Cluster { .. }));
        assert_eq!(state.chart().ordering(), ChildOrdering::ValueDescending);
    }

    #[test]
    fn test_turning_collapsible_off_resets_view() {
        let mut state = ChartState::with_settings(ChartSettings {
            collapsible: true,
            ..Default::default()
        });
        assert!(state.chart().is_collapsible());
        state.chart_mut().zoom_to(&rhier::PathKey::from(["US"]));
        assert!(state.chart().focus().is_some());

        state.settings_mut().collapsible = false;
        state.apply_settings(400.0, 300.0);
        assert!(!state.chart().is_collapsible());
        assert!(state.chart().focus().is_none());
    }
}
