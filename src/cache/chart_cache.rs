//! Caching of prepared charts.

use rhier::theme::CATEGORY20C;
use rhier::{OrdinalColorScale, PreparedChart};

use crate::domain::NodeShape;
use crate::presentation::color_mapping;
use crate::state::ChartSettings;

/// Inputs a prepared chart was computed from.
#[derive(Debug, Clone, PartialEq)]
struct CacheKey {
    generation: u64,
    size: [u32; 2],
    settings: ChartSettings,
}

/// Records passing the active filters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterSummary {
    pub records: usize,
    pub value: f64,
}

/// Cache for the stratified tree and its layout.
///
/// Rebuilding is needed when the dataset, the chart settings or the canvas
/// size change. Filter changes only touch `filter_summary`; highlighting is
/// computed while drawing.
pub struct ChartCache {
    /// Tree and node shapes (None before the first build, or when the
    /// build failed)
    pub prepared: Option<PreparedChart<NodeShape>>,

    /// Palette slot per node, indexed like the hierarchy's nodes
    pub palette_slots: Vec<usize>,

    /// Cached record count and value under the active filters
    pub filter_summary: Option<FilterSummary>,

    /// Label-to-slot assignment, kept across layout rebuilds so colors
    /// stay put while resizing
    color_scale: OrdinalColorScale,

    key: Option<CacheKey>,
}

impl ChartCache {
    pub fn new() -> Self {
        Self {
            prepared: None,
            palette_slots: Vec::new(),
            filter_summary: None,
            color_scale: OrdinalColorScale::new(CATEGORY20C.len()),
            key: None,
        }
    }

    /// True when the cached chart was built from exactly these inputs.
    pub fn is_valid(&self, generation: u64, size: [u32; 2], settings: &ChartSettings) -> bool {
        match &self.key {
            Some(key) => key.generation == generation && key.size == size && &key.settings == settings,
            None => false,
        }
    }

    /// Stores a build result. A failed build (`None`) is remembered too, so
    /// it is not retried every frame.
    pub fn store(
        &mut self,
        generation: u64,
        size: [u32; 2],
        settings: &ChartSettings,
        prepared: Option<PreparedChart<NodeShape>>,
    ) {
        self.palette_slots = match &prepared {
            Some(p) => color_mapping::assign_palette_slots(&p.hierarchy, &mut self.color_scale),
            None => Vec::new(),
        };
        self.prepared = prepared;
        self.key = Some(CacheKey {
            generation,
            size,
            settings: settings.clone(),
        });
    }

    /// Drops everything, including color assignments.
    ///
    /// Called when a new dataset is loaded.
    pub fn invalidate(&mut self) {
        self.prepared = None;
        self.palette_slots.clear();
        self.color_scale.reset();
        self.key = None;
        self.invalidate_filter_summary();
    }

    /// Forces a relayout on the next frame but keeps color assignments.
    pub fn invalidate_layout(&mut self) {
        self.key = None;
    }

    pub fn invalidate_filter_summary(&mut self) {
        self.filter_summary = None;
    }
}

impl Default for ChartCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhier::{DataRecord, Layout, TreeBuilder};

    use crate::domain::ChartLayout;

    fn prepared(settings: &ChartSettings) -> PreparedChart<NodeShape> {
        let records = vec![DataRecord::new(["a", "x"], 1.0), DataRecord::new(["b"], 2.0)];
        let hierarchy = TreeBuilder::new(&DataRecord::accessors()).build(&records).unwrap();
        let geometry = ChartLayout::from_settings(settings, 100.0, 100.0).layout(&hierarchy);
        PreparedChart { hierarchy, geometry, is_empty: false }
    }

    #[test]
    fn test_validity_tracks_inputs() {
        let settings = ChartSettings::default();
        let mut cache = ChartCache::new();
        assert!(!cache.is_valid(1, [100, 100], &settings));

        cache.store(1, [100, 100], &settings, Some(prepared(&settings)));
        assert!(cache.is_valid(1, [100, 100], &settings));
        assert!(!cache.is_valid(2, [100, 100], &settings));
        assert!(!cache.is_valid(1, [101, 100], &settings));

        let other = ChartSettings {
            padding: 3.0,
            ..settings.clone()
        };
        assert!(!cache.is_valid(1, [100, 100], &other));

        cache.invalidate();
        assert!(cache.prepared.is_none());
        assert!(!cache.is_valid(1, [100, 100], &settings));
    }

    #[test]
    fn test_palette_slots_per_node() {
        let settings = ChartSettings::default();
        let mut cache = ChartCache::new();
        cache.store(1, [100, 100], &settings, Some(prepared(&settings)));

        let p = cache.prepared.as_ref().unwrap();
        assert_eq!(cache.palette_slots.len(), p.hierarchy.len());

        // Descendants share their top-level branch's slot.
        let a = p.hierarchy.find(&rhier::PathKey::from(["a"])).unwrap();
        let ax = p.hierarchy.find(&rhier::PathKey::from(["a", "x"])).unwrap();
        let b = p.hierarchy.find(&rhier::PathKey::from(["b"])).unwrap();
        assert_eq!(cache.palette_slots[a.0], cache.palette_slots[ax.0]);
        assert_ne!(cache.palette_slots[a.0], cache.palette_slots[b.0]);
    }

    #[test]
    fn test_layout_invalidation_keeps_colors() {
        let settings = ChartSettings::default();
        let mut cache = ChartCache::new();
        cache.store(1, [100, 100], &settings, Some(prepared(&settings)));
        let slots = cache.palette_slots.clone();

        cache.invalidate_layout();
        assert!(!cache.is_valid(1, [100, 100], &settings));
        assert!(cache.prepared.is_some());

        cache.store(1, [100, 100], &settings, Some(prepared(&settings)));
        assert_eq!(cache.palette_slots, slots);
    }

    #[test]
    fn test_failed_build_is_remembered() {
        let settings = ChartSettings::default();
        let mut cache = ChartCache::new();
        cache.store(3, [10, 10], &settings, None);
        assert!(cache.is_valid(3, [10, 10], &settings));
        assert!(cache.prepared.is_none());
        assert!(cache.palette_slots.is_empty());
    }
}
