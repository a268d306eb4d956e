//! Hierarchical chart assembled from explicit capabilities.
//!
//! A `HierarchyChart` owns the record accessors, a child ordering, a layout
//! and a `FilterSet`. Rendering stays outside: a renderer asks the chart for
//! the prepared tree, node labels and selection state, and forwards clicks
//! back through `Filterable::filter_on_path`, or through `collapse_click`
//! when the chart is collapsible.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::filter_set::{ClickResolution, FilterSet};
use crate::hierarchy::{Hierarchy, NodeId, TreeBuilder, TreeNode};
use crate::layout::{Layout, Positioned};
use crate::path_key::PathKey;
use crate::traits::Accessors;

/// Labels smaller than this many radians are hidden in radial charts.
pub const DEFAULT_MIN_ANGLE_FOR_LABEL: f64 = 0.5;
pub const DEFAULT_EMPTY_TITLE: &str = "empty";

/// Owner of a chart's filter state.
pub trait Filterable {
    fn filter_set(&self) -> &FilterSet;

    fn filter_set_mut(&mut self) -> &mut FilterSet;

    /// True when some active filter matches `key`.
    fn is_selected_element(&self, key: &PathKey) -> bool {
        self.filter_set().is_selected(key)
    }

    fn has_filter(&self) -> bool {
        !self.filter_set().is_empty()
    }

    /// Handles a click on the node at `key`.
    fn filter_on_path(&mut self, key: &PathKey) -> ClickResolution {
        self.filter_set_mut().click(key)
    }

    fn clear_filters(&mut self) {
        self.filter_set_mut().clear_all();
    }

    /// Highlight state of a node under the current filters.
    fn highlight(&self, key: &PathKey) -> Highlight {
        if !self.has_filter() {
            Highlight::Normal
        } else if self.is_selected_element(key) {
            Highlight::Selected
        } else {
            Highlight::Deselected
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// No filter is active.
    Normal,
    Selected,
    /// Drawn faded.
    Deselected,
}

/// Order of siblings before layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChildOrdering {
    #[default]
    Key,
    ValueDescending,
    ValueAscending,
}

impl ChildOrdering {
    fn compare(&self, a: &TreeNode, b: &TreeNode) -> Ordering {
        match self {
            ChildOrdering::Key => a.key.cmp(&b.key),
            ChildOrdering::ValueDescending => b.value.total_cmp(&a.value).then_with(|| a.key.cmp(&b.key)),
            ChildOrdering::ValueAscending => a.value.total_cmp(&b.value).then_with(|| a.key.cmp(&b.key)),
        }
    }
}

/// A legend row.
#[derive(Debug, Clone, PartialEq)]
pub struct Legendable {
    pub key: PathKey,
    pub name: String,
    pub value: f64,
}

/// What a click on a collapsible chart changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewChange {
    /// New zoom focus; `None` is the root.
    Zoomed(Option<PathKey>),
    Collapsed(PathKey),
    Expanded(PathKey),
    /// Clicked a leaf of a layout that cannot zoom.
    Unchanged,
}

/// Tree and geometry ready for drawing.
#[derive(Debug, Clone)]
pub struct PreparedChart<G> {
    pub hierarchy: Hierarchy,
    pub geometry: Positioned<G>,
    /// No record had a value; only the root was laid out.
    pub is_empty: bool,
}

pub struct HierarchyChart<T, L> {
    accessors: Accessors<T>,
    layout: L,
    ordering: ChildOrdering,
    root_name: String,
    min_angle_for_label: f64,
    collapsible: bool,
    empty_title: String,
    filters: FilterSet,
    focus: Option<PathKey>,
    collapsed: HashSet<PathKey>,
}

pub struct HierarchyChartBuilder<T, L> {
    accessors: Accessors<T>,
    layout: L,
    ordering: ChildOrdering,
    root_name: String,
    min_angle_for_label: f64,
    collapsible: bool,
    empty_title: String,
}

impl<T, L: Layout> HierarchyChartBuilder<T, L> {
    pub fn ordering(mut self, ordering: ChildOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Label used for the node with the empty key.
    pub fn root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = root_name.into();
        self
    }

    pub fn min_angle_for_label(mut self, radians: f64) -> Self {
        self.min_angle_for_label = radians;
        self
    }

    /// Clicks zoom (or fold subtrees) instead of filtering.
    pub fn collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    /// Title of the lone root drawn when there is no data.
    pub fn empty_title(mut self, empty_title: impl Into<String>) -> Self {
        self.empty_title = empty_title.into();
        self
    }

    pub fn build(self) -> HierarchyChart<T, L> {
        HierarchyChart {
            accessors: self.accessors,
            layout: self.layout,
            ordering: self.ordering,
            root_name: self.root_name,
            min_angle_for_label: self.min_angle_for_label,
            collapsible: self.collapsible,
            empty_title: self.empty_title,
            filters: FilterSet::new(),
            focus: None,
            collapsed: HashSet::new(),
        }
    }
}

impl<T, L: Layout> HierarchyChart<T, L> {
    pub fn builder(accessors: Accessors<T>, layout: L) -> HierarchyChartBuilder<T, L> {
        HierarchyChartBuilder {
            accessors,
            layout,
            ordering: ChildOrdering::default(),
            root_name: "root".to_string(),
            min_angle_for_label: DEFAULT_MIN_ANGLE_FOR_LABEL,
            collapsible: false,
            empty_title: DEFAULT_EMPTY_TITLE.to_string(),
        }
    }

    pub fn accessors(&self) -> &Accessors<T> {
        &self.accessors
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: L) {
        self.layout = layout;
    }

    pub fn ordering(&self) -> ChildOrdering {
        self.ordering
    }

    pub fn set_ordering(&mut self, ordering: ChildOrdering) {
        self.ordering = ordering;
    }

    pub fn min_angle_for_label(&self) -> f64 {
        self.min_angle_for_label
    }

    pub fn empty_title(&self) -> &str {
        &self.empty_title
    }

    // ===== Collapsible View =====

    pub fn is_collapsible(&self) -> bool {
        self.collapsible
    }

    /// Turning collapsing off also drops the zoom focus and folded subtrees.
    pub fn set_collapsible(&mut self, collapsible: bool) {
        self.collapsible = collapsible;
        if !collapsible {
            self.reset_view();
        }
    }

    /// Current zoom focus; `None` means the root.
    pub fn focus(&self) -> Option<&PathKey> {
        self.focus.as_ref()
    }

    pub fn is_collapsed(&self, key: &PathKey) -> bool {
        self.collapsed.contains(key)
    }

    /// Zooms to `key`. Zooming to the root or to the current focus returns
    /// to the root.
    pub fn zoom_to(&mut self, key: &PathKey) -> Option<&PathKey> {
        if key.is_root() || self.focus.as_ref() == Some(key) {
            self.focus = None;
        } else {
            self.focus = Some(key.clone());
        }
        self.focus.as_ref()
    }

    /// Folds or unfolds the children of `key`. Returns whether it is folded now.
    pub fn toggle_collapsed(&mut self, key: &PathKey) -> bool {
        if self.collapsed.remove(key) {
            false
        } else {
            self.collapsed.insert(key.clone());
            true
        }
    }

    pub fn reset_view(&mut self) {
        self.focus = None;
        self.collapsed.clear();
    }

    /// Handles a click while the chart is collapsible: zooming layouts zoom
    /// to the node, others fold or unfold it. `hierarchy` is the prepared
    /// tree the click was made on.
    pub fn collapse_click(&mut self, hierarchy: &Hierarchy, key: &PathKey) -> ViewChange {
        let change = if self.layout.supports_zoom() {
            ViewChange::Zoomed(self.zoom_to(key).cloned())
        } else if self.collapsed.contains(key) {
            self.toggle_collapsed(key);
            ViewChange::Expanded(key.clone())
        } else if hierarchy.find(key).map_or(false, |id| !hierarchy.node(id).is_leaf()) {
            self.toggle_collapsed(key);
            ViewChange::Collapsed(key.clone())
        } else {
            ViewChange::Unchanged
        };
        debug!(?change, "collapse click");
        change
    }

    /// Builds and orders the tree, without layout.
    pub fn hierarchy(&self, records: &[T]) -> Result<Hierarchy> {
        let mut hierarchy = TreeBuilder::new(&self.accessors).build(records)?;
        let ordering = self.ordering;
        hierarchy.sort_children_by(|a, b| ordering.compare(a, b));
        Ok(hierarchy)
    }

    /// Tree plus layout geometry for `records`.
    ///
    /// Without data only the root is laid out. Folded subtrees are left out
    /// and a zoom focus rescales the geometry.
    pub fn prepare(&self, records: &[T]) -> Result<PreparedChart<L::Geometry>> {
        let is_empty = self.has_no_data(records);
        let full = self.hierarchy(records)?;
        let hierarchy = if is_empty {
            full.without_descendants(|node| node.key.is_root())
        } else if self.collapsed.is_empty() {
            full
        } else {
            full.without_descendants(|node| self.collapsed.contains(&node.key))
        };

        let focus = match &self.focus {
            Some(key) if !is_empty && self.layout.supports_zoom() => hierarchy.find(key),
            _ => None,
        };
        let geometry = match focus {
            Some(id) => self.layout.layout_focused(&hierarchy, id),
            None => self.layout.layout(&hierarchy),
        };
        debug!(
            nodes = hierarchy.len(),
            depth = hierarchy.max_depth(),
            is_empty,
            zoomed = focus.is_some(),
            "prepared chart"
        );
        Ok(PreparedChart { hierarchy, geometry, is_empty })
    }

    /// True when every record's value is zero (or unreadable).
    pub fn has_no_data(&self, records: &[T]) -> bool {
        records
            .iter()
            .all(|r| self.accessors.value(r).map_or(true, |v| v == 0.0 || !v.is_finite()))
    }

    /// Last key segment, or the root name for the root.
    pub fn key_label<'a>(&'a self, key: &'a PathKey) -> &'a str {
        key.label(&self.root_name)
    }

    /// Value shown for a node: a leaf record's own value, otherwise (or when
    /// the accessor fails) the node's aggregate.
    pub fn display_value(&self, hierarchy: &Hierarchy, id: NodeId, records: &[T]) -> f64 {
        let node = hierarchy.node(id);
        match node.record_index().and_then(|i| records.get(i)) {
            Some(record) if node.is_leaf() => match self.accessors.value(record) {
                Ok(v) if v.is_finite() => v,
                _ => node.value,
            },
            _ => node.value,
        }
    }

    /// `label: value` tooltip text.
    pub fn title(&self, hierarchy: &Hierarchy, id: NodeId, records: &[T]) -> String {
        let node = hierarchy.node(id);
        format!(
            "{}: {}",
            self.key_label(&node.key),
            format_value(self.display_value(hierarchy, id, records))
        )
    }

    /// Every node except the root, ordered by name (then key).
    pub fn legendables(&self, hierarchy: &Hierarchy) -> Vec<Legendable> {
        let mut rows: Vec<Legendable> = hierarchy
            .nodes()
            .iter()
            .filter(|n| !n.key.is_root())
            .map(|n| Legendable {
                key: n.key.clone(),
                name: self.key_label(&n.key).to_string(),
                value: n.value,
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.key.cmp(&b.key)));
        rows
    }

    /// Records passing the active filters. Records with an unreadable key
    /// only pass when no filter is active.
    pub fn filter_records<'r>(&self, records: &'r [T]) -> Vec<&'r T> {
        if self.filters.is_empty() {
            return records.iter().collect();
        }
        records
            .iter()
            .filter(|r| match self.accessors.key(r) {
                Ok(key) => self.filters.matches_record(&key),
                Err(_) => false,
            })
            .collect()
    }
}

impl<T, L> Filterable for HierarchyChart<T, L> {
    fn filter_set(&self) -> &FilterSet {
        &self.filters
    }

    fn filter_set_mut(&mut self) -> &mut FilterSet {
        &mut self.filters
    }
}

/// Integers without a fraction, everything else with up to two decimals.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
