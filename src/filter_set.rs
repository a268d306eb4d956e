use tracing::debug;

use crate::filter::HierarchyFilter;
use crate::path_key::PathKey;

/// Filter changes produced by a click, to be applied with
/// `FilterSet::apply`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickResolution {
    /// Active filters related to the clicked path.
    pub remove: Vec<HierarchyFilter>,
    /// Filter to install; `None` when the click toggled an exact match off.
    pub add: Option<HierarchyFilter>,
}

impl ClickResolution {
    pub fn is_noop(&self) -> bool {
        self.remove.is_empty() && self.add.is_none()
    }
}

/// Active filters of one chart.
///
/// Filters keep their insertion order and are never duplicated. Changes made
/// through `resolve_click`/`apply` keep the set an antichain: no filter is an
/// ancestor or descendant of another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    filters: Vec<HierarchyFilter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Queries =====

    pub fn filters(&self) -> &[HierarchyFilter] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn contains(&self, filter: &HierarchyFilter) -> bool {
        self.filters.contains(filter)
    }

    /// Active filters equal to, above, or below `path`.
    pub fn filters_for_path(&self, path: &PathKey) -> Vec<HierarchyFilter> {
        let clicked = HierarchyFilter::new(path.clone());
        self.filters
            .iter()
            .filter(|f| f.is_filtered(path) || clicked.is_filtered(f.target()))
            .cloned()
            .collect()
    }

    /// True when some active filter matches `path`; drives highlighting.
    pub fn is_selected(&self, path: &PathKey) -> bool {
        self.filters.iter().any(|f| f.is_filtered(path))
    }

    /// Record predicate: everything passes when no filter is active.
    pub fn matches_record(&self, path: &PathKey) -> bool {
        self.filters.is_empty() || self.is_selected(path)
    }

    // ===== Click Resolution =====

    /// Works out what clicking `path` does, without changing the set.
    ///
    /// Every related filter is removed. A new filter for `path` is added
    /// unless one of the removed filters was exactly `path`, in which case
    /// the click deselects.
    pub fn resolve_click(&self, path: &PathKey) -> ClickResolution {
        let remove = self.filters_for_path(path);
        let exact_match = remove.iter().any(|f| f.target() == path);
        let add = if exact_match {
            None
        } else {
            Some(HierarchyFilter::new(path.clone()))
        };
        ClickResolution { remove, add }
    }

    pub fn apply(&mut self, resolution: &ClickResolution) {
        self.filters.retain(|f| !resolution.remove.contains(f));
        if let Some(filter) = &resolution.add {
            self.add(filter.clone());
        }
        debug_assert!(self.is_antichain());
        debug!(
            removed = resolution.remove.len(),
            added = resolution.add.is_some(),
            active = self.filters.len(),
            "applied click resolution"
        );
    }

    /// `resolve_click` followed by `apply`; returns what was done.
    pub fn click(&mut self, path: &PathKey) -> ClickResolution {
        let resolution = self.resolve_click(path);
        self.apply(&resolution);
        resolution
    }

    // ===== Direct Mutation =====

    /// Adds `filter` unless an equal one is active. Returns whether it was added.
    ///
    /// Active filters above or below the new one are dropped first, so the
    /// set stays an antichain. Unlike a click, adding never toggles off.
    pub fn add(&mut self, filter: HierarchyFilter) -> bool {
        if self.filters.contains(&filter) {
            return false;
        }
        self.filters.retain(|f| !f.is_filtered(filter.target()));
        self.filters.push(filter);
        true
    }

    pub fn remove(&mut self, filter: &HierarchyFilter) -> bool {
        let before = self.filters.len();
        self.filters.retain(|f| f != filter);
        before != self.filters.len()
    }

    pub fn clear_all(&mut self) {
        self.filters.clear();
    }

    fn is_antichain(&self) -> bool {
        self.filters.iter().enumerate().all(|(i, a)| {
            self.filters[i + 1..]
                .iter()
                .all(|b| !a.is_filtered(b.target()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &[&str]) -> PathKey {
        PathKey::from(raw)
    }

    #[test]
    fn test_click_twice_toggles() {
        let mut set = FilterSet::new();
        let path = key(&["US", "West"]);

        let first = set.resolve_click(&path);
        assert_eq!(first.add, Some(HierarchyFilter::new(path.clone())));
        assert!(first.remove.is_empty());
        set.apply(&first);

        let second = set.resolve_click(&path);
        assert_eq!(second.add, None);
        assert_eq!(second.remove, vec![HierarchyFilter::new(path.clone())]);
        set.apply(&second);
        assert!(set.is_empty());
    }

    #[test]
    fn test_resolve_click_is_pure() {
        let mut set = FilterSet::new();
        set.click(&key(&["A"]));
        let snapshot = set.clone();
        let _ = set.resolve_click(&key(&["A", "B"]));
        assert_eq!(set, snapshot);
    }

    #[test]
    fn test_disjoint_filters_coexist() {
        let mut set = FilterSet::new();
        set.click(&key(&["CA", "East", "Ontario"]));
        set.click(&key(&["US", "West", "Colorado"]));

        assert_eq!(set.len(), 2);
        assert!(set.is_selected(&key(&["CA"])));
        assert!(set.is_selected(&key(&["US", "West", "Colorado"])));
        assert!(!set.is_selected(&key(&["US", "East"])));
    }

    #[test]
    fn test_ancestor_click_replaces_descendant() {
        let mut set = FilterSet::new();
        set.click(&key(&["CA", "East", "Ontario"]));
        let resolution = set.click(&key(&["CA", "East"]));

        assert_eq!(resolution.remove, vec![HierarchyFilter::new(key(&["CA", "East", "Ontario"]))]);
        assert_eq!(set.filters(), &[HierarchyFilter::new(key(&["CA", "East"]))]);
    }

    #[test]
    fn test_descendant_click_replaces_ancestor() {
        let mut set = FilterSet::new();
        set.click(&key(&["CA"]));
        set.click(&key(&["US"]));
        set.click(&key(&["CA", "East"]));

        assert_eq!(
            set.filters(),
            &[HierarchyFilter::new(key(&["US"])), HierarchyFilter::new(key(&["CA", "East"]))]
        );
    }

    #[test]
    fn test_filters_for_path() {
        let mut set = FilterSet::new();
        set.add(HierarchyFilter::new(key(&["A", "B"])));
        set.add(HierarchyFilter::new(key(&["C"])));

        assert_eq!(set.filters_for_path(&key(&["A"])).len(), 1);
        assert_eq!(set.filters_for_path(&key(&["A", "B", "C"])).len(), 1);
        assert!(set.filters_for_path(&key(&["A", "X"])).is_empty());
        assert_eq!(set.filters_for_path(&PathKey::root()).len(), 2);
    }

    #[test]
    fn test_record_predicate() {
        let mut set = FilterSet::new();
        assert!(set.matches_record(&key(&["anything"])));

        set.click(&key(&["US", "East"]));
        assert!(set.matches_record(&key(&["US", "East", "Ontario"])));
        assert!(!set.matches_record(&key(&["US", "West", "Colorado"])));
    }

    #[test]
    fn test_add_remove_clear() {
        let mut set = FilterSet::new();
        let f = HierarchyFilter::new(key(&["x"]));
        assert!(set.add(f.clone()));
        assert!(!set.add(f.clone()));
        assert!(set.contains(&f));
        assert!(set.remove(&f));
        assert!(!set.remove(&f));

        set.click(&key(&["a"]));
        set.click(&key(&["b"]));
        set.clear_all();
        assert!(set.is_empty());
    }

    #[test]
    fn test_add_replaces_related_filters() {
        let mut set = FilterSet::new();
        assert!(set.add(HierarchyFilter::new(key(&["A"]))));
        assert!(set.add(HierarchyFilter::new(key(&["A", "B"]))));
        assert_eq!(set.filters(), &[HierarchyFilter::new(key(&["A", "B"]))]);

        set.click(&key(&["C"]));
        assert_eq!(
            set.filters(),
            &[HierarchyFilter::new(key(&["A", "B"])), HierarchyFilter::new(key(&["C"]))]
        );
        assert!(set.is_antichain());

        assert!(set.add(HierarchyFilter::new(key(&["A"]))));
        assert_eq!(
            set.filters(),
            &[HierarchyFilter::new(key(&["C"])), HierarchyFilter::new(key(&["A"]))]
        );
    }
}
