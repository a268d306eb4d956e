//! Application-level coordination and workflow management.
//!
//! Handles dataset loading, filter clicks and the coalesced refresh of
//! everything derived from the active filters.

use rhier::{Filterable, HierarchyFilter, PathKey, RedrawCoalescer, ViewChange};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::app::AppState;
use crate::io::{AsyncLoader, LoadResult};

/// Coordinates application-level operations and workflows.
pub struct ApplicationCoordinator;

impl ApplicationCoordinator {
    /// Initiates asynchronous file loading.
    ///
    /// Clears the previous dataset right away so the loading indicator shows.
    pub fn open_file(state: &mut AppState, loader: &mut AsyncLoader, path: PathBuf, ctx: &egui::Context) {
        state.reset_dataset_state();
        loader.start_file_load(path, ctx);
    }

    /// Applies a finished background load. Called once per frame.
    ///
    /// Returns true if a load operation completed (success or error).
    pub fn check_loading_completion(
        state: &mut AppState,
        loader: &mut AsyncLoader,
        redraw: &mut RedrawCoalescer<AppState>,
    ) -> bool {
        match loader.check_completion() {
            LoadResult::Success { data, path } => {
                info!(records = data.len(), source = %data.metadata.source, "dataset ready");
                Self::install_dataset(state, redraw, data, path);
                true
            }
            LoadResult::Error(error_msg) => {
                state.error_message = Some(format!("Error loading dataset: {}", error_msg));
                state.dataset.clear();
                true
            }
            LoadResult::None => false,
        }
    }

    /// Generates and shows the virtual dataset.
    pub fn open_virtual_dataset(state: &mut AppState, loader: &mut AsyncLoader, redraw: &mut RedrawCoalescer<AppState>) {
        state.reset_dataset_state();
        match loader.load_virtual_dataset() {
            Ok(data) => Self::install_dataset(state, redraw, data, None),
            Err(e) => {
                state.error_message = Some(format!("Error generating virtual dataset: {}", e));
            }
        }
    }

    fn install_dataset(
        state: &mut AppState,
        redraw: &mut RedrawCoalescer<AppState>,
        data: rhier::Dataset,
        path: Option<PathBuf>,
    ) {
        state.dataset.load_dataset(data, path);
        state.error_message = None;
        state.selection.clear();
        state.chart.chart_mut().clear_filters();
        state.chart.chart_mut().reset_view();
        state.chart_cache.invalidate();
        Self::schedule_filter_refresh(state, redraw);
    }

    /// Toggles the filter for a clicked node.
    pub fn handle_node_click(state: &mut AppState, redraw: &mut RedrawCoalescer<AppState>, key: &PathKey) {
        let resolution = state.chart.chart_mut().filter_on_path(key);
        debug!(
            clicked = %key,
            removed = resolution.remove.len(),
            added = resolution.add.is_some(),
            "filter click"
        );
        if !resolution.is_noop() {
            Self::schedule_filter_refresh(state, redraw);
        }
    }

    /// Zooms or folds at a clicked node while the chart is collapsible.
    /// Filters are left alone.
    pub fn handle_collapse_click(state: &mut AppState, key: &PathKey) -> ViewChange {
        let Some(prepared) = state.chart_cache.prepared.as_ref() else {
            return ViewChange::Unchanged;
        };
        let change = state.chart.chart_mut().collapse_click(&prepared.hierarchy, key);
        if change != ViewChange::Unchanged {
            state.chart_cache.invalidate_layout();
        }
        change
    }

    pub fn remove_filter(state: &mut AppState, redraw: &mut RedrawCoalescer<AppState>, filter: &HierarchyFilter) {
        if state.chart.chart_mut().filter_set_mut().remove(filter) {
            Self::schedule_filter_refresh(state, redraw);
        }
    }

    pub fn clear_filters(state: &mut AppState, redraw: &mut RedrawCoalescer<AppState>) {
        if state.chart.chart().has_filter() {
            state.chart.chart_mut().clear_filters();
            Self::schedule_filter_refresh(state, redraw);
        }
    }

    /// Drops the stale summary now and recomputes it once at the end of
    /// the frame, however many filter changes happen before then.
    fn schedule_filter_refresh(state: &mut AppState, redraw: &mut RedrawCoalescer<AppState>) {
        state.chart_cache.invalidate_filter_summary();
        redraw.trigger(|state: &mut AppState| state.refresh_filter_summary());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> (AppState, AsyncLoader, RedrawCoalescer<AppState>) {
        let mut state = AppState::new();
        let mut loader = AsyncLoader::new();
        let mut redraw = RedrawCoalescer::new();
        ApplicationCoordinator::open_virtual_dataset(&mut state, &mut loader, &mut redraw);
        (state, loader, redraw)
    }

    #[test]
    fn test_virtual_dataset_schedules_summary() {
        let (mut state, _loader, mut redraw) = loaded();
        assert!(state.dataset.dataset().is_some());
        assert!(state.chart_cache.filter_summary.is_none());

        assert!(redraw.flush(&mut state));
        let summary = state.chart_cache.filter_summary.unwrap();
        assert_eq!(summary.records, state.dataset.records().len());
    }

    #[test]
    fn test_clicks_coalesce_into_one_refresh() {
        let (mut state, _loader, mut redraw) = loaded();
        redraw.flush(&mut state);

        let first = state.dataset.records()[0].key.prefix(1);
        ApplicationCoordinator::handle_node_click(&mut state, &mut redraw, &first);
        ApplicationCoordinator::handle_node_click(&mut state, &mut redraw, &first);
        ApplicationCoordinator::handle_node_click(&mut state, &mut redraw, &first);
        assert!(state.chart_cache.filter_summary.is_none());

        assert!(redraw.flush(&mut state));
        assert!(!redraw.flush(&mut state));

        // Three clicks on the same node leave it filtered.
        assert!(state.chart.chart().is_selected_element(&first));
        let expected = state
            .dataset
            .records()
            .iter()
            .filter(|r| first.is_prefix_of(&r.key))
            .count();
        assert_eq!(state.chart_cache.filter_summary.unwrap().records, expected);
    }

    #[test]
    fn test_remove_and_clear() {
        let (mut state, _loader, mut redraw) = loaded();
        let key = state.dataset.records()[0].key.clone();
        ApplicationCoordinator::handle_node_click(&mut state, &mut redraw, &key);
        redraw.flush(&mut state);

        ApplicationCoordinator::remove_filter(&mut state, &mut redraw, &HierarchyFilter::new(key));
        assert!(!state.chart.chart().has_filter());
        assert!(redraw.is_pending());
        redraw.flush(&mut state);

        // Nothing to clear: no refresh scheduled.
        ApplicationCoordinator::clear_filters(&mut state, &mut redraw);
        assert!(!redraw.is_pending());
    }

    #[test]
    fn test_collapse_click_zooms_without_filtering() {
        let (mut state, _loader, mut redraw) = loaded();
        redraw.flush(&mut state);
        state.chart.settings_mut().collapsible = true;
        state.prepare_chart(600.0, 400.0);

        let first = state.dataset.records()[0].key.prefix(1);
        let change = ApplicationCoordinator::handle_collapse_click(&mut state, &first);
        assert_eq!(change, ViewChange::Zoomed(Some(first.clone())));
        assert!(!state.chart.chart().has_filter());
        assert!(!redraw.flush(&mut state));

        // The next frame relayouts around the focus; a second click zooms out.
        state.prepare_chart(600.0, 400.0);
        assert_eq!(state.chart.chart().focus(), Some(&first));
        let change = ApplicationCoordinator::handle_collapse_click(&mut state, &first);
        assert_eq!(change, ViewChange::Zoomed(None));
    }
}
