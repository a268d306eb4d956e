//! Hierarchy Viewer GUI Application
//!
//! Interactive viewer for hierarchical datasets built on egui.
//! - Sunburst, partition, treemap, dendrogram and tidy tree charts

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
//! - Click a node to filter on it, click again to drop the filter
//! - Asynchronous file loading with loading indicators
//! - Multiple theme support with persistent preferences
//!
//! Module layout:
//! - `app/` - Application state and coordinators
//! - `domain/` - Chart kinds and the canvas layout wrapper
//! - `presentation/` - Node colors (separated from domain logic)
//! - `cache/` - Prepared chart cache
//! - `io/` - File loading and virtual dataset generation
//! - `utils/` - Formatting helpers
//! - `ui/` - Panel rendering and interaction
//! - `rendering/` - Low-level chart painting
//! - `state/` - Dataset, chart settings, selection and layout state

use eframe::egui;
use rhier::{RedrawCoalescer, ViewChange};
use std::path::PathBuf;

mod utils;
mod cache;
mod domain;
mod presentation;
mod io;
mod app;
mod rendering;
mod ui;
mod state;

use app::{AppState, ApplicationCoordinator, SettingsCoordinator, ThemeCoordinator};
use io::AsyncLoader;
use state::{ChartSettings, LayoutState};
use ui::panel_manager::{PanelInteraction, PanelManager};

const CHART_SETTINGS_KEY: &str = "chart_settings";
const LAYOUT_KEY: &str = "layout";

/// Main application entry point that launches the hierarchy viewer.
fn main() -> eframe::Result {
    rhier::logging::init_logging();

    // Optional dataset to open on startup
    let initial_file = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Hierarchy Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "Hierarchy Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(HierViewerApp::new(cc, initial_file)))),
    )
}

/// The viewer application. Work is delegated to coordinators:
/// - `ApplicationCoordinator` handles loading and filter clicks
/// - `ThemeCoordinator` handles theme persistence and application
/// - `PanelManager` handles panel layout and rendering
struct HierViewerApp {
    state: AppState,
    loader: AsyncLoader,
    /// Work deferred to the end of the frame
    redraw: RedrawCoalescer<AppState>,
    /// Optional file to load on first frame
    pending_file_load: Option<PathBuf>,
}

impl HierViewerApp {
    /// Creates the viewer with theme, chart settings and layout restored from storage.
    fn new(cc: &eframe::CreationContext, initial_file: Option<PathBuf>) -> Self {
        let theme_name = ThemeCoordinator::load_theme_from_storage(cc.storage);
        let chart_settings: ChartSettings =
            SettingsCoordinator::load_setting_or(cc.storage, CHART_SETTINGS_KEY, ChartSettings::default());
        let layout: LayoutState = SettingsCoordinator::load_setting_or(cc.storage, LAYOUT_KEY, LayoutState::default());

        Self {
            state: AppState::with_settings(theme_name, chart_settings, layout),
            loader: AsyncLoader::new(),
            redraw: RedrawCoalescer::new(),
            pending_file_load: initial_file,
        }
    }

    fn handle_panel_interaction(&mut self, interaction: PanelInteraction, ctx: &egui::Context) {
        match interaction {
            PanelInteraction::OpenFileRequested(path) => {
                ApplicationCoordinator::open_file(&mut self.state, &mut self.loader, path, ctx);
            }
            PanelInteraction::OpenVirtualDatasetRequested => {
                ApplicationCoordinator::open_virtual_dataset(&mut self.state, &mut self.loader, &mut self.redraw);
            }
            PanelInteraction::NodeClicked(key) => {
                ApplicationCoordinator::handle_node_click(&mut self.state, &mut self.redraw, &key);
            }
            PanelInteraction::CollapseClicked(key) => {
                if ApplicationCoordinator::handle_collapse_click(&mut self.state, &key) != ViewChange::Unchanged {
                    ctx.request_repaint();
                }
            }
            PanelInteraction::RemoveFilter(filter) => {
                ApplicationCoordinator::remove_filter(&mut self.state, &mut self.redraw, &filter);
            }
            PanelInteraction::ClearFilters => {
                ApplicationCoordinator::clear_filters(&mut self.state, &mut self.redraw);
            }
        }
    }

    fn persist(&self, storage: &mut dyn eframe::Storage) {
        ThemeCoordinator::save_theme_to_storage(storage, self.state.theme.current_theme_name());
        SettingsCoordinator::save_setting(storage, CHART_SETTINGS_KEY, self.state.chart.settings());
        SettingsCoordinator::save_setting(storage, LAYOUT_KEY, &self.state.layout);
    }
}

impl eframe::App for HierViewerApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.persist(storage);
    }

    /// Per frame:
    /// 1. Apply a finished background load
    /// 2. Apply theme and persist preferences
    /// 3. Open the command line file on the first frame
    /// 4. Render panels and handle their interaction
    /// 5. Flush the deferred filter refresh
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        ApplicationCoordinator::check_loading_completion(&mut self.state, &mut self.loader, &mut self.redraw);

        ThemeCoordinator::apply_current_theme(ctx, &self.state);

        // Persist preferences during frame (for crash resilience)
        if let Some(storage) = frame.storage_mut() {
            self.persist(storage);
        }

        if let Some(path) = self.pending_file_load.take() {
            ApplicationCoordinator::open_file(&mut self.state, &mut self.loader, path, ctx);
        }

        if let Some(interaction) = PanelManager::render_all_panels(ctx, &mut self.state, &self.loader) {
            self.handle_panel_interaction(interaction, ctx);
        }

        if self.redraw.flush(&mut self.state) {
            ctx.request_repaint();
        }
    }
}
