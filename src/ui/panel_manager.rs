//! Panel orchestration and layout management.
//!
//! Lays out the header, status bar, details side panel and chart canvas,
//! and funnels their interactions into one `PanelInteraction`.

use rhier::{HierarchyFilter, PathKey};

use crate::app::AppState;
use crate::io::AsyncLoader;
use crate::presentation::color_mapping;
use crate::ui::{chart_panel, details_panel, header, status_bar};

/// Result of panel interactions that need to be handled by the application coordinator.
pub enum PanelInteraction {
    OpenFileRequested(std::path::PathBuf),
    OpenVirtualDatasetRequested,
    /// A chart node or legend entry was clicked
    NodeClicked(PathKey),
    /// A chart node was clicked while the chart is collapsible
    CollapseClicked(PathKey),
    RemoveFilter(HierarchyFilter),
    ClearFilters,
}

/// Manages the layout and rendering of all UI panels.
pub struct PanelManager;

impl PanelManager {
    /// Renders all panels; called from `eframe::App::update`.
    pub fn render_all_panels(
        ctx: &egui::Context,
        state: &mut AppState,
        loader: &AsyncLoader,
    ) -> Option<PanelInteraction> {
        let mut interaction: Option<PanelInteraction> = None;

        let theme_colors =
            color_mapping::theme_colors(state.theme.theme_manager(), state.theme.current_theme_name()).clone();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            if let Some(header_interaction) = header::render_header(ui, state) {
                interaction = Some(match header_interaction {
                    header::HeaderInteraction::OpenFileRequested(path) => PanelInteraction::OpenFileRequested(path),
                    header::HeaderInteraction::OpenVirtualDatasetRequested => {
                        PanelInteraction::OpenVirtualDatasetRequested
                    }
                });
            }
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            status_bar::render_status_bar(ui, state);
        });

        let details = egui::SidePanel::right("details_panel")
            .default_width(state.layout.details_width())
            .resizable(true)
            .show(ctx, |ui| {
                egui::Frame::default().inner_margin(4.0).show(ui, |ui| {
                    details_panel::render_details_panel(ui, state, &theme_colors)
                })
                .inner
            });
        state.layout.set_details_width(details.response.rect.width());
        if let Some(details_interaction) = details.inner {
            interaction = Some(match details_interaction {
                details_panel::DetailsInteraction::NodeClicked(key) => PanelInteraction::NodeClicked(key),
                details_panel::DetailsInteraction::RemoveFilter(filter) => PanelInteraction::RemoveFilter(filter),
                details_panel::DetailsInteraction::ClearFilters => PanelInteraction::ClearFilters,
            });
        }

        let chart_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(4))
            .fill(theme_colors.background);

        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            if let Some(chart_interaction) = chart_panel::render_chart_panel(ui, state, loader, &theme_colors) {
                interaction = Some(match chart_interaction {
                    chart_panel::ChartPanelInteraction::NodeClicked(key) => PanelInteraction::NodeClicked(key),
                    chart_panel::ChartPanelInteraction::CollapseClicked(key) => {
                        PanelInteraction::CollapseClicked(key)
                    }
                });
            }
        });

        interaction
    }
}
