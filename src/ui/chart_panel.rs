//! Chart canvas UI rendering
//!
//! Draws the prepared chart, shows the hovered node's title as a tooltip
//! and reports clicks. A collapsible chart turns clicks into zooming or
//! folding instead of filtering.

use eframe::egui;
use egui::{Align2, FontId};
use rhier::{PathKey, Point, ThemeColors};

use crate::app::AppState;
use crate::io::AsyncLoader;
use crate::rendering::chart_renderer::{render_chart, ChartPainter, ChartScene};

/// Result of user interaction with the chart canvas
pub enum ChartPanelInteraction {
    NodeClicked(PathKey),
    CollapseClicked(PathKey),
}

fn centered_message(ui: &mut egui::Ui, text: &str, colors: &ThemeColors) {
    let rect = ui.available_rect_before_wrap();
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(18.0),
        colors.text_dim,
    );
}

pub fn render_chart_panel(
    ui: &mut egui::Ui,
    state: &mut AppState,
    loader: &AsyncLoader,
    colors: &ThemeColors,
) -> Option<ChartPanelInteraction> {
    if loader.is_loading() {
        centered_message(ui, "Loading dataset…", colors);
        return None;
    }
    if state.dataset.dataset().is_none() {
        centered_message(ui, "Open a dataset or generate a virtual one", colors);
        return None;
    }
    let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click());
    let rect = response.rect;
    state.prepare_chart(rect.width(), rect.height());

    // A failed build leaves no chart; the header shows the error.
    let prepared = state.chart_cache.prepared.as_ref()?;
    let chart = state.chart.chart();
    let records = state.dataset.records();

    let hovered_id = response.hover_pos().and_then(|pos| {
        let local = Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
        chart.layout().hit_test(&prepared.hierarchy, &prepared.geometry, local)
    });
    let hovered_key = hovered_id.map(|id| prepared.hierarchy.node(id).key.clone());

    let scene = ChartScene {
        chart,
        prepared,
        palette_slots: &state.chart_cache.palette_slots,
        settings: state.chart.settings(),
        colors,
        hovered: hovered_key.as_ref().or(state.selection.legend_hovered()),
    };
    render_chart(&ChartPainter::new(&painter, rect.min), &scene);

    let clicked = response.clicked();
    if let Some(id) = hovered_id {
        response.on_hover_text_at_pointer(chart.title(&prepared.hierarchy, id, records));
    } else if prepared.is_empty {
        response.on_hover_text_at_pointer(chart.empty_title());
    }

    let interaction = match (&hovered_key, clicked) {
        (Some(key), true) if chart.is_collapsible() => Some(ChartPanelInteraction::CollapseClicked(key.clone())),
        (Some(key), true) => Some(ChartPanelInteraction::NodeClicked(key.clone())),
        // The root is never hit; clicking outside every shape zooms back out.
        (None, true) if chart.focus().is_some() => Some(ChartPanelInteraction::CollapseClicked(PathKey::root())),
        _ => None,
    };
    state.selection.set_hovered(hovered_key);
    interaction
}
