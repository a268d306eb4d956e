//! Details panel UI rendering
//!
//! Hovered node, active filters and the legend of top-level branches.

use eframe::egui;
use egui::RichText;
use rhier::{format_value, Filterable, HierarchyFilter, NodeOrigin, PathKey, ThemeColors};

use crate::app::AppState;
use crate::presentation::color_mapping;
use crate::utils::format_count;

/// Result of user interaction with the details panel
pub enum DetailsInteraction {
    /// Legend entry clicked; behaves like clicking the node
    NodeClicked(PathKey),
    RemoveFilter(HierarchyFilter),
    ClearFilters,
}

/// Also records which legend row is under the pointer, so the chart can
/// outline the matching slice.
pub fn render_details_panel(
    ui: &mut egui::Ui,
    state: &mut AppState,
    colors: &ThemeColors,
) -> Option<DetailsInteraction> {
    let mut interaction = None;

    ui.heading("Details");
    ui.separator();

    render_hovered(ui, state, colors);
    ui.separator();

    if let Some(i) = render_filters(ui, state, colors) {
        interaction = Some(i);
    }
    ui.separator();

    let (legend_interaction, legend_hovered) = render_legend(ui, state, colors);
    if let Some(i) = legend_interaction {
        interaction = Some(i);
    }
    state.selection.set_legend_hovered(legend_hovered);

    interaction
}

fn render_hovered(ui: &mut egui::Ui, state: &AppState, colors: &ThemeColors) {
    let chart = state.chart.chart();
    let node = state.selection.highlighted().and_then(|key| {
        let prepared = state.chart_cache.prepared.as_ref()?;
        let id = prepared.hierarchy.find(key)?;
        Some((prepared, id))
    });

    let Some((prepared, id)) = node else {
        ui.label(RichText::new("Hover a node to inspect it").color(colors.text_dim));
        return;
    };
    let node = prepared.hierarchy.node(id);

    ui.label(RichText::new(chart.key_label(&node.key)).strong().size(15.0));
    egui::Grid::new("hovered_node").num_columns(2).show(ui, |ui| {
        ui.label("Path:");
        ui.label(if node.key.is_root() { "(root)".to_string() } else { node.key.to_string() });
        ui.end_row();

        ui.label("Value:");
        ui.label(format_value(chart.display_value(&prepared.hierarchy, id, state.dataset.records())));
        ui.end_row();

        ui.label("Total:");
        ui.label(format_value(node.value));
        ui.end_row();

        ui.label("Depth:");
        ui.label(node.depth.to_string());
        ui.end_row();

        ui.label("Children:");
        ui.label(node.children.len().to_string());
        ui.end_row();

        ui.label("Source:");
        ui.label(match node.origin {
            NodeOrigin::Record(_) => "record",
            NodeOrigin::Synthesized => "synthesized ancestor",
            NodeOrigin::ImplicitRoot => "implicit root",
        });
        ui.end_row();
    });
}

fn render_filters(ui: &mut egui::Ui, state: &AppState, colors: &ThemeColors) -> Option<DetailsInteraction> {
    let mut interaction = None;
    let filters = state.chart.chart().filter_set();

    ui.horizontal(|ui| {
        ui.label(RichText::new("Filters").strong());
        if !filters.is_empty() && ui.small_button("Clear all").clicked() {
            interaction = Some(DetailsInteraction::ClearFilters);
        }
    });

    if filters.is_empty() {
        ui.label(RichText::new("None. Click a node to filter.").color(colors.text_dim));
    }
    for filter in filters.filters() {
        ui.horizontal(|ui| {
            if ui.small_button("✖").on_hover_text("Remove filter").clicked() {
                interaction = Some(DetailsInteraction::RemoveFilter(filter.clone()));
            }
            ui.label(RichText::new(filter.to_string()).color(colors.accent));
        });
    }

    let total = state.dataset.records().len();
    match state.chart_cache.filter_summary {
        Some(summary) => {
            ui.label(format!(
                "Records: {} / {} (value {})",
                format_count(summary.records),
                format_count(total),
                format_value(summary.value)
            ));
        }
        None => {
            ui.label(RichText::new(format!("Records: … / {}", format_count(total))).color(colors.text_dim));
        }
    }

    interaction
}

/// Returns the clicked row's interaction and the hovered row's key.
fn render_legend(
    ui: &mut egui::Ui,
    state: &AppState,
    colors: &ThemeColors,
) -> (Option<DetailsInteraction>, Option<PathKey>) {
    let mut interaction = None;
    let mut hovered = None;
    let Some(prepared) = state.chart_cache.prepared.as_ref() else {
        return (None, None);
    };
    let chart = state.chart.chart();

    ui.label(RichText::new("Legend").strong());
    egui::ScrollArea::vertical().id_salt("legend").show(ui, |ui| {
        for row in chart.legendables(&prepared.hierarchy).iter().filter(|r| r.key.len() == 1) {
            let Some(id) = prepared.hierarchy.find(&row.key) else {
                continue;
            };
            let slot = state.chart_cache.palette_slots.get(id.0).copied().unwrap_or(0);
            let highlight = chart.highlight(&row.key);
            let fill = color_mapping::node_fill(slot, 1, highlight, colors);

            ui.horizontal(|ui| {
                let (swatch, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(swatch, 2.0, fill);

                let text = format!("{}  {}", row.name, format_value(row.value));
                let response = ui.selectable_label(chart.is_selected_element(&row.key) && chart.has_filter(), text);
                if response.hovered() {
                    hovered = Some(row.key.clone());
                }
                if response.clicked() {
                    interaction = Some(DetailsInteraction::NodeClicked(row.key.clone()));
                }
            });
        }
    });

    (interaction, hovered)
}
