//! Status bar UI rendering
//!
//! Memory usage and a summary of the loaded dataset.

use eframe::egui;
use egui::RichText;
use rhier::Filterable;

use crate::app::AppState;
use crate::utils::{format_count, format_memory_mb, get_current_memory_mb};

pub fn render_status_bar(ui: &mut egui::Ui, state: &AppState) {
    ui.horizontal(|ui| {
        // Always show memory usage first
        let memory_text = format_memory_mb(get_current_memory_mb());
        ui.label(RichText::new(&memory_text).strong());
        ui.label(RichText::new("|").strong());

        let Some(dataset) = state.dataset.dataset() else {
            ui.label(RichText::new("No dataset loaded").strong());
            return;
        };

        let source = match state.dataset.file_path() {
            Some(path) => path.display().to_string(),
            None => dataset.metadata.source.clone(),
        };
        let mut text = format!("{} | Records: {}", source, format_count(dataset.len()));

        if let Some(prepared) = state.chart_cache.prepared.as_ref() {
            text.push_str(&format!(
                " | Nodes: {} | Depth: {}",
                format_count(prepared.hierarchy.len()),
                prepared.hierarchy.max_depth()
            ));
        }
        ui.label(RichText::new(text).strong());

        let filters = state.chart.chart().filter_set().len();
        if filters > 0 {
            ui.label(RichText::new("|").strong());
            ui.label(
                RichText::new(format!("{} active filter{}", filters, if filters == 1 { "" } else { "s" }))
                    .strong()
                    .color(ui.visuals().warn_fg_color),
            );
        }
    });
}
