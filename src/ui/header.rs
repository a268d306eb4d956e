//! Header panel UI rendering
//!
//! File controls, chart options and the theme selector.

use eframe::egui;
use rhier::{ChildOrdering, LinkShape, Orientation};
use std::path::PathBuf;

use crate::app::AppState;
use crate::domain::ChartKind;

/// Result of user interaction with the header panel
pub enum HeaderInteraction {
    OpenFileRequested(PathBuf),
    OpenVirtualDatasetRequested,
}

fn ordering_name(ordering: ChildOrdering) -> &'static str {
    match ordering {
        ChildOrdering::Key => "By key",
        ChildOrdering::ValueDescending => "Largest first",
        ChildOrdering::ValueAscending => "Smallest first",
    }
}

fn orientation_name(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Horizontal => "Horizontal",
        Orientation::Vertical => "Vertical",
    }
}

/// Renders the header. Chart option changes are written straight into the
/// chart settings; the chart cache notices them on the next frame.
pub fn render_header(ui: &mut egui::Ui, state: &mut AppState) -> Option<HeaderInteraction> {
    let mut interaction = None;

    ui.horizontal(|ui| {
        if ui.button("📁 Open Dataset").clicked() {
            let mut dialog = rfd::FileDialog::new()
                .add_filter("Datasets", &["jsonl", "br"])
                .add_filter("All Files", &["*"]);

            if let Ok(cwd) = std::env::current_dir() {
                dialog = dialog.set_directory(cwd);
            }

            if let Some(path) = dialog.pick_file() {
                interaction = Some(HeaderInteraction::OpenFileRequested(path));
            }
        }

        if ui.button("🔮 Virtual Dataset").clicked() {
            interaction = Some(HeaderInteraction::OpenVirtualDatasetRequested);
        }

        ui.separator();
        render_chart_options(ui, state);

        // Push theme selector to the right
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let old_theme = state.theme.current_theme_name().to_string();
            let mut current_theme = old_theme.clone();
            egui::ComboBox::from_id_salt("theme_selector")
                .selected_text(&current_theme)
                .show_ui(ui, |ui| {
                    for theme_name in state.theme.theme_manager().list_themes() {
                        ui.selectable_value(&mut current_theme, theme_name.to_string(), theme_name);
                    }
                });

            if old_theme != current_theme {
                state.theme.set_theme(current_theme);
                ui.ctx().request_repaint();
            }

            ui.label("Theme:");
        });
    });

    if let Some(err) = &state.error_message {
        ui.colored_label(ui.visuals().error_fg_color, err);
    }

    interaction
}

fn render_chart_options(ui: &mut egui::Ui, state: &mut AppState) {
    let settings = state.chart.settings_mut();
    let old_kind = settings.kind;

    egui::ComboBox::from_id_salt("chart_kind")
        .selected_text(settings.kind.name())
        .show_ui(ui, |ui| {
            for kind in ChartKind::ALL {
                ui.selectable_value(&mut settings.kind, kind, kind.name());
            }
        });

    egui::ComboBox::from_id_salt("child_ordering")
        .selected_text(ordering_name(settings.ordering))
        .show_ui(ui, |ui| {
            for ordering in [ChildOrdering::Key, ChildOrdering::ValueDescending, ChildOrdering::ValueAscending] {
                ui.selectable_value(&mut settings.ordering, ordering, ordering_name(ordering));
            }
        });

    let radial_node_link = settings.kind.is_node_link() && settings.radial;
    if settings.kind.has_orientation() && !radial_node_link {
        egui::ComboBox::from_id_salt("orientation")
            .selected_text(orientation_name(settings.orientation))
            .show_ui(ui, |ui| {
                for orientation in [Orientation::Horizontal, Orientation::Vertical] {
                    ui.selectable_value(&mut settings.orientation, orientation, orientation_name(orientation));
                }
            });
    }

    match settings.kind {
        ChartKind::Sunburst => {
            ui.label("Hole:");
            ui.add(egui::Slider::new(&mut settings.inner_radius_ratio, 0.0..=0.6).fixed_decimals(2));
        }
        ChartKind::Partition | ChartKind::Treemap => {
            ui.label("Padding:");
            ui.add(egui::Slider::new(&mut settings.padding, 0.0..=8.0).step_by(0.5));
        }
        ChartKind::Dendrogram | ChartKind::Tree => {
            ui.checkbox(&mut settings.radial, "Radial");
            egui::ComboBox::from_id_salt("link_shape")
                .selected_text(settings.link_shape.name())
                .show_ui(ui, |ui| {
                    for shape in LinkShape::ALL {
                        ui.selectable_value(&mut settings.link_shape, shape, shape.name());
                    }
                });
        }
    }

    ui.checkbox(&mut settings.show_labels, "Labels");
    ui.checkbox(&mut settings.collapsible, "Collapsible")
        .on_hover_text("Clicks zoom or fold subtrees instead of filtering");

    // A zoom focus or folded set only makes sense for the chart it was made on.
    if settings.kind != old_kind {
        state.chart.chart_mut().reset_view();
    }
}
