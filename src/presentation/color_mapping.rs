//! Color mapping for chart nodes.
//!
//! Every top-level branch gets one palette entry through an
//! `OrdinalColorScale`; its descendants reuse the entry, lightened by depth.
//! Nodes outside the active filters are faded toward the background.

use egui::Color32;
use rhier::{adjust_brightness, fade_toward, Hierarchy, Highlight, OrdinalColorScale, ThemeColors, ThemeManager};

/// Brightening per level below the top-level branch.
const DEPTH_BRIGHTEN: f32 = 0.08;
/// How far deselected nodes move toward the background.
const DESELECTED_FADE: f32 = 0.7;
const EMPTY_FADE: f32 = 0.8;

/// Returns the colors of the named theme, or of the manager's current
/// theme when the name is unknown.
pub fn theme_colors<'a>(theme_manager: &'a ThemeManager, current_theme_name: &str) -> &'a ThemeColors {
    theme_manager
        .get_theme(current_theme_name)
        .map(|t| &t.colors)
        .unwrap_or_else(|| &theme_manager.current_theme().colors)
}

/// Palette slot for every node, indexed like `hierarchy.nodes()`.
///
/// The root takes slot 0 without consuming a label.
pub fn assign_palette_slots(hierarchy: &Hierarchy, scale: &mut OrdinalColorScale) -> Vec<usize> {
    let mut slots = vec![0; hierarchy.len()];
    // Parents precede children, so a child's branch slot is already known.
    for id in hierarchy.descendants(hierarchy.root()) {
        let node = hierarchy.node(id);
        slots[id.0] = match (node.depth, hierarchy.parent(id)) {
            (0, _) | (_, None) => 0,
            (1, _) => scale.index_for(node.key.leaf().unwrap_or_default()),
            (_, Some(parent)) => slots[parent.0],
        };
    }
    slots
}

/// Fill for a node at `depth` in palette slot `slot`.
pub fn node_fill(slot: usize, depth: usize, highlight: Highlight, colors: &ThemeColors) -> Color32 {
    let base = colors
        .palette
        .get(slot % colors.palette.len().max(1))
        .copied()
        .unwrap_or(colors.accent);
    let shaded = adjust_brightness(base, 1.0 + DEPTH_BRIGHTEN * depth.saturating_sub(1) as f32);

    match highlight {
        Highlight::Normal | Highlight::Selected => shaded,
        Highlight::Deselected => fade_toward(shaded, colors.background, DESELECTED_FADE),
    }
}

/// Outline color; selected nodes get the accent color.
pub fn node_stroke(highlight: Highlight, hovered: bool, colors: &ThemeColors) -> egui::Stroke {
    match (highlight, hovered) {
        (_, true) => egui::Stroke::new(2.0, colors.text_strong),
        (Highlight::Selected, false) => egui::Stroke::new(1.5, colors.accent),
        _ => egui::Stroke::new(1.0, colors.border),
    }
}

/// Fill for the lone root of a chart without data.
pub fn empty_fill(colors: &ThemeColors) -> Color32 {
    fade_toward(colors.text_dim, colors.background, EMPTY_FADE)
}

/// Label color readable on `fill`.
pub fn label_color(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhier::{DataRecord, TreeBuilder};

    #[test]
    fn test_deselected_nodes_fade() {
        let manager = ThemeManager::new();
        let colors = theme_colors(&manager, "Light");
        let normal = node_fill(0, 1, Highlight::Normal, colors);
        let faded = node_fill(0, 1, Highlight::Deselected, colors);
        assert_eq!(normal, colors.palette[0]);
        assert_ne!(normal, faded);
        assert_eq!(node_fill(0, 1, Highlight::Selected, colors), normal);
    }

    #[test]
    fn test_unknown_theme_uses_current() {
        let manager = ThemeManager::new();
        let colors = theme_colors(&manager, "Missing");
        assert_eq!(colors.background, manager.current_theme().colors.background);
    }

    #[test]
    fn test_branch_slots() {
        let records = vec![
            DataRecord::new(["US", "East"], 1.0),
            DataRecord::new(["CA"], 1.0),
            DataRecord::new(["MX", "North"], 1.0),
        ];
        let h = TreeBuilder::new(&DataRecord::accessors()).build(&records).unwrap();
        let mut scale = OrdinalColorScale::new(20);
        let slots = assign_palette_slots(&h, &mut scale);

        let slot = |k: &[&str]| slots[h.find(&rhier::PathKey::from(k)).unwrap().0];
        assert_eq!(slot(&["US"]), slot(&["US", "East"]));
        assert_eq!(slot(&["MX"]), slot(&["MX", "North"]));
        assert_ne!(slot(&["US"]), slot(&["CA"]));
        assert_eq!(scale.peek("East"), None);
    }

    #[test]
    fn test_empty_fill_stands_off_background() {
        let manager = ThemeManager::new();
        for name in ["Light", "Dark"] {
            let colors = theme_colors(&manager, name);
            assert_ne!(empty_fill(colors), colors.background);
        }
    }

    #[test]
    fn test_label_color_contrast() {
        assert_eq!(label_color(Color32::WHITE), Color32::BLACK);
        assert_eq!(label_color(Color32::from_rgb(20, 20, 60)), Color32::WHITE);
    }
}
