//! Label measurement and truncation.

use eframe::egui;

const ELLIPSIS: &str = "…";

/// Width of `text` in `font_id`.
pub fn text_width(text: &str, font_id: &egui::FontId, painter: &egui::Painter) -> f32 {
    painter
        .layout_no_wrap(text.to_string(), font_id.clone(), egui::Color32::WHITE)
        .size()
        .x
}

/// Shortens `text` with a trailing ellipsis until it fits `max_width`.
///
/// Returns `None` when not even the first character plus the ellipsis
/// fits, so callers can skip the label entirely.
pub fn fit_label(text: &str, max_width: f32, font_id: &egui::FontId, painter: &egui::Painter) -> Option<String> {
    if max_width <= 0.0 || text.is_empty() {
        return None;
    }
    if text_width(text, font_id, painter) <= max_width {
        return Some(text.to_string());
    }

    // Largest prefix length whose ellipsized form fits.
    let chars: Vec<char> = text.chars().collect();
    let (mut low, mut high) = (1usize, chars.len());
    let mut best = None;
    while low <= high {
        let mid = (low + high) / 2;
        let candidate: String = chars[..mid].iter().collect::<String>() + ELLIPSIS;
        if text_width(&candidate, font_id, painter) <= max_width {
            best = Some(candidate);
            low = mid + 1;
        } else {
            high = mid - 1;
        }
    }
    best
}
