//! Themes and chart colors for the hierarchy viewer.
//!
//! Each theme carries the panel colors applied to egui plus the categorical
//! palette used to fill chart nodes. `OrdinalColorScale` hands out palette
//! entries to node labels in order of first use.
//!
//! # Examples
//!
//! ```
//! use rhier::theme::{OrdinalColorScale, ThemeManager, CATEGORY20C};
//!
//! let manager = ThemeManager::new();
//! let light = manager.get_theme("Light").unwrap();
//! assert_eq!(light.colors.palette.len(), CATEGORY20C.len());
//!
//! let mut scale = OrdinalColorScale::new(light.colors.palette.len());
//! assert_eq!(scale.index_for("US"), 0);
//! assert_eq!(scale.index_for("CA"), 1);
//! assert_eq!(scale.index_for("US"), 0);
//! ```

use egui::Color32;
use std::collections::HashMap;

/// The category20c palette: five hues in four shades each.
pub const CATEGORY20C: [&str; 20] = [
    "#3182bd", "#6baed6", "#9ecae1", "#c6dbef",
    "#e6550d", "#fd8d3c", "#fdae6b", "#fdd0a2",
    "#31a354", "#74c476", "#a1d99b", "#c7e9c0",
    "#756bb1", "#9e9ac8", "#bcbddc", "#dadaeb",
    "#636363", "#969696", "#bdbdbd", "#d9d9d9",
];

#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Background colors
    pub background: Color32,
    pub panel_background: Color32,
    pub extreme_background: Color32,

    // Foreground colors
    pub text: Color32,
    pub text_dim: Color32,
    pub text_strong: Color32,

    // Interactive colors
    pub selection: Color32,
    pub hover: Color32,
    pub border: Color32,

    // Chart colors
    pub link: Color32,
    pub accent: Color32,
    pub error: Color32,
    pub warn: Color32,
    /// Node fills, assigned by `OrdinalColorScale`.
    pub palette: Vec<Color32>,
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub description: String,
    pub colors: ThemeColors,
}

/// Built-in themes plus the current selection.
pub struct ThemeManager {
    themes: HashMap<String, Theme>,
    current_theme_name: String,
}

impl ThemeManager {
    pub fn new() -> Self {
        let mut themes = HashMap::new();

        themes.insert("Light".to_string(), light_theme());
        themes.insert("Dark".to_string(), dark_theme());
        themes.insert("Dracula".to_string(), dracula_theme());
        themes.insert("Solarized".to_string(), solarized_theme());

        Self {
            themes,
            current_theme_name: "Light".to_string(),
        }
    }

    pub fn get_theme(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }

    /// Theme names, sorted.
    pub fn list_themes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    pub fn current_theme_name(&self) -> &str {
        &self.current_theme_name
    }

    /// The selected theme; falls back to "Light" if the name is unknown.
    pub fn current_theme(&self) -> &Theme {
        self.themes
            .get(&self.current_theme_name)
            .or_else(|| self.themes.get("Light"))
            .unwrap_or_else(|| unreachable!("built-in themes are always present"))
    }

    pub fn set_current_theme(&mut self, name: &str) -> Result<(), String> {
        if self.themes.contains_key(name) {
            self.current_theme_name = name.to_string();
            Ok(())
        } else {
            Err(format!("Theme '{}' not found", name))
        }
    }

    /// Copies a theme's colors into egui visuals.
    pub fn apply_theme(&self, theme: &Theme, visuals: &mut egui::Visuals) {
        let colors = &theme.colors;

        visuals.panel_fill = colors.panel_background;
        visuals.extreme_bg_color = colors.extreme_background;
        visuals.faint_bg_color = colors.hover;
        visuals.override_text_color = Some(colors.text);

        visuals.selection.bg_fill = colors.selection;
        visuals.selection.stroke.color = colors.accent;

        visuals.widgets.noninteractive.bg_fill = colors.panel_background;
        visuals.widgets.inactive.bg_fill = colors.hover;
        visuals.widgets.hovered.bg_fill = colors.hover;
        visuals.widgets.active.bg_fill = colors.selection;

        visuals.hyperlink_color = colors.accent;
        visuals.error_fg_color = colors.error;
        visuals.warn_fg_color = colors.warn;
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Assigns palette slots to labels in order of first request, wrapping
/// around when the palette runs out.
#[derive(Debug, Clone, Default)]
pub struct OrdinalColorScale {
    size: usize,
    assigned: HashMap<String, usize>,
}

impl OrdinalColorScale {
    pub fn new(size: usize) -> Self {
        OrdinalColorScale {
            size: size.max(1),
            assigned: HashMap::new(),
        }
    }

    pub fn index_for(&mut self, label: &str) -> usize {
        if let Some(&index) = self.assigned.get(label) {
            return index;
        }
        let index = self.assigned.len() % self.size;
        self.assigned.insert(label.to_string(), index);
        index
    }

    /// Index already handed to `label`, without assigning one.
    pub fn peek(&self, label: &str) -> Option<usize> {
        self.assigned.get(label).copied()
    }

    pub fn color_for(&mut self, label: &str, palette: &[Color32]) -> Color32 {
        let index = self.index_for(label);
        palette.get(index % palette.len().max(1)).copied().unwrap_or(Color32::GRAY)
    }

    pub fn reset(&mut self) {
        self.assigned.clear();
    }
}

fn category20c() -> Vec<Color32> {
    CATEGORY20C.iter().map(|hex| hex_to_color32(hex)).collect()
}

fn light_theme() -> Theme {
    Theme {
        name: "Light".to_string(),
        description: "Light panels with the category20c palette".to_string(),
        colors: ThemeColors {
            background: Color32::from_rgb(248, 248, 248),
            panel_background: Color32::from_rgb(248, 248, 248),
            extreme_background: Color32::from_rgb(255, 255, 255),

            text: Color32::from_rgb(0, 0, 0),
            text_dim: Color32::from_rgb(120, 120, 120),
            text_strong: Color32::from_rgb(0, 0, 0),

            selection: Color32::from_rgb(180, 200, 255),
            hover: Color32::from_rgb(220, 220, 220),
            border: Color32::from_rgb(255, 255, 255),

            link: Color32::from_rgb(150, 150, 150),
            accent: Color32::from_rgb(40, 100, 200),
            error: Color32::from_rgb(200, 40, 40),
            warn: Color32::from_rgb(230, 120, 20),
            palette: category20c(),
        },
    }
}

fn dark_theme() -> Theme {
    Theme {
        name: "Dark".to_string(),
        description: "Dark panels with the category20c palette".to_string(),
        colors: ThemeColors {
            background: Color32::from_rgb(39, 39, 39),
            panel_background: Color32::from_rgb(39, 39, 39),
            extreme_background: Color32::from_rgb(16, 16, 16),

            text: Color32::from_rgb(255, 255, 255),
            text_dim: Color32::from_rgb(160, 160, 160),
            text_strong: Color32::from_rgb(255, 255, 255),

            selection: Color32::from_rgb(50, 80, 120),
            hover: Color32::from_rgb(70, 70, 70),
            border: Color32::from_rgb(16, 16, 16),

            link: Color32::from_rgb(120, 120, 120),
            accent: Color32::from_rgb(52, 152, 219),
            error: Color32::from_rgb(231, 76, 60),
            warn: Color32::from_rgb(243, 156, 18),
            palette: category20c(),
        },
    }
}

fn dracula_theme() -> Theme {
    Theme {
        name: "Dracula".to_string(),
        description: "Dracula panels and accent colors".to_string(),
        colors: ThemeColors {
            background: hex_to_color32("#282a36"),
            panel_background: hex_to_color32("#282a36"),
            extreme_background: hex_to_color32("#21222c"),

            text: hex_to_color32("#f8f8f2"),
            text_dim: hex_to_color32("#6272a4"),
            text_strong: hex_to_color32("#f8f8f2"),

            selection: hex_to_color32("#44475a"),
            hover: hex_to_color32("#44475a"),
            border: hex_to_color32("#21222c"),

            link: hex_to_color32("#6272a4"),
            accent: hex_to_color32("#bd93f9"),
            error: hex_to_color32("#ff5555"),
            warn: hex_to_color32("#ffb86c"),
            palette: ["#bd93f9", "#ff79c6", "#8be9fd", "#50fa7b", "#ffb86c", "#f1fa8c", "#ff5555"]
                .iter()
                .map(|hex| hex_to_color32(hex))
                .collect(),
        },
    }
}

fn solarized_theme() -> Theme {
    Theme {
        name: "Solarized".to_string(),
        description: "Solarized dark panels and accent colors".to_string(),
        colors: ThemeColors {
            background: hex_to_color32("#002b36"),
            panel_background: hex_to_color32("#002b36"),
            extreme_background: hex_to_color32("#073642"),

            text: hex_to_color32("#93a1a1"),
            text_dim: hex_to_color32("#586e75"),
            text_strong: hex_to_color32("#eee8d5"),

            selection: hex_to_color32("#073642"),
            hover: hex_to_color32("#073642"),
            border: hex_to_color32("#002b36"),

            link: hex_to_color32("#586e75"),
            accent: hex_to_color32("#268bd2"),
            error: hex_to_color32("#dc322f"),
            warn: hex_to_color32("#cb4b16"),
            palette: ["#268bd2", "#2aa198", "#859900", "#b58900", "#cb4b16", "#dc322f", "#d33682", "#6c71c4"]
                .iter()
                .map(|hex| hex_to_color32(hex))
                .collect(),
        },
    }
}

/// Converts a hex color string (like "#282a36") to Color32
pub fn hex_to_color32(hex: &str) -> Color32 {
    let hex = hex.trim_start_matches('#');

    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
        Color32::from_rgb(r, g, b)
    } else {
        Color32::from_rgb(0, 0, 0)
    }
}

/// Scales each channel by `factor` (>1.0 brighter, <1.0 darker).
pub fn adjust_brightness(color: Color32, factor: f32) -> Color32 {
    let r = (color.r() as f32 * factor).min(255.0) as u8;
    let g = (color.g() as f32 * factor).min(255.0) as u8;
    let b = (color.b() as f32 * factor).min(255.0) as u8;
    Color32::from_rgb(r, g, b)
}

/// Blends `color` toward `background`; `amount` 1.0 gives `background`.
pub fn fade_toward(color: Color32, background: Color32, amount: f32) -> Color32 {
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(
        mix(color.r(), background.r()),
        mix(color.g(), background.g()),
        mix(color.b(), background.b()),
    )
}
