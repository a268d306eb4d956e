//! Theme and styling state management.
//!
//! This module encapsulates all state related to visual theming,
//! including theme manager and currently selected theme.

use rhier::ThemeManager;

/// State related to visual theme and styling.
pub struct ThemeState {
    /// Theme manager instance
    theme_manager: ThemeManager,
    /// Name of currently selected theme
    current_theme_name: String,
}

impl std::fmt::Debug for ThemeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeState")
            .field("current_theme_name", &self.current_theme_name)
            .finish_non_exhaustive()
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeState {
    pub fn new() -> Self {
        Self::with_theme("Light".to_string())
    }

    /// Unknown names fall back to the manager's default theme.
    pub fn with_theme(theme_name: String) -> Self {
        let mut theme_manager = ThemeManager::new();
        let current_theme_name = match theme_manager.set_current_theme(&theme_name) {
            Ok(()) => theme_name,
            Err(_) => theme_manager.current_theme_name().to_string(),
        };
        Self {
            theme_manager,
            current_theme_name,
        }
    }

    // ===== Theme Queries =====

    pub fn theme_manager(&self) -> &ThemeManager {
        &self.theme_manager
    }

    pub fn current_theme_name(&self) -> &str {
        &self.current_theme_name
    }

    // ===== Theme Mutations =====

    pub fn set_theme(&mut self, theme_name: String) {
        if self.theme_manager.set_current_theme(&theme_name).is_ok() {
            self.current_theme_name = theme_name;
        }
    }
}
