//! Settings persistence through `eframe::Storage`.
//!
//! Values are stored as JSON strings, so any serde type can be persisted.
//! Unreadable or missing entries fall back to a default instead of failing
//! startup.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Coordinates generic settings persistence.
pub struct SettingsCoordinator;

impl SettingsCoordinator {
    /// Loads `key`, or returns `default` when it is missing or no longer
    /// parses (for example after a settings type changed shape).
    pub fn load_setting_or<T>(storage: Option<&dyn eframe::Storage>, key: &str, default: T) -> T
    where
        T: for<'de> Deserialize<'de>,
    {
        let Some(json_str) = storage.and_then(|s| s.get_string(key)) else {
            return default;
        };
        match serde_json::from_str(&json_str) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "ignoring unreadable setting");
                default
            }
        }
    }

    pub fn save_setting<T>(storage: &mut dyn eframe::Storage, key: &str, value: &T)
    where
        T: Serialize,
    {
        match serde_json::to_string(value) {
            Ok(json_str) => storage.set_string(key, json_str),
            Err(e) => warn!(key, error = %e, "failed to serialize setting"),
        }
    }
}
