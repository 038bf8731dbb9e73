//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If multiple
//! RON files are present, the first successfully parsed `Settings` will be used.
//! If no RON files are found or if no parsing succeeds, default settings will be used.
use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use crate::settings::Settings;
use bevy::prelude::{Res, ResMut, Resource, error, info, warn};

/// Directory the game reads its settings from.
pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher {
    pub watcher: crate::ron::RonWatcher,
    pub dir: String,
}

/// Load settings from `path` (directory). If multiple `.ron` files are present
/// the first parsed `Settings` will be used. If none exist the `Default` is used.
///
/// # Example
/// ```ignore
/// let settings = load_settings_from_dir("data/settings");
/// ```
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    if let Some(first) = items.into_iter().next() {
        first
    } else {
        info!("no settings found in '{path}', using defaults");
        Settings::defaults()
    }
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Returns the `notify::Error` raised while creating or registering the watcher.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(|watcher| SettingsWatcher {
        watcher,
        dir: path.to_string(),
    })
}

/// Check for changes and reload the settings resource when files change.
///
/// # Example
/// ```ignore
/// app.add_systems(Update, glider::settings::loader::check_settings_changes);
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if !watcher.watcher.take_changed() {
        return;
    }

    info!("settings changed, reloading from '{}'", watcher.dir);
    *settings = load_settings_from_dir(&watcher.dir);
    log_keybind_problems(&settings);
}

/// Report every unusable key binding as a configuration error.
pub fn log_keybind_problems(settings: &Settings) {
    for problem in settings.keybind_problems() {
        error!("controls: {problem}; falling back to the default key");
    }
}

/// Startup system logging key binding problems once.
#[allow(clippy::needless_pass_by_value)]
pub fn validate_keybinds(settings: Res<Settings>) {
    log_keybind_problems(&settings);
}

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        warn!("settings hot-reload disabled");
        SettingsWatcher {
            watcher: crate::ron::RonWatcher::stub(),
            dir: SETTINGS_DIR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_yields_defaults() {
        let s = load_settings_from_dir("definitely/not/a/settings/dir");
        assert_eq!(s.glide.descending_rate, Settings::defaults().glide.descending_rate);
    }

    #[test]
    fn shipped_settings_parse() {
        let s = load_settings_from_dir(SETTINGS_DIR);
        assert_eq!(s.glide.descending_rate, 300.0);
        assert_eq!(s.glide.glide_tunables, crate::movement::MovementTunables::glide());
        assert_eq!(s.character.tunables, crate::movement::MovementTunables::walking());
        assert!(s.keybind_problems().is_empty());
    }

    #[test]
    fn stub_watcher_never_reports_changes() {
        let w = SettingsWatcher::stub();
        assert!(!w.watcher.take_changed());
    }
}
