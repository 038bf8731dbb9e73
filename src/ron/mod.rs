//! Utilities for loading RON files and watching directories for changes.
//!
//! This module provides a small helper for reading RON files from disk
//! and a simple filesystem watcher resource that sets a shared boolean when
//! files change. The watcher is used for hot-reloading the RON settings
//! during development.

use bevy::prelude::{Resource, error, warn};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Resource)]
/// File-watcher resource for RON hot-reload.
pub struct RonWatcher {
    pub changed: Arc<Mutex<bool>>, // Shared boolean set to `true` when watched files change.
    _watcher: Option<notify::RecommendedWatcher>, // watcher handle kept to prevent immediate drop.
}

impl RonWatcher {
    /// Create a stub `RonWatcher` that does not have an active OS watcher.
    ///
    /// Useful as a fallback when watcher creation fails or when running on
    /// platforms without notify support.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher {
            changed: Arc::new(Mutex::new(false)),
            _watcher: None,
        }
    }

    /// Return whether files changed since the last call and clear the flag.
    ///
    /// A poisoned flag is recovered rather than propagated; the watcher thread
    /// only ever writes a bool into it.
    pub fn take_changed(&self) -> bool {
        let mut flag = self.changed.lock().unwrap_or_else(|poisoned| {
            warn!("ron watcher mutex poisoned, recovering");
            poisoned.into_inner()
        });
        std::mem::take(&mut *flag)
    }
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// Files are visited in name order so "first file wins" callers are
/// deterministic.
///
/// # Return
/// A `Vec<T>` containing all successfully deserialized items found in
/// the directory. Files that fail to parse are skipped and logged.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &str) -> Vec<T> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    paths.sort();

    let mut items = Vec::new();
    for p in paths {
        let content = match std::fs::read_to_string(&p) {
            Ok(content) => content,
            Err(e) => {
                error!("failed to read {}: {e}", p.display());
                continue;
            }
        };
        match ron::from_str::<T>(&content) {
            Ok(item) => items.push(item),
            Err(e) => error!("failed to parse {}: {e}", p.display()),
        }
    }

    items
}

/// Create a `RonWatcher` that watches a directory for modifications.
///
/// The returned watcher's `changed` flag is set to `true` when a modify event
/// for a file under the watched directory is observed.
///
/// # Errors
/// Returns a `notify::Error` if the underlying file-watcher cannot be
/// created or the watcher cannot be registered for the provided path.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, notify::Error> {
    let changed = Arc::new(Mutex::new(false));
    let changed_clone = changed.clone();
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    std::fs::canonicalize(p)
                        .unwrap_or_else(|_| p.clone())
                        .starts_with(&watched_path)
                });
                if relevant {
                    *changed_clone.lock().unwrap_or_else(PoisonError::into_inner) = true;
                }
            }
            Err(e) => error!("watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}
