use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use glider::debug::DebugDumpPlugin;
use glider::movement::{character_movement, sync_character_settings};
use glider::player::{
    CharacterInput, apply_character_input, camera_look, cursor_grab, descend_gliders,
    follow_camera, read_keyboard_input, sync_glide_settings,
};
use glider::settings::loader as settings_loader;
use glider::world::Level;

mod app;
use app::setup;

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "glider".into(),
                position: WindowPosition::Centered(MonitorSelection::Primary),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(LogDiagnosticsPlugin::default())
        .add_plugins(DebugDumpPlugin);

    app.insert_resource(settings);
    app.insert_resource(settings_watcher);
    app.insert_resource(Level::new());
    app.add_event::<CharacterInput>();

    app.add_systems(Startup, (setup, settings_loader::validate_keybinds));

    // Input is applied before the glide tick, which runs before movement
    // integrates the pinned velocity; the camera follows the result.
    app.add_systems(
        Update,
        (
            settings_loader::check_settings_changes,
            sync_character_settings,
            sync_glide_settings,
            camera_look,
            read_keyboard_input,
            apply_character_input,
            descend_gliders,
            character_movement,
            follow_camera,
        )
            .chain(),
    );
    app.add_systems(Update, cursor_grab);

    app.run();
}
