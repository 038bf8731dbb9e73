//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! using the RON watcher utilities (see `ron::setup_ron_watcher`).
use crate::movement::MovementTunables;
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Actions that must resolve to a key for the character to be playable.
pub const REQUIRED_ACTIONS: [&str; 4] = ["left", "right", "jump", "glide"];

/// Glide tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlideSettings {
    #[serde(default = "GlideSettings::default_descending_rate")]
    pub descending_rate: f32, // Terminal downward speed while gliding (units/s, positive).
    #[serde(default = "GlideSettings::default_minimum_height")]
    pub minimum_height: f32, // Clear space required below the character to start a glide.
    #[serde(default = "MovementTunables::glide")]
    pub glide_tunables: MovementTunables, // Movement parameters swapped in for the duration of a glide.
}

impl GlideSettings {
    fn default_descending_rate() -> f32 { 300.0 }
    fn default_minimum_height() -> f32 { 50.0 }
}

impl Default for GlideSettings {
    fn default() -> Self {
        Self {
            descending_rate: Self::default_descending_rate(),
            minimum_height: Self::default_minimum_height(),
            glide_tunables: MovementTunables::glide(),
        }
    }
}

/// On-foot character tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSettings {
    #[serde(default = "CharacterSettings::default_capsule_radius")]
    pub capsule_radius: f32, // Radius of the character capsule.
    #[serde(default = "CharacterSettings::default_capsule_half_height")]
    pub capsule_half_height: f32, // Distance from the capsule center to the feet.
    #[serde(default = "CharacterSettings::default_jump_z_velocity")]
    pub jump_z_velocity: f32, // Upward speed applied on jump.
    #[serde(default = "CharacterSettings::default_braking_deceleration_walking")]
    pub braking_deceleration_walking: f32, // Deceleration on ground with no input.
    #[serde(default = "CharacterSettings::default_rotation_rate")]
    pub rotation_rate: f32, // Degrees per second the character turns toward its movement.
    #[serde(default = "CharacterSettings::default_gravity")]
    pub gravity: f32, // World gravity magnitude, scaled by `gravity_scale`.
    #[serde(default = "CharacterSettings::default_spawn")]
    pub spawn: (f32, f32, f32), // Spawn position of the character.
    #[serde(default = "MovementTunables::walking")]
    pub tunables: MovementTunables, // Base movement parameters restored after a glide.
}

impl CharacterSettings {
    fn default_capsule_radius() -> f32 { 42.0 }
    fn default_capsule_half_height() -> f32 { 96.0 }
    fn default_jump_z_velocity() -> f32 { 700.0 }
    fn default_braking_deceleration_walking() -> f32 { 2000.0 }
    fn default_rotation_rate() -> f32 { 500.0 }
    fn default_gravity() -> f32 { 980.0 }
    fn default_spawn() -> (f32, f32, f32) { (0.0, 1200.0, 0.0) }
}

impl Default for CharacterSettings {
    fn default() -> Self {
        Self {
            capsule_radius: Self::default_capsule_radius(),
            capsule_half_height: Self::default_capsule_half_height(),
            jump_z_velocity: Self::default_jump_z_velocity(),
            braking_deceleration_walking: Self::default_braking_deceleration_walking(),
            rotation_rate: Self::default_rotation_rate(),
            gravity: Self::default_gravity(),
            spawn: Self::default_spawn(),
            tunables: MovementTunables::walking(),
        }
    }
}

/// Third-person camera boom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default = "CameraSettings::default_boom_length")]
    pub boom_length: f32, // Distance the camera follows behind the character.
    #[serde(default = "CameraSettings::default_pivot_height")]
    pub pivot_height: f32, // Height above the character origin the boom rotates around.
    #[serde(default = "CameraSettings::default_max_pitch_deg")]
    pub max_pitch_deg: f32, // Look pitch clamp in degrees.
    #[serde(default = "CameraSettings::default_collision_margin")]
    pub collision_margin: f32, // Gap kept between the camera and a solid blocking the boom.
}

impl CameraSettings {
    fn default_boom_length() -> f32 { 400.0 }
    fn default_pivot_height() -> f32 { 60.0 }
    fn default_max_pitch_deg() -> f32 { 85.0 }
    fn default_collision_margin() -> f32 { 12.0 }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            boom_length: Self::default_boom_length(),
            pivot_height: Self::default_pivot_height(),
            max_pitch_deg: Self::default_max_pitch_deg(),
            collision_margin: Self::default_collision_margin(),
        }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default)]
    pub invert_y: bool, // Invert mouse Y axis
    #[serde(default)]
    pub invert_x: bool, // Invert mouse X axis
    #[serde(default = "ControlsSettings::default_sensitivity")]
    pub mouse_sensitivity: f32, // Mouse sensitivity multiplier
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers (editable by user)
}

impl ControlsSettings {
    fn default_sensitivity() -> f32 { 1.0 }

    fn default_keybinds() -> HashMap<String, String> {
        [
            ("left", "A"),
            ("right", "D"),
            ("jump", "Space"),
            ("glide", "LShift"),
            ("pause", "Escape"),
            ("toggle_probe", "F2"),
            ("dump_debug", "F3"),
        ]
        .into_iter()
        .map(|(action, key)| (action.to_string(), key.to_string()))
        .collect()
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            invert_y: false,
            invert_x: false,
            mouse_sensitivity: Self::default_sensitivity(),
            keybinds: Self::default_keybinds(),
        }
    }
}

/// Diagnostics toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugSettings {
    #[serde(default = "DebugSettings::default_draw_probe")]
    pub draw_probe: bool, // Draw the ground clearance probe as a gizmo line.
    #[serde(default = "DebugSettings::default_dump_dir")]
    pub dump_dir: String, // Directory the debug dump key writes into.
}

impl DebugSettings {
    fn default_draw_probe() -> bool { true }
    fn default_dump_dir() -> String { "debug-dumps".to_string() }
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            draw_probe: Self::default_draw_probe(),
            dump_dir: Self::default_dump_dir(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub glide: GlideSettings,
    #[serde(default)]
    pub character: CharacterSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub debug: DebugSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Resolve the key bound to `action`, falling back to `default` when the
    /// binding is missing or does not name a known key.
    #[must_use]
    pub fn key_for(&self, action: &str, default: KeyCode) -> KeyCode {
        self.controls
            .keybinds
            .get(action)
            .and_then(|s| Settings::keycode_from_str(s))
            .unwrap_or(default)
    }

    /// Check that every action in `REQUIRED_ACTIONS` has a usable binding.
    ///
    /// # Return
    /// One human-readable message per missing or unparsable binding; empty when
    /// the controls are fully configured.
    #[must_use]
    pub fn keybind_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for action in REQUIRED_ACTIONS {
            match self.controls.keybinds.get(action) {
                None => problems.push(format!("no key bound to '{action}'")),
                Some(key) if Settings::keycode_from_str(key).is_none() => {
                    problems.push(format!("unknown key '{key}' bound to '{action}'"));
                }
                Some(_) => {}
            }
        }
        problems
    }

    /// Add descriptions to each setting field so users understand
    /// what each setting does and gets an idea of what to expect when changing the setting.
    ///
    /// # Return
    /// A nested `HashMap` where the first level keys are section names (e.g. "glide")
    /// and the second level maps setting field names to their descriptions.
    #[must_use]
    pub fn field_descriptions() -> HashMap<&'static str, HashMap<&'static str, &'static str>> {
        let section = |fields: &[(&'static str, &'static str)]| -> HashMap<&'static str, &'static str> {
            fields.iter().copied().collect()
        };

        let mut out = HashMap::new();
        out.insert("glide", section(&[
            ("descending_rate", "Terminal downward speed while gliding (units per second)."),
            ("minimum_height", "Clear space required below the character before a glide may start."),
            ("glide_tunables", "Gravity scale, max walk speed, falling deceleration, max acceleration and air control used while gliding."),
        ]));
        out.insert("character", section(&[
            ("capsule_radius", "Radius of the character capsule."),
            ("capsule_half_height", "Distance from the capsule center down to the feet."),
            ("jump_z_velocity", "Upward speed applied when jumping."),
            ("braking_deceleration_walking", "Deceleration on the ground when there is no movement input."),
            ("rotation_rate", "Degrees per second the character turns toward its movement direction."),
            ("gravity", "World gravity magnitude before gravity_scale is applied."),
            ("spawn", "Position the character spawns at."),
            ("tunables", "Base movement parameters, restored when a glide ends."),
        ]));
        out.insert("camera", section(&[
            ("boom_length", "Distance the camera follows behind the character."),
            ("pivot_height", "Height above the character origin the camera orbits around."),
            ("max_pitch_deg", "Maximum look pitch up or down, in degrees."),
            ("collision_margin", "Gap kept between the camera and level geometry blocking the boom."),
        ]));
        out.insert("controls", section(&[
            ("invert_y", "Invert the vertical look/mouse Y axis."),
            ("invert_x", "Invert the horizontal look/mouse X axis."),
            ("mouse_sensitivity", "Mouse look sensitivity multiplier."),
            ("keybinds", "Map of action names to key identifiers (editable by user)."),
        ]));
        out.insert("debug", section(&[
            ("draw_probe", "Draw the ground clearance probe line (blue = blocked, red = clear)."),
            ("dump_dir", "Directory debug dumps are written to."),
        ]));
        out
    }

    /// Convert a string key identifier (e.g., from `controls.keybinds`) into a `KeyCode` that
    /// can be used with Bevy's input system.
    ///
    /// # Arguments
    /// * `name` - The string key identifier to convert (e.g., "W", "Space", "F1").
    ///
    /// # Returns
    /// The matching `KeyCode`, or `None` if the string does not name a known key.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
            KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
            KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
            KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
            KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
            KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
        ];
        const FUNCTION: [KeyCode; 12] = [
            KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
            KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
        ];

        let s = name.trim().to_ascii_uppercase();
        let bytes = s.as_bytes();

        if let [c] = *bytes {
            return match c {
                b'A'..=b'Z' => Some(LETTERS[usize::from(c - b'A')]),
                b'0'..=b'9' => Some(DIGITS[usize::from(c - b'0')]),
                _ => None,
            };
        }

        if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
            return n.checked_sub(1).and_then(|i| FUNCTION.get(i)).copied();
        }

        Some(match s.as_str() {
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "BACKSPACE" => KeyCode::Backspace,
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,
            "CAPSLOCK" => KeyCode::CapsLock,
            _ => return None,
        })
    }
}

pub mod loader;
