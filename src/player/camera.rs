//! Third-person camera boom, mouse look and cursor helpers.
//!
//! `camera_look` accumulates mouse motion for the current update into the
//! player's `PlayerLook`. `follow_camera` places every `FollowCamera` on a
//! boom behind its target, pulled in when level geometry blocks the boom.
//! `cursor_grab` toggles cursor lock/visibility in response to input.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::player::Player;
use crate::settings::{CameraSettings, Settings};
use crate::world::{Level, RaycastWorld};

/// Control rotation of a player (yaw and pitch) in radians.
///
/// - `yaw`: horizontal rotation around the Y axis.
/// - `pitch`: vertical rotation around the X axis, clamped to a safe range.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct PlayerLook {
    /// Horizontal angle (radians).
    pub yaw: f32,
    /// Vertical angle (radians).
    pub pitch: f32,
}

impl PlayerLook {
    /// Apply a raw mouse-delta to this `PlayerLook` (updates yaw/pitch and clamps pitch).
    ///
    /// Public so benchmarks/systems can call the same logic.
    pub fn apply_delta(&mut self, delta: Vec2, settings: &Settings) {
        let max_pitch = settings.camera.max_pitch_deg.to_radians();
        let scale = settings.controls.mouse_sensitivity / 10000.0;

        self.yaw -= delta.x * scale;
        self.pitch -= delta.y * scale;
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);
    }

    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(bevy::math::EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// Camera following a target entity on a boom.
#[derive(Component, Debug, Clone, Copy)]
pub struct FollowCamera {
    pub target: Entity,
}

/// Compute where the camera sits for a target at `origin`.
///
/// The boom starts `pivot_height` above the target and extends
/// `boom_length` backwards along the look rotation. When a solid is in the
/// way the camera moves in to `collision_margin` in front of it.
#[must_use]
pub fn boom_position(
    origin: Vec3,
    look: &PlayerLook,
    camera: &CameraSettings,
    world: &impl RaycastWorld,
    ignore: Option<Entity>,
) -> Vec3 {
    let pivot = origin + Vec3::Y * camera.pivot_height;
    let Ok(back) = Dir3::new(look.rotation() * Vec3::Z) else {
        return pivot;
    };

    let length = match world.raycast(pivot, back, camera.boom_length, ignore) {
        Some(hit) => (hit.distance - camera.collision_margin).max(0.0),
        None => camera.boom_length,
    };
    pivot + *back * length
}

/// Apply mouse-look to players with a `PlayerLook` component.
///
/// # Arguments
/// * `windows` - query for the primary window (used to check cursor visibility)
/// * `motion_events` - mouse motion events for this update
/// * `query` - looks to update
#[allow(clippy::needless_pass_by_value)]
pub fn camera_look(
    windows: Query<&Window, With<PrimaryWindow>>,
    motion_events: Res<Events<MouseMotion>>,
    mut query: Query<&mut PlayerLook, With<Player>>,
    settings: Res<Settings>,
) {
    let mut delta = Vec2::ZERO;
    for ev in motion_events.iter_current_update_events() {
        let mut axis = ev.delta;
        if settings.controls.invert_x { axis.x = -axis.x; }
        if settings.controls.invert_y { axis.y = -axis.y; }
        delta += axis;
    }

    if delta == Vec2::ZERO {
        return;
    }

    let Ok(window) = windows.get_single() else { return };

    if window.cursor.visible {
        return;
    }

    for mut look in &mut query {
        look.apply_delta(delta, &settings);
    }
}

/// Move each `FollowCamera` onto its target's boom and face the pivot.
#[allow(clippy::needless_pass_by_value)]
pub fn follow_camera(
    settings: Res<Settings>,
    level: Res<Level>,
    targets: Query<(&Transform, &PlayerLook), (With<Player>, Without<FollowCamera>)>,
    mut cameras: Query<(&mut Transform, &FollowCamera)>,
) {
    for (mut cam_tf, follow) in &mut cameras {
        let Ok((target_tf, look)) = targets.get(follow.target) else {
            continue;
        };
        cam_tf.translation = boom_position(
            target_tf.translation,
            look,
            &settings.camera,
            &*level,
            Some(follow.target),
        );
        cam_tf.rotation = look.rotation();
    }
}

/// Toggle cursor grab and visibility.
///
/// # Arguments
/// * `wq` - mutable window query to change cursor state
/// * `mb` - mouse button input to detect left-click for grabbing
/// * `kb` - keyboard input to detect the pause key to release the cursor
#[allow(clippy::needless_pass_by_value)]
pub fn cursor_grab(
    mut wq: Query<&mut Window, With<PrimaryWindow>>,
    mb: Res<ButtonInput<MouseButton>>,
    kb: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    let Ok(mut w) = wq.get_single_mut() else { return };
    if mb.just_pressed(MouseButton::Left) {
        w.cursor.grab_mode = CursorGrabMode::Locked;
        w.cursor.visible = false;
    }

    if kb.just_pressed(settings.key_for("pause", KeyCode::Escape)) {
        w.cursor.grab_mode = CursorGrabMode::None;
        w.cursor.visible = true;
    }
}
