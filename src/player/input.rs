//! Keyboard input mapped to character input events.
//!
//! `read_keyboard_input` turns key state into `CharacterInput` events using
//! the bindings from `Settings`; `apply_character_input` consumes them and
//! drives the movement simulation and glide controller. Keeping the two apart
//! means anything (tests, replays, AI) can send the same events.

use crate::glide::GlideController;
use crate::movement::CharacterMovement;
use crate::player::{Player, PlayerLook};
use crate::settings::Settings;
use crate::world::Level;
use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum CharacterInput {
    /// Continuous move axis, sent every frame a move key is held.
    Move(Vec2),
    GlideStarted,
    GlideCompleted,
    JumpStarted,
    JumpCompleted,
}

/// Emit `CharacterInput` events for this frame's keyboard state.
///
/// # Arguments
/// * `kb` - current keyboard state
/// * `settings` - key bindings (`left`, `right`, `jump`, `glide`)
/// * `events` - writer for the produced events
#[allow(clippy::needless_pass_by_value)]
pub fn read_keyboard_input(
    kb: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    mut events: EventWriter<CharacterInput>,
) {
    let left_kc = settings.key_for("left", KeyCode::KeyA);
    let right_kc = settings.key_for("right", KeyCode::KeyD);
    let jump_kc = settings.key_for("jump", KeyCode::Space);
    let glide_kc = settings.key_for("glide", KeyCode::ShiftLeft);

    let mut axis = Vec2::ZERO;
    if kb.pressed(left_kc) {
        axis.x -= 1.0;
    }
    if kb.pressed(right_kc) {
        axis.x += 1.0;
    }
    if axis != Vec2::ZERO {
        events.send(CharacterInput::Move(axis));
    }

    if kb.just_pressed(jump_kc) {
        events.send(CharacterInput::JumpStarted);
    }
    if kb.just_released(jump_kc) {
        events.send(CharacterInput::JumpCompleted);
    }
    if kb.just_pressed(glide_kc) {
        events.send(CharacterInput::GlideStarted);
    }
    if kb.just_released(glide_kc) {
        events.send(CharacterInput::GlideCompleted);
    }
}

/// Right vector of the horizontal look direction.
#[must_use]
pub fn control_right(look: &PlayerLook) -> Vec3 {
    Quat::from_rotation_y(look.yaw) * Vec3::X
}

/// Apply this frame's input events to every player character.
///
/// Only the x component of a move axis is used: it moves the character
/// along the look-yaw right vector.
#[allow(clippy::needless_pass_by_value)]
pub fn apply_character_input(
    mut events: EventReader<CharacterInput>,
    level: Res<Level>,
    mut q: Query<
        (Entity, &Transform, &PlayerLook, &mut CharacterMovement, &mut GlideController),
        With<Player>,
    >,
) {
    let inputs: Vec<CharacterInput> = events.read().copied().collect();
    if inputs.is_empty() {
        return;
    }

    for (entity, tf, look, mut movement, mut glide) in &mut q {
        for input in &inputs {
            match *input {
                CharacterInput::Move(axis) => movement.add_input(control_right(look), axis.x),
                CharacterInput::GlideStarted => {
                    glide.start_gliding(&mut *movement, &*level, tf, Some(entity));
                }
                CharacterInput::GlideCompleted => glide.stop_gliding(&mut *movement),
                CharacterInput::JumpStarted => movement.jump_held = true,
                CharacterInput::JumpCompleted => movement.jump_held = false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::{MovementMode, MovementTunables};

    fn app_with_player(height: f32, mode: MovementMode) -> (App, Entity) {
        let mut app = App::new();
        app.add_event::<CharacterInput>();
        let mut level = Level::new();
        level.add_solid(None, Vec3::new(0.0, -10.0, 0.0), Vec3::new(1000.0, 10.0, 1000.0));
        app.insert_resource(level);
        app.add_systems(Update, apply_character_input);

        let mut bundle = crate::player::PlayerBundle::from_settings(&Settings::defaults());
        bundle.movement.mode = mode;
        let entity = app
            .world_mut()
            .spawn((bundle, Transform::from_xyz(0.0, height, 0.0)))
            .id();
        (app, entity)
    }

    #[test]
    fn glide_events_toggle_glide() {
        let (mut app, player) = app_with_player(500.0, MovementMode::Falling);

        app.world_mut().send_event(CharacterInput::GlideStarted);
        app.update();
        let world = app.world();
        assert!(world.get::<GlideController>(player).expect("glide").is_gliding());
        assert_eq!(
            world.get::<CharacterMovement>(player).expect("movement").tunables,
            MovementTunables::glide()
        );

        app.world_mut().send_event(CharacterInput::GlideCompleted);
        app.update();
        let world = app.world();
        assert!(!world.get::<GlideController>(player).expect("glide").is_gliding());
        assert_eq!(
            world.get::<CharacterMovement>(player).expect("movement").tunables,
            MovementTunables::walking()
        );
    }

    #[test]
    fn glide_refused_on_ground() {
        let (mut app, player) = app_with_player(96.0, MovementMode::Walking);

        app.world_mut().send_event(CharacterInput::GlideStarted);
        app.update();

        assert!(!app.world().get::<GlideController>(player).expect("glide").is_gliding());
    }

    #[test]
    fn move_and_jump_events_reach_movement() {
        let (mut app, player) = app_with_player(96.0, MovementMode::Walking);

        app.world_mut().send_event(CharacterInput::Move(Vec2::new(-1.0, 0.7)));
        app.world_mut().send_event(CharacterInput::JumpStarted);
        app.update();

        let movement = app.world().get::<CharacterMovement>(player).expect("movement");
        assert_eq!(movement.pending_input, Vec3::NEG_X);
        assert!(movement.jump_held);

        app.world_mut().send_event(CharacterInput::JumpCompleted);
        app.update();
        assert!(!app.world().get::<CharacterMovement>(player).expect("movement").jump_held);
    }

    #[test]
    fn control_right_follows_yaw() {
        let look = PlayerLook { yaw: std::f32::consts::FRAC_PI_2, pitch: 0.0 };
        let right = control_right(&look);
        assert!((right - Vec3::NEG_Z).length() < 1e-5);
    }
}
