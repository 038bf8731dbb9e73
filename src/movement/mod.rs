//! Character movement simulation: gravity, planar acceleration, braking,
//! jumping and ground detection.
//!
//! `CharacterMovement` is a deliberately small stand-in for a full engine
//! movement component. Other systems only reach it through the
//! `MovementSimulation` trait (airborne flag, five tunables, raw velocity),
//! which is also what the glide controller is written against.
//! Register `character_movement` as a system to step it each frame.

use crate::player::Player;
use crate::settings::{CharacterSettings, Settings};
use crate::world::{Level, RaycastWorld};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Extra distance below the capsule checked for ground so resting
/// characters do not flicker between walking and falling.
const GROUND_SKIN: f32 = 2.0;

/// The five movement parameters the glide mode swaps out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementTunables {
    pub gravity_scale: f32,
    pub max_walk_speed: f32,
    pub braking_deceleration_falling: f32,
    pub max_acceleration: f32,
    pub air_control: f32,
}

impl MovementTunables {
    /// Values used while gliding.
    #[must_use]
    pub fn glide() -> Self {
        Self {
            gravity_scale: 0.0,
            max_walk_speed: 600.0,
            braking_deceleration_falling: 350.0,
            max_acceleration: 1024.0,
            air_control: 0.9,
        }
    }

    /// Values for a normal on-foot character.
    #[must_use]
    pub fn walking() -> Self {
        Self {
            gravity_scale: 1.0,
            max_walk_speed: 500.0,
            braking_deceleration_falling: 1500.0,
            max_acceleration: 2048.0,
            air_control: 0.35,
        }
    }
}

/// What a movement simulation exposes to gameplay code.
pub trait MovementSimulation {
    /// `true` only while falling (not walking on ground).
    fn is_airborne(&self) -> bool;
    fn tunables(&self) -> MovementTunables;
    fn set_tunables(&mut self, tunables: MovementTunables);
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementMode {
    Walking,
    #[default]
    Falling,
}

/// Per-character movement state.
#[derive(Component, Debug, Clone)]
pub struct CharacterMovement {
    /// Current velocity in world units per second.
    pub velocity: Vec3,
    pub mode: MovementMode,
    pub tunables: MovementTunables,
    pub jump_z_velocity: f32,
    pub braking_deceleration_walking: f32,
    /// Degrees per second the character turns to face its movement.
    pub rotation_rate: f32,
    /// Magnitude of world gravity (applied downwards, scaled by `gravity_scale`).
    pub gravity: f32,
    /// Half height of the capsule, the distance from origin to feet.
    pub half_height: f32,
    /// Accumulated movement input for this frame, consumed by `step`.
    pub pending_input: Vec3,
    pub jump_held: bool,
}

impl CharacterMovement {
    #[must_use]
    pub fn from_settings(character: &CharacterSettings) -> Self {
        Self {
            velocity: Vec3::ZERO,
            mode: MovementMode::Falling,
            tunables: character.tunables,
            jump_z_velocity: character.jump_z_velocity,
            braking_deceleration_walking: character.braking_deceleration_walking,
            rotation_rate: character.rotation_rate,
            gravity: character.gravity,
            half_height: character.capsule_half_height,
            pending_input: Vec3::ZERO,
            jump_held: false,
        }
    }

    /// Queue planar movement along `direction`, scaled by `scale`.
    pub fn add_input(&mut self, direction: Vec3, scale: f32) {
        self.pending_input += direction * scale;
    }

    /// Refresh the non-glide parameters from reloaded settings.
    pub fn apply_character_settings(&mut self, character: &CharacterSettings) {
        self.jump_z_velocity = character.jump_z_velocity;
        self.braking_deceleration_walking = character.braking_deceleration_walking;
        self.rotation_rate = character.rotation_rate;
        self.gravity = character.gravity;
        self.half_height = character.capsule_half_height;
    }

    /// Step the movement simulation for one frame.
    ///
    /// Extracted helper so systems and benchmarks exercise identical logic.
    ///
    /// # Arguments
    /// * `tf` - character transform, translated and rotated in place
    /// * `world` - ray queries used for ground detection
    /// * `ignore` - the character's own entity, skipped by ground rays
    /// * `dt` - frame delta in seconds
    pub fn step(&mut self, tf: &mut Transform, world: &impl RaycastWorld, ignore: Option<Entity>, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        if self.jump_held && self.mode == MovementMode::Walking {
            self.velocity.y = self.jump_z_velocity;
            self.mode = MovementMode::Falling;
            self.jump_held = false;
        }

        let input = Vec3::new(self.pending_input.x, 0.0, self.pending_input.z).clamp_length_max(1.0);
        self.pending_input = Vec3::ZERO;

        self.step_planar(input, dt);

        if self.mode == MovementMode::Falling {
            self.velocity.y -= self.gravity * self.tunables.gravity_scale * dt;
        }

        self.orient_to_movement(tf, input, dt);

        let new_pos = tf.translation + self.velocity * dt;
        let fall = (-self.velocity.y * dt).max(0.0);
        let probe_len = self.half_height + fall + GROUND_SKIN;

        let ground = if self.velocity.y <= 0.0 {
            world.raycast(tf.translation, Dir3::NEG_Y, probe_len, ignore)
        } else {
            None
        };

        match ground {
            Some(hit) => {
                tf.translation = Vec3::new(new_pos.x, hit.point.y + self.half_height, new_pos.z);
                self.velocity.y = 0.0;
                self.mode = MovementMode::Walking;
            }
            None => {
                tf.translation = new_pos;
                self.mode = MovementMode::Falling;
            }
        }
    }

    fn step_planar(&mut self, input: Vec3, dt: f32) {
        let mut planar = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        let t = &self.tunables;

        if input.length_squared() > 1e-6 {
            let control = match self.mode {
                MovementMode::Walking => 1.0,
                MovementMode::Falling => t.air_control,
            };
            planar += input * t.max_acceleration * control * dt;
            planar = planar.clamp_length_max(t.max_walk_speed);
        } else {
            let braking = match self.mode {
                MovementMode::Walking => self.braking_deceleration_walking,
                MovementMode::Falling => t.braking_deceleration_falling,
            };
            let speed = planar.length();
            let reduced = (speed - braking * dt).max(0.0);
            planar = if speed > 0.0 { planar * (reduced / speed) } else { Vec3::ZERO };
        }

        self.velocity.x = planar.x;
        self.velocity.z = planar.z;
    }

    fn orient_to_movement(&self, tf: &mut Transform, input: Vec3, dt: f32) {
        if input.length_squared() <= 1e-6 {
            return;
        }
        let target = Quat::from_rotation_y(f32::atan2(-input.x, -input.z));
        let max_step = self.rotation_rate.to_radians() * dt;
        let angle = tf.rotation.angle_between(target);
        if angle <= max_step {
            tf.rotation = target;
        } else {
            tf.rotation = tf.rotation.slerp(target, max_step / angle);
        }
    }
}

impl Default for CharacterMovement {
    fn default() -> Self {
        Self::from_settings(&CharacterSettings::default())
    }
}

impl MovementSimulation for CharacterMovement {
    fn is_airborne(&self) -> bool {
        self.mode == MovementMode::Falling
    }

    fn tunables(&self) -> MovementTunables {
        self.tunables
    }

    fn set_tunables(&mut self, tunables: MovementTunables) {
        self.tunables = tunables;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
}

/// Step every character's movement simulation once per frame.
///
/// # Arguments
/// * `time` - time resource for delta timing
/// * `level` - level geometry for ground detection
/// * `q` - query for `(Entity, Transform, CharacterMovement)` to update
#[allow(clippy::needless_pass_by_value)]
pub fn character_movement(
    time: Res<Time>,
    level: Res<Level>,
    mut q: Query<(Entity, &mut Transform, &mut CharacterMovement), With<Player>>,
) {
    let dt = time.delta_seconds();
    for (entity, mut tf, mut movement) in &mut q {
        movement.step(&mut tf, &*level, Some(entity), dt);
    }
}

/// Push reloaded character settings into live movement components.
///
/// Only the parameters the glide never touches are refreshed here; the
/// five tunables go through the glide controller so an active glide keeps
/// its own values.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_character_settings(settings: Res<Settings>, mut q: Query<&mut CharacterMovement>) {
    if !settings.is_changed() {
        return;
    }
    for mut movement in &mut q {
        movement.apply_character_settings(&settings.character);
    }
}
