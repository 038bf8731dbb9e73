//! Player components and systems (input, glide wiring, camera).
//!
//! The module provides the `Player` marker, the `PlayerBundle` used to spawn
//! a playable character, and convenience re-exports for the player systems.
//!
//! # Example:
//!
//! ```ignore
//! // spawn a character with movement, glide and look state
//! commands.spawn((PlayerBundle::from_settings(&settings), PbrBundle::default()));
//! // register systems
//! app.add_systems(Update, (read_keyboard_input, apply_character_input, descend_gliders).chain());
//! ```
pub mod camera;
pub mod glide;
pub mod input;

use crate::glide::GlideController;
use crate::movement::CharacterMovement;
use crate::settings::Settings;
use bevy::prelude::*;

pub use camera::*;
pub use glide::*;
pub use input::*;

/// Marks the character driven by local input.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Everything a playable character needs besides its transform and mesh.
#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: Player,
    pub movement: CharacterMovement,
    pub glide: GlideController,
    pub look: PlayerLook,
}

impl PlayerBundle {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            player: Player,
            movement: CharacterMovement::from_settings(&settings.character),
            glide: GlideController::new(settings.glide.clone()),
            look: PlayerLook::default(),
        }
    }
}
