//! Systems wiring each player's `GlideController` into the frame.

use crate::glide::GlideController;
use crate::movement::CharacterMovement;
use crate::settings::Settings;
use bevy::prelude::*;

/// Run the descent integrator for every character once per frame.
///
/// Must run after input has been applied and before `character_movement`
/// integrates the pinned velocity.
#[allow(clippy::needless_pass_by_value)]
pub fn descend_gliders(time: Res<Time>, mut q: Query<(&mut GlideController, &mut CharacterMovement)>) {
    let dt = time.delta_seconds();
    for (mut glide, mut movement) in &mut q {
        glide.tick(&mut *movement, dt);
    }
}

/// Push reloaded glide and base movement settings into live controllers.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_glide_settings(
    settings: Res<Settings>,
    mut q: Query<(&mut GlideController, &mut CharacterMovement)>,
) {
    if !settings.is_changed() {
        return;
    }
    for (mut glide, mut movement) in &mut q {
        glide.apply_settings(&mut *movement, settings.glide.clone());
        glide.apply_base_tunables(&mut *movement, settings.character.tunables);
    }
}
