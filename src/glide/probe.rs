//! Ground clearance probe: one downward ray deciding whether a glide may start.

use crate::world::{RayHit, RaycastWorld};
use bevy::prelude::*;

/// Outcome of a single clearance probe, kept around for debug drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearanceProbe {
    pub start: Vec3,
    pub end: Vec3,
    pub hit: Option<RayHit>,
}

impl ClearanceProbe {
    /// `true` when something collidable lies within the probe distance.
    #[must_use]
    pub fn blocked(&self) -> bool {
        self.hit.is_some()
    }
}

/// Cast from the character's position along its local down axis.
///
/// # Arguments
/// * `world` - geometry to query
/// * `transform` - character transform; its translation is the ray origin
/// * `distance` - how far below the character must be clear
/// * `ignore` - the character's own entity
#[must_use]
pub fn probe_ground_clearance(
    world: &impl RaycastWorld,
    transform: &Transform,
    distance: f32,
    ignore: Option<Entity>,
) -> ClearanceProbe {
    let start = transform.translation;
    let down = transform.down();
    ClearanceProbe {
        start,
        end: start + *down * distance,
        hit: world.raycast(start, down, distance, ignore),
    }
}
