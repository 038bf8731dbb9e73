//! Level geometry and ray queries.
//!
//! This module provides the `Level` resource which holds the static solids
//! of the play area as axis-aligned boxes, and the `RaycastWorld` trait the
//! glide probe and the movement simulation use to ask "what is below me".
//!
//! # Example:
//!
//! ```ignore
//! let mut level = Level::new();
//! level.add_solid(None, Vec3::ZERO, Vec3::new(2000.0, 10.0, 2000.0));
//! let hit = level.raycast(Vec3::new(0.0, 100.0, 0.0), Dir3::NEG_Y, 200.0, None);
//! ```

use bevy::math::bounding::{Aabb3d, RayCast3d};
use bevy::prelude::*;

/// Result of a ray query against level geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space point where the ray first touched a solid.
    pub point: Vec3,
    /// Distance travelled along the ray to `point`.
    pub distance: f32,
    /// Entity owning the solid that was hit, if it has one.
    pub entity: Option<Entity>,
}

/// Anything that can answer a single synchronous ray query.
///
/// `ignore` lets the caller skip its own collision (the character never
/// blocks its own probe).
pub trait RaycastWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        ignore: Option<Entity>,
    ) -> Option<RayHit>;
}

/// One static box in the level.
#[derive(Debug, Clone, Copy)]
pub struct LevelSolid {
    pub entity: Option<Entity>,
    pub bounds: Aabb3d,
}

/// The `Level` resource holds every collidable solid in the play area.
///
/// # Fields
/// * `solids` - static boxes, checked linearly on every query
#[derive(Resource, Debug, Default)]
pub struct Level {
    pub solids: Vec<LevelSolid>,
}

impl Level {
    /// Create an empty `Level` with no solids.
    #[must_use]
    pub fn new() -> Self {
        Level { solids: Vec::new() }
    }

    /// Register a box centered at `center` with the given half extents.
    ///
    /// # Arguments
    /// * `entity` - optional owner, used by callers that want to ignore it
    /// * `center` - world-space center of the box
    /// * `half_size` - half extents on each axis
    pub fn add_solid(&mut self, entity: Option<Entity>, center: Vec3, half_size: Vec3) {
        self.solids.push(LevelSolid {
            entity,
            bounds: Aabb3d::new(center, half_size),
        });
    }
}

impl RaycastWorld for Level {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        ignore: Option<Entity>,
    ) -> Option<RayHit> {
        if max_distance <= 0.0 {
            return None;
        }

        let ray = RayCast3d::new(origin, direction, max_distance);
        let mut nearest: Option<RayHit> = None;

        for solid in &self.solids {
            if ignore.is_some() && solid.entity == ignore {
                continue;
            }
            let Some(distance) = ray.aabb_intersection_at(&solid.bounds) else {
                continue;
            };
            if nearest.is_some_and(|n| n.distance <= distance) {
                continue;
            }
            nearest = Some(RayHit {
                point: origin + *direction * distance,
                distance,
                entity: solid.entity,
            });
        }

        nearest
    }
}
