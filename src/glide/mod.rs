//! Glide movement mode.
//!
//! A glide is entered from the air when there is enough clear space below
//! the character. While gliding the character's five movement tunables are
//! swapped for glide values and its vertical speed is held at the descending
//! rate; when the glide ends the original tunables are put back.
//!
//! `GlideController` is written against the `MovementSimulation` and
//! `RaycastWorld` traits so it can be driven without a running app:
//!
//! ```ignore
//! let mut glide = GlideController::new(GlideSettings::default());
//! if glide.start_gliding(&mut movement, &level, &transform, Some(entity)) {
//!     glide.tick(&mut movement, time.delta_seconds());
//! }
//! glide.stop_gliding(&mut movement);
//! ```
pub mod ease;
pub mod probe;
pub mod snapshot;

use crate::movement::{MovementSimulation, MovementTunables};
use crate::settings::GlideSettings;
use crate::world::RaycastWorld;
use bevy::prelude::*;

pub use ease::ease_in_out;
pub use probe::{ClearanceProbe, probe_ground_clearance};
pub use snapshot::MovementSnapshot;

/// Exponent of the ease-in-out curve driving the cached descent velocity.
pub const EASE_EXPONENT: f32 = 3.0;

/// Distance from the target at which the cached descent velocity snaps onto it.
pub const SETTLE_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GlideState {
    #[default]
    Grounded,
    Gliding {
        /// Tunables to restore when the glide ends.
        snapshot: MovementSnapshot,
        /// Velocity at glide entry; `y` eases toward the descending rate.
        velocity: Vec3,
    },
}

/// Per-character glide state machine.
#[derive(Component, Debug, Clone)]
pub struct GlideController {
    settings: GlideSettings,
    state: GlideState,
    last_probe: Option<ClearanceProbe>,
}

impl GlideController {
    #[must_use]
    pub fn new(settings: GlideSettings) -> Self {
        Self {
            settings,
            state: GlideState::Grounded,
            last_probe: None,
        }
    }

    /// Glide settings in effect; change them through `apply_settings`.
    #[must_use]
    pub fn settings(&self) -> &GlideSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> &GlideState {
        &self.state
    }

    #[must_use]
    pub fn is_gliding(&self) -> bool {
        matches!(self.state, GlideState::Gliding { .. })
    }

    /// The eased velocity cached for the current glide, if any.
    #[must_use]
    pub fn current_velocity(&self) -> Option<Vec3> {
        match self.state {
            GlideState::Gliding { velocity, .. } => Some(velocity),
            GlideState::Grounded => None,
        }
    }

    /// The most recent clearance probe taken by `start_gliding`.
    #[must_use]
    pub fn last_probe(&self) -> Option<&ClearanceProbe> {
        self.last_probe.as_ref()
    }

    /// Terminal vertical velocity while gliding (negative = down).
    #[must_use]
    pub fn terminal_velocity(&self) -> f32 {
        -self.settings.descending_rate
    }

    fn probe(&self, world: &impl RaycastWorld, transform: &Transform, ignore: Option<Entity>) -> ClearanceProbe {
        probe_ground_clearance(world, transform, self.settings.minimum_height, ignore)
    }

    /// Whether a glide may start right now: nothing within `minimum_height`
    /// below the character and the character is falling.
    #[must_use]
    pub fn can_start_gliding(
        &self,
        sim: &impl MovementSimulation,
        world: &impl RaycastWorld,
        transform: &Transform,
        ignore: Option<Entity>,
    ) -> bool {
        !self.probe(world, transform, ignore).blocked() && sim.is_airborne()
    }

    /// Enter the glide if the character is grounded-state and allowed to glide.
    ///
    /// A refused start is a normal gameplay outcome and leaves everything
    /// untouched.
    ///
    /// # Return
    /// `true` when the controller transitioned into `Gliding`.
    pub fn start_gliding(
        &mut self,
        sim: &mut impl MovementSimulation,
        world: &impl RaycastWorld,
        transform: &Transform,
        ignore: Option<Entity>,
    ) -> bool {
        if self.is_gliding() {
            return false;
        }

        let probe = self.probe(world, transform, ignore);
        self.last_probe = Some(probe);
        if probe.blocked() || !sim.is_airborne() {
            trace!(
                "glide refused (blocked: {}, airborne: {})",
                probe.blocked(),
                sim.is_airborne()
            );
            return false;
        }

        let velocity = sim.velocity();
        let snapshot = MovementSnapshot::capture(sim);
        sim.set_tunables(self.settings.glide_tunables);
        self.state = GlideState::Gliding { snapshot, velocity };
        debug!("glide started at {:?} with velocity {velocity:?}", transform.translation);
        true
    }

    /// Leave the glide and restore the tunables captured on entry.
    ///
    /// Calling it while not gliding does nothing.
    pub fn stop_gliding(&mut self, sim: &mut impl MovementSimulation) {
        if let GlideState::Gliding { snapshot, .. } = std::mem::take(&mut self.state) {
            snapshot.restore(sim);
            debug!("glide stopped");
        }
    }

    /// Advance the descent by one simulation tick.
    ///
    /// The cached velocity eases toward the terminal velocity, while the
    /// simulation's own vertical velocity is set to the terminal velocity
    /// outright. Does nothing unless gliding.
    pub fn tick(&mut self, sim: &mut impl MovementSimulation, delta_seconds: f32) {
        let target = self.terminal_velocity();
        let GlideState::Gliding { velocity, .. } = &mut self.state else {
            return;
        };

        if velocity.y != target && delta_seconds > 0.0 {
            let current = velocity.y;
            let mut eased = ease_in_out(current, target, delta_seconds, EASE_EXPONENT);
            // a step below f32 resolution still advances by one ulp
            if eased == current {
                eased = step_toward(current, target);
            }
            velocity.y = if (eased - target).abs() <= SETTLE_EPSILON { target } else { eased };
        }

        let mut v = sim.velocity();
        v.y = target;
        sim.set_velocity(v);
    }

    /// Install new base tunables for the character.
    ///
    /// While gliding they replace the snapshot so they take effect when the
    /// glide ends; otherwise they are written straight into `sim`.
    pub fn apply_base_tunables(&mut self, sim: &mut impl MovementSimulation, tunables: MovementTunables) {
        match &mut self.state {
            GlideState::Gliding { snapshot, .. } => snapshot.replace(tunables),
            GlideState::Grounded => sim.set_tunables(tunables),
        }
    }

    /// Install new glide settings; an active glide switches to the new
    /// glide tunables immediately.
    pub fn apply_settings(&mut self, sim: &mut impl MovementSimulation, settings: GlideSettings) {
        if self.is_gliding() {
            sim.set_tunables(settings.glide_tunables);
        }
        self.settings = settings;
    }
}

/// The f32 adjacent to `from` in the direction of `to`.
fn step_toward(from: f32, to: f32) -> f32 {
    if from == to || from.is_nan() || to.is_nan() {
        return to;
    }
    if from == 0.0 {
        let tiny = f32::from_bits(1);
        return if to > 0.0 { tiny } else { -tiny };
    }
    let bits = from.to_bits();
    // growing the bit pattern grows the magnitude
    if (to > from) == (from > 0.0) {
        f32::from_bits(bits + 1)
    } else {
        f32::from_bits(bits - 1)
    }
}

impl Default for GlideController {
    fn default() -> Self {
        Self::new(GlideSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Level;

    /// Plain stand-in for a movement simulation.
    #[derive(Debug, Clone)]
    struct FakeSim {
        airborne: bool,
        tunables: MovementTunables,
        velocity: Vec3,
    }

    impl MovementSimulation for FakeSim {
        fn is_airborne(&self) -> bool {
            self.airborne
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

    fn odd_tunables() -> MovementTunables {
        MovementTunables {
            gravity_scale: 1.25,
            max_walk_speed: 437.5,
            braking_deceleration_falling: 1499.9,
            max_acceleration: 2047.0,
            air_control: 0.35,
        }
    }

    fn airborne_sim(velocity: Vec3) -> FakeSim {
        FakeSim { airborne: true, tunables: odd_tunables(), velocity }
    }

    /// Floor whose top face is at y = 0.
    fn floor() -> Level {
        let mut level = Level::new();
        level.add_solid(None, Vec3::new(0.0, -10.0, 0.0), Vec3::new(5000.0, 10.0, 5000.0));
        level
    }

    fn at_height(y: f32) -> Transform {
        Transform::from_xyz(0.0, y, 0.0)
    }

    #[test]
    fn scenario_glide_descend_and_restore() {
        let level = floor();
        let mut sim = airborne_sim(Vec3::new(0.0, -900.0, 0.0));
        let before = sim.tunables;
        let mut glide = GlideController::default();

        assert!(glide.start_gliding(&mut sim, &level, &at_height(60.0), None));
        assert!(glide.is_gliding());
        assert_eq!(
            sim.tunables,
            MovementTunables {
                gravity_scale: 0.0,
                max_walk_speed: 600.0,
                braking_deceleration_falling: 350.0,
                max_acceleration: 1024.0,
                air_control: 0.9,
            }
        );

        let mut previous = glide.current_velocity().expect("gliding").y;
        assert_eq!(previous, -900.0);
        for _ in 0..50 {
            glide.tick(&mut sim, 0.1);
            let now = glide.current_velocity().expect("gliding").y;
            assert!(now > previous && now < -300.0, "{previous} -> {now}");
            assert_eq!(sim.velocity.y, -300.0);
            previous = now;
        }

        glide.stop_gliding(&mut sim);
        assert!(!glide.is_gliding());
        assert_eq!(sim.tunables, before);
    }

    #[test]
    fn stop_from_grounded_is_idempotent() {
        let mut sim = airborne_sim(Vec3::ZERO);
        let before = sim.tunables;
        let mut glide = GlideController::default();

        glide.stop_gliding(&mut sim);
        let once = sim.tunables;
        glide.stop_gliding(&mut sim);

        assert_eq!(once, before);
        assert_eq!(sim.tunables, before);
        assert_eq!(*glide.state(), GlideState::Grounded);
    }

    #[test]
    fn start_then_stop_restores_exact_values() {
        let level = Level::new();
        let samples = [
            odd_tunables(),
            MovementTunables::walking(),
            MovementTunables::glide(),
            MovementTunables {
                gravity_scale: f32::MIN_POSITIVE,
                max_walk_speed: 1.0e9,
                braking_deceleration_falling: 0.1 + 0.2,
                max_acceleration: -0.0,
                air_control: 1.0 / 3.0,
            },
        ];

        for tunables in samples {
            let mut sim = FakeSim { airborne: true, tunables, velocity: Vec3::ZERO };
            let mut glide = GlideController::default();
            assert!(glide.start_gliding(&mut sim, &level, &at_height(500.0), None));
            glide.stop_gliding(&mut sim);
            assert_eq!(sim.tunables.gravity_scale.to_bits(), tunables.gravity_scale.to_bits());
            assert_eq!(sim.tunables.max_walk_speed.to_bits(), tunables.max_walk_speed.to_bits());
            assert_eq!(
                sim.tunables.braking_deceleration_falling.to_bits(),
                tunables.braking_deceleration_falling.to_bits()
            );
            assert_eq!(sim.tunables.max_acceleration.to_bits(), tunables.max_acceleration.to_bits());
            assert_eq!(sim.tunables.air_control.to_bits(), tunables.air_control.to_bits());
        }
    }

    #[test]
    fn start_is_gated_on_clearance_and_airborne() {
        let level = floor();
        // (height, airborne, expected)
        let cases = [
            (40.0, true, false),  // blocked, airborne
            (40.0, false, false), // blocked, grounded
            (60.0, false, false), // clear, grounded
            (60.0, true, true),   // clear, airborne
        ];

        for (height, airborne, expected) in cases {
            let mut sim = FakeSim { airborne, tunables: odd_tunables(), velocity: Vec3::NEG_Y };
            let mut glide = GlideController::default();
            let tf = at_height(height);

            assert_eq!(glide.can_start_gliding(&sim, &level, &tf, None), expected);
            assert_eq!(glide.start_gliding(&mut sim, &level, &tf, None), expected);
            assert_eq!(glide.is_gliding(), expected);
            if !expected {
                assert_eq!(sim.tunables, odd_tunables());
                assert_eq!(*glide.state(), GlideState::Grounded);
            }
            assert_eq!(glide.last_probe().map(ClearanceProbe::blocked), Some(height < 50.0));
        }
    }

    #[test]
    fn second_start_while_gliding_keeps_first_snapshot() {
        let level = Level::new();
        let mut sim = airborne_sim(Vec3::ZERO);
        let mut glide = GlideController::default();

        assert!(glide.start_gliding(&mut sim, &level, &at_height(500.0), None));
        assert!(!glide.start_gliding(&mut sim, &level, &at_height(500.0), None));
        glide.stop_gliding(&mut sim);

        assert_eq!(sim.tunables, odd_tunables());
    }

    #[test]
    fn own_collision_does_not_block_probe() {
        let me = Entity::from_raw(3);
        let mut level = floor();
        level.add_solid(Some(me), Vec3::new(0.0, 100.0, 0.0), Vec3::new(42.0, 96.0, 42.0));
        let mut sim = airborne_sim(Vec3::ZERO);
        let mut glide = GlideController::default();

        assert!(!glide.can_start_gliding(&sim, &level, &at_height(100.0), None));
        assert!(glide.start_gliding(&mut sim, &level, &at_height(100.0), Some(me)));
    }

    #[test]
    fn descent_converges_without_overshoot() {
        for start in [-900.0_f32, 0.0, 250.0, -300.5] {
            let mut sim = airborne_sim(Vec3::new(0.0, start, 0.0));
            let mut glide = GlideController::default();
            assert!(glide.start_gliding(&mut sim, &Level::new(), &at_height(500.0), None));

            let target = glide.terminal_velocity();
            let mut previous = start;
            let mut settled = false;
            for _ in 0..20_000 {
                glide.tick(&mut sim, 0.1);
                let now = glide.current_velocity().expect("gliding").y;
                if now == target {
                    settled = true;
                    break;
                }
                let (lo, hi) = if previous < target { (previous, target) } else { (target, previous) };
                assert!(now > lo && now < hi, "start {start}: {previous} -> {now}");
                previous = now;
            }
            assert!(settled, "start {start} never settled (last {previous})");
        }
    }

    #[test]
    fn simulation_velocity_is_pinned_every_tick() {
        let mut sim = airborne_sim(Vec3::new(120.0, -900.0, -40.0));
        let mut glide = GlideController::default();
        assert!(glide.start_gliding(&mut sim, &Level::new(), &at_height(500.0), None));

        for dt in [0.0, 0.016, 0.1, 0.5, 2.0, 0.016] {
            sim.velocity.y = 1234.0;
            glide.tick(&mut sim, dt);
            assert_eq!(sim.velocity.y, -300.0);
            assert_eq!(sim.velocity.x, 120.0);
            assert_eq!(sim.velocity.z, -40.0);
        }
        // large dt reaches the target outright; pinning still applies afterwards
        assert_eq!(glide.current_velocity().map(|v| v.y), Some(-300.0));
        sim.velocity.y = 5.0;
        glide.tick(&mut sim, 0.016);
        assert_eq!(sim.velocity.y, -300.0);
    }

    #[test]
    fn tick_does_nothing_while_grounded() {
        let mut sim = airborne_sim(Vec3::new(0.0, -900.0, 0.0));
        let mut glide = GlideController::default();
        glide.tick(&mut sim, 0.1);
        assert_eq!(sim.velocity.y, -900.0);
        assert_eq!(glide.current_velocity(), None);
    }

    #[test]
    fn base_tunables_reloaded_mid_glide_apply_on_exit() {
        let mut sim = airborne_sim(Vec3::ZERO);
        let mut glide = GlideController::default();
        assert!(glide.start_gliding(&mut sim, &Level::new(), &at_height(500.0), None));

        glide.apply_base_tunables(&mut sim, MovementTunables::walking());
        assert_eq!(sim.tunables, MovementTunables::glide());

        glide.stop_gliding(&mut sim);
        assert_eq!(sim.tunables, MovementTunables::walking());

        glide.apply_base_tunables(&mut sim, odd_tunables());
        assert_eq!(sim.tunables, odd_tunables());
    }

    #[test]
    fn glide_settings_reload_switches_active_glide() {
        let mut sim = airborne_sim(Vec3::ZERO);
        let mut glide = GlideController::default();
        assert!(glide.start_gliding(&mut sim, &Level::new(), &at_height(500.0), None));

        let mut settings = GlideSettings::default();
        settings.descending_rate = 150.0;
        settings.glide_tunables.air_control = 0.5;
        glide.apply_settings(&mut sim, settings);
        glide.tick(&mut sim, 0.016);

        assert_eq!(sim.tunables.air_control, 0.5);
        assert_eq!(sim.velocity.y, -150.0);
        glide.stop_gliding(&mut sim);
        assert_eq!(sim.tunables, odd_tunables());
    }

    #[test]
    fn short_frames_ease_without_jumping_to_target() {
        for dt in [1.0 / 144.0, 1.0 / 240.0, 1.0 / 500.0, 1.0 / 1000.0] {
            let mut sim = airborne_sim(Vec3::new(0.0, -900.0, 0.0));
            let mut glide = GlideController::default();
            assert!(glide.start_gliding(&mut sim, &Level::new(), &at_height(500.0), None));

            let target = glide.terminal_velocity();
            let mut previous = -900.0_f32;
            for _ in 0..2_000 {
                glide.tick(&mut sim, dt);
                let now = glide.current_velocity().expect("gliding").y;
                assert!(now > previous, "dt {dt}: {previous} -> {now}");
                assert!((now - target).abs() > SETTLE_EPSILON, "dt {dt}: settled early at {now}");
                assert_eq!(sim.velocity.y, target);
                previous = now;
            }
        }
    }

    #[test]
    fn step_toward_moves_one_ulp() {
        assert_eq!(step_toward(-900.0, -300.0), f32::from_bits((-900.0_f32).to_bits() - 1));
        assert!(step_toward(-900.0, -300.0) > -900.0);
        assert!(step_toward(300.0, -300.0) < 300.0);
        assert!(step_toward(0.0, -300.0) < 0.0);
        assert_eq!(step_toward(-300.0, -300.0), -300.0);
    }

    #[test]
    fn drives_character_movement() {
        let mut movement = crate::movement::CharacterMovement::default();
        let mut glide = GlideController::default();
        assert!(glide.start_gliding(&mut movement, &Level::new(), &at_height(3000.0), None));
        glide.tick(&mut movement, 1.0 / 60.0);
        assert_eq!(movement.velocity.y, -300.0);
        assert_eq!(movement.tunables, MovementTunables::glide());
    }

    #[test]
    fn settings_change_only_through_apply_settings() {
        let mut sim = airborne_sim(Vec3::ZERO);
        let mut glide = GlideController::default();
        assert_eq!(glide.settings().descending_rate, 300.0);

        let mut settings = glide.settings().clone();
        settings.minimum_height = 5000.0;
        glide.apply_settings(&mut sim, settings);
        assert_eq!(glide.settings().minimum_height, 5000.0);

        let mut level = Level::new();
        level.add_solid(None, Vec3::new(0.0, -10.0, 0.0), Vec3::new(100.0, 10.0, 100.0));
        assert!(!glide.start_gliding(&mut sim, &level, &at_height(500.0), None));
    }
}
