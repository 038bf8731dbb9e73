//! Save/restore of the movement parameters a glide overrides.

use crate::movement::{MovementSimulation, MovementTunables};

/// Copy of the five movement tunables taken when a glide starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementSnapshot(MovementTunables);

impl MovementSnapshot {
    #[must_use]
    pub fn capture(sim: &impl MovementSimulation) -> Self {
        Self(sim.tunables())
    }

    /// Write the captured values back into `sim`.
    pub fn restore(&self, sim: &mut impl MovementSimulation) {
        sim.set_tunables(self.0);
    }

    #[must_use]
    pub fn tunables(&self) -> &MovementTunables {
        &self.0
    }

    /// Replace the stored values, e.g. when base settings are reloaded mid-glide.
    pub fn replace(&mut self, tunables: MovementTunables) {
        self.0 = tunables;
    }
}
