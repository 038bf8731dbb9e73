//! Debug utilities: the ground clearance probe gizmo and a key (F3 default)
//! that dumps every character's glide state to a timestamped text file in
//! `./debug-dumps/`.
//!
//! Useful for capturing what the glide controller saw at the moment a glide
//! was refused without attaching a debugger.
use crate::glide::{GlideController, GlideState};
use crate::movement::{CharacterMovement, MovementTunables};
use crate::settings::Settings;
use bevy::color::palettes::css::{BLUE, RED};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

/// Whether the clearance probe line is drawn.
#[derive(Resource, Debug)]
pub struct ProbeDebug {
    pub visible: bool,
}

pub struct DebugDumpPlugin;

impl Plugin for DebugDumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_probe_debug)
            .add_systems(Update, (toggle_probe_debug, draw_glide_probe, debug_input_system));
    }
}

#[allow(clippy::needless_pass_by_value)]
fn init_probe_debug(mut commands: Commands, settings: Res<Settings>) {
    commands.insert_resource(ProbeDebug { visible: settings.debug.draw_probe });
}

#[allow(clippy::needless_pass_by_value)]
fn toggle_probe_debug(
    state: Option<ResMut<ProbeDebug>>,
    kb: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    let Some(mut state) = state else { return };
    if kb.just_pressed(settings.key_for("toggle_probe", KeyCode::F2)) {
        state.visible = !state.visible;
    }
}

/// Draw each character's last clearance probe: blue when something blocked
/// it, red when the space below was clear.
#[allow(clippy::needless_pass_by_value)]
pub fn draw_glide_probe(mut gizmos: Gizmos, state: Option<Res<ProbeDebug>>, q: Query<&GlideController>) {
    if !state.is_some_and(|s| s.visible) {
        return;
    }
    for glide in &q {
        if let Some(probe) = glide.last_probe() {
            let color = if probe.blocked() { BLUE } else { RED };
            gizmos.line(probe.start, probe.end, color);
        }
    }
}

fn write_tunables(out: &mut String, label: &str, t: &MovementTunables) {
    writeln!(
        out,
        "  {label}: gravity_scale={} max_walk_speed={} braking_deceleration_falling={} max_acceleration={} air_control={}",
        t.gravity_scale, t.max_walk_speed, t.braking_deceleration_falling, t.max_acceleration, t.air_control
    )
    .ok();
}

/// Build the human-readable report for one character.
///
/// # Arguments
/// * `entity` - the character entity, used as a heading
/// * `translation` - current position
/// * `glide` - the character's glide controller
/// * `movement` - the character's movement simulation
#[must_use]
pub fn glide_report(entity: Entity, translation: Vec3, glide: &GlideController, movement: &CharacterMovement) -> String {
    let mut out = String::new();
    writeln!(out, "Character {entity:?} at {translation:?}").ok();
    writeln!(out, "  mode: {:?}, velocity: {:?}", movement.mode, movement.velocity).ok();
    write_tunables(&mut out, "live tunables", &movement.tunables);

    match glide.state() {
        GlideState::Grounded => {
            writeln!(out, "  glide: grounded").ok();
        }
        GlideState::Gliding { snapshot, velocity } => {
            writeln!(
                out,
                "  glide: gliding, eased velocity {velocity:?}, terminal {}",
                glide.terminal_velocity()
            )
            .ok();
            write_tunables(&mut out, "snapshot", snapshot.tunables());
        }
    }

    match glide.last_probe() {
        Some(probe) => {
            let hit = probe
                .hit
                .map_or_else(|| "clear".to_string(), |h| format!("blocked at {:?} ({:.2})", h.point, h.distance));
            writeln!(out, "  last probe: {:?} -> {:?}: {hit}", probe.start, probe.end).ok();
        }
        None => {
            writeln!(out, "  last probe: none").ok();
        }
    }
    out
}

/// A Bevy system that listens for the (dump_debug, default F3) key press and
/// writes a glide report for every character.
#[allow(clippy::needless_pass_by_value)]
fn debug_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    q: Query<(Entity, &Transform, &GlideController, &CharacterMovement)>,
) {
    if !keys.just_pressed(settings.key_for("dump_debug", KeyCode::F3)) {
        return;
    }

    let now = SystemTime::now();
    let ts_secs = now.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs());
    let dt: DateTime<Utc> = DateTime::from(now);
    let human_ts = dt.format("%Y-%m-%d %H:%M:%S").to_string();
    let dir = &settings.debug.dump_dir;
    let fname = format!("{dir}/glide-{ts_secs}.txt");

    let mut out = String::new();
    writeln!(out, "Glide dump: {ts_secs}").ok();
    writeln!(out, "Timestamp: {human_ts} (epoch secs: {ts_secs})").ok();
    writeln!(
        out,
        "Settings: descending_rate={} minimum_height={}",
        settings.glide.descending_rate, settings.glide.minimum_height
    )
    .ok();

    let mut count = 0usize;
    for (entity, tf, glide, movement) in &q {
        out.push('\n');
        out.push_str(&glide_report(entity, tf.translation, glide, movement));
        count += 1;
    }
    if count == 0 {
        writeln!(out, "\n(no characters)").ok();
    }

    if let Err(e) = fs::create_dir_all(dir) {
        error!("debug dump: failed to create dir '{dir}': {e}");
        return;
    }
    if let Err(e) = fs::write(&fname, out) {
        error!("debug dump: failed to write {fname}: {e}");
    } else {
        info!("wrote debug dump: {fname}");
    }
}
