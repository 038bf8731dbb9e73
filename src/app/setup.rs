//! Startup system building the demo level and spawning the character,
//! its follow camera and lights.
use bevy::prelude::*;
use glider::player::{FollowCamera, PlayerBundle};
use glider::settings::Settings;
use glider::world::Level;

/// Static boxes of the demo level: `(center, half_size, color)`.
///
/// A tall central tower to glide off, a lower ledge, and a wide ground slab
/// with its top face at y = 0.
const LEVEL_BOXES: [(Vec3, Vec3, Color); 4] = [
    (Vec3::new(0.0, -25.0, 0.0), Vec3::new(6000.0, 25.0, 6000.0), Color::srgb(0.32, 0.45, 0.30)),
    (Vec3::new(0.0, 500.0, 0.0), Vec3::new(250.0, 500.0, 250.0), Color::srgb(0.55, 0.52, 0.48)),
    (Vec3::new(900.0, 150.0, -300.0), Vec3::new(300.0, 150.0, 200.0), Color::srgb(0.60, 0.48, 0.36)),
    (Vec3::new(-1200.0, 40.0, 400.0), Vec3::new(150.0, 40.0, 150.0), Color::srgb(0.45, 0.40, 0.58)),
];

/// Spawn the level geometry, the player character, its camera and lights.
///
/// Every level box is both rendered and registered as a solid in the
/// `Level` resource so ground detection, the glide probe and the camera
/// boom all see the same geometry.
///
/// # Arguments
/// - `commands`: Commands used to spawn entities and insert resources.
/// - `meshes`: Asset storage for the box and capsule meshes.
/// - `materials`: Asset storage for standard materials.
/// - `level`: Level resource filled with the solids spawned here.
/// - `settings`: Character dimensions and spawn point.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut level: ResMut<Level>,
    settings: Res<Settings>,
) {
    for (center, half_size, color) in LEVEL_BOXES {
        let size = half_size * 2.0;
        let entity = commands
            .spawn(PbrBundle {
                mesh: meshes.add(Cuboid::new(size.x, size.y, size.z)),
                material: materials.add(StandardMaterial {
                    base_color: color,
                    perceptual_roughness: 0.9,
                    ..default()
                }),
                transform: Transform::from_translation(center),
                ..default()
            })
            .id();
        level.add_solid(Some(entity), center, half_size);
    }

    let character = &settings.character;
    let (sx, sy, sz) = character.spawn;
    let cylinder = (character.capsule_half_height - character.capsule_radius).max(0.0) * 2.0;

    let player = commands
        .spawn((
            PbrBundle {
                mesh: meshes.add(Capsule3d::new(character.capsule_radius, cylinder)),
                material: materials.add(StandardMaterial {
                    base_color: Color::srgb(0.85, 0.35, 0.25),
                    ..default()
                }),
                transform: Transform::from_xyz(sx, sy, sz),
                ..default()
            },
            PlayerBundle::from_settings(&settings),
        ))
        .id();
    info!("spawned player {player:?} at ({sx}, {sy}, {sz})");

    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_xyz(sx, sy + settings.camera.pivot_height, sz + settings.camera.boom_length),
            projection: PerspectiveProjection {
                far: 20_000.0,
                ..default()
            }
            .into(),
            ..default()
        },
        FollowCamera { target: player },
    ));

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            shadows_enabled: true,
            illuminance: 8000.0,
            ..default()
        },
        transform: Transform::from_rotation(Quat::from_euler(bevy::math::EulerRot::YXZ, 0.6, -0.9, 0.0)),
        ..default()
    });

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
    });
}
