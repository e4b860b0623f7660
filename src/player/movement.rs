//! Top-down player movement, dashing and camera follow.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::combat::{Health, Weapon, WeaponCooldown};
use crate::core::GameState;

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.add_systems(
        Update,
        (
            (start_dash, player_movement)
                .chain()
                .run_if(resource_exists::<ButtonInput<KeyCode>>),
            camera_follow,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    );
}

fn input_direction(keyboard: &ButtonInput<KeyCode>) -> Vec3 {
    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction.x += 1.0;
    }
    direction.normalize_or_zero()
}

/// Start a dash on Space, in the held direction or the facing direction.
fn start_dash(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut query: Query<(&Transform, &mut Dash), With<Player>>,
) {
    let Ok((transform, mut dash)) = query.get_single_mut() else {
        return;
    };

    let dt = time.delta_secs();
    dash.cooldown = (dash.cooldown - dt).max(0.0);
    dash.remaining = (dash.remaining - dt).max(0.0);

    if keyboard.just_pressed(KeyCode::Space) && dash.cooldown <= 0.0 {
        let held = input_direction(&keyboard);
        dash.direction = if held == Vec3::ZERO {
            transform.forward().as_vec3()
        } else {
            held
        };
        dash.remaining = config.dash_duration;
        dash.cooldown = config.dash_cooldown;
    }
}

/// Handle WASD movement on the ground plane.
///
/// Uses Rapier's KinematicCharacterController for collision detection.
fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut query: Query<(&mut Transform, &Dash, &mut KinematicCharacterController), With<Player>>,
) {
    let Ok((mut transform, dash, mut controller)) = query.get_single_mut() else {
        return;
    };

    let (direction, speed) = if dash.is_dashing() {
        (dash.direction, config.dash_speed)
    } else {
        (input_direction(&keyboard), config.move_speed)
    };

    if direction != Vec3::ZERO {
        transform.look_to(direction, Vec3::Y);
    }
    controller.translation = Some(direction * speed * time.delta_secs());
}

fn camera_follow(
    config: Res<PlayerConfig>,
    player_query: Query<&Transform, (With<Player>, Without<PlayerCamera>)>,
    mut camera_query: Query<&mut Transform, With<PlayerCamera>>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    for mut camera in camera_query.iter_mut() {
        camera.translation = player.translation + config.camera_offset;
        camera.look_at(player.translation, Vec3::Y);
    }
}

/// Spawn the player entity.
pub fn spawn_player(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Player,
            Dash::default(),
            // Combat components
            Health::new(100.0),
            Weapon::default(),
            WeaponCooldown::default(),
            // Transform
            Transform::from_translation(position),
            Visibility::default(),
            // Rapier physics components
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.3),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                ..default()
            },
        ))
        .id()
}
