//! Projectile systems.

use bevy::prelude::*;

use super::components::*;
use crate::core::DamageEvent;
use crate::enemies::sensor::horizontal_distance;
use crate::enemies::{Ability, FireProjectileEvent, GameContext};
use crate::player::{Dash, Player};

pub fn spawn_projectiles(
    mut commands: Commands,
    settings: Res<ProjectileSettings>,
    mut fire_events: EventReader<FireProjectileEvent>,
) {
    for event in fire_events.read() {
        if event.direction == Vec3::ZERO {
            continue;
        }
        commands.spawn((
            EnemyProjectile {
                source: event.source,
                damage: event.damage,
                velocity: event.direction * event.speed,
                remaining: settings.lifetime,
            },
            Transform::from_translation(event.origin),
            Visibility::default(),
        ));
    }
}

pub fn attach_projectile_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    query: Query<Entity, Added<EnemyProjectile>>,
) {
    for entity in query.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(0.15))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.5, 1.0, 0.3),
                emissive: LinearRgba::rgb(0.5, 2.0, 0.3),
                ..default()
            })),
        ));
    }
}

pub fn move_projectiles(time: Res<Time>, mut query: Query<(&mut Transform, &mut EnemyProjectile)>) {
    let dt = time.delta_secs();
    for (mut transform, mut projectile) in query.iter_mut() {
        transform.translation += projectile.velocity * dt;
        projectile.remaining -= dt;
    }
}

/// Damage the player on contact. A dashing player with dash invulnerability
/// is passed through.
pub fn hit_player(
    mut commands: Commands,
    settings: Res<ProjectileSettings>,
    game: Res<GameContext>,
    player_query: Query<(Entity, &Transform, Option<&Dash>), With<Player>>,
    projectile_query: Query<(Entity, &Transform, &EnemyProjectile)>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let Ok((player, player_transform, dash)) = player_query.get_single() else {
        return;
    };
    let dodging = game.is_unlocked(Ability::DashInvulnerability)
        && dash.is_some_and(Dash::is_dashing);

    for (entity, transform, projectile) in projectile_query.iter() {
        if horizontal_distance(transform.translation, player_transform.translation)
            > settings.hit_radius
        {
            continue;
        }
        if dodging {
            continue;
        }
        damage_events.send(DamageEvent {
            target: player,
            source: projectile.source,
            amount: projectile.damage,
        });
        commands.entity(entity).despawn_recursive();
    }
}

pub fn expire_projectiles(mut commands: Commands, query: Query<(Entity, &EnemyProjectile)>) {
    for (entity, projectile) in query.iter() {
        if projectile.remaining <= 0.0 {
            commands.entity(entity).despawn_recursive();
        }
    }
}
