//! Enemy spawning from registered definitions.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::brain::EnemyBrain;
use super::components::{
    ActiveIndicators, Enemy, EnemyAnimation, EnemyAppearance, EnemyMovement, EnemyType,
};
use super::context::GameContext;
use super::data::{ColliderConfig, EnemyRegistry};
use super::error::EnemyDataError;
use super::events::SpawnEnemyEvent;

/// Spawn one enemy of `enemy_type` at `position`, with stats for the current round.
pub fn spawn_enemy(
    commands: &mut Commands,
    registry: &EnemyRegistry,
    game: &GameContext,
    enemy_type: &str,
    position: Vec3,
) -> Result<Entity, EnemyDataError> {
    let definition = registry
        .get(enemy_type)
        .ok_or_else(|| EnemyDataError::UnknownEnemyType(enemy_type.to_string()))?;

    let brain = EnemyBrain::from_definition(definition, game.round);
    let collider = definition.collider.clone().unwrap_or_default();
    let ColliderConfig {
        half_height,
        radius,
    } = collider;

    let entity = commands
        .spawn((
            Enemy,
            EnemyType(enemy_type.to_string()),
            brain,
            EnemyMovement {
                stopping_distance: definition.stopping_distance,
            },
            EnemyAnimation::default(),
            ActiveIndicators::default(),
            EnemyAppearance {
                model_path: definition.model_path.clone(),
                scale: definition.scale,
                radius,
                half_height,
            },
            Transform::from_translation(position),
            Visibility::default(),
            // Moved by the chase and knockback systems, not by forces
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(half_height, radius),
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
        ))
        .id();

    info!(
        "Spawned {} ({}) at {:?} for round {}",
        definition.name, enemy_type, position, game.round
    );
    Ok(entity)
}

/// Spawn every enemy requested this frame.
pub fn handle_spawn_requests(
    mut commands: Commands,
    registry: Res<EnemyRegistry>,
    game: Res<GameContext>,
    mut spawn_events: EventReader<SpawnEnemyEvent>,
) {
    for event in spawn_events.read() {
        if let Err(e) = spawn_enemy(
            &mut commands,
            &registry,
            &game,
            &event.enemy_type,
            event.position,
        ) {
            error!("Could not spawn enemy: {}", e);
        }
    }
}
