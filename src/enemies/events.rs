//! Events the enemy systems send and receive.

use bevy::prelude::*;

use super::output::EnemySound;

/// Interrupt an enemy for `duration` seconds.
#[derive(Event, Debug, Clone)]
pub struct StunEvent {
    pub target: Entity,
    pub duration: f32,
}

/// Reduce an enemy's move speed by `reduction` (0 to 0.999) for a while.
#[derive(Event, Debug, Clone)]
pub struct SlowEvent {
    pub target: Entity,
    pub reduction: f32,
    pub duration: f32,
}

/// Push an enemy back. Without a direction it is pushed away from the player.
#[derive(Event, Debug, Clone)]
pub struct KnockbackEvent {
    pub target: Entity,
    pub initial_velocity: f32,
    pub distance: f32,
    pub direction: Option<Vec3>,
}

/// Request a new enemy of a registered type.
#[derive(Event, Debug, Clone)]
pub struct SpawnEnemyEvent {
    pub enemy_type: String,
    pub position: Vec3,
}

/// An enemy finished dying and was despawned.
#[derive(Event, Debug, Clone)]
pub struct EnemyRemovedEvent {
    pub entity: Entity,
    pub enemy_type: String,
}

/// A dead enemy rolled a loot drop.
#[derive(Event, Debug, Clone)]
pub struct LootDropEvent {
    pub position: Vec3,
}

/// A ranged enemy fired one projectile.
#[derive(Event, Debug, Clone)]
pub struct FireProjectileEvent {
    pub source: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
}

#[derive(Event, Debug, Clone)]
pub struct EnemySoundEvent {
    pub entity: Entity,
    pub sound: EnemySound,
}
