//! Global events used for cross-system communication.
//!
//! Damage flows through events so the attacker never needs to know whether
//! the target is the player or an enemy.

use bevy::prelude::*;

/// Sent when an entity takes damage.
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage
    pub source: Entity,
    pub amount: f32,
}

/// Sent when an entity with [`Health`](crate::combat::Health) dies.
#[derive(Event, Debug, Clone)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that killed them (if any)
    pub killed_by: Option<Entity>,
}
