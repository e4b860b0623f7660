//! Projectile components and settings.

use bevy::prelude::*;

/// A projectile fired by an enemy. Moves in a straight line.
#[derive(Component, Debug)]
pub struct EnemyProjectile {
    pub source: Entity,
    pub damage: f32,
    pub velocity: Vec3,
    /// Seconds until the projectile despawns on its own.
    pub remaining: f32,
}

/// Shared projectile tuning.
#[derive(Resource, Debug, Clone)]
pub struct ProjectileSettings {
    pub lifetime: f32,
    /// Horizontal distance at which a projectile hits the player.
    pub hit_radius: f32,
}

impl Default for ProjectileSettings {
    fn default() -> Self {
        Self {
            lifetime: 5.0,
            hit_radius: 0.5,
        }
    }
}
