//! Combat-related components.

use bevy::prelude::*;

// Re-export from core to avoid duplication
pub use crate::core::{DamageEvent, DeathEvent};

/// Component for entities that can take damage.
///
/// Enemies keep their health inside their brain; this is for the player and
/// anything else that just needs a number.
#[derive(Component, Debug)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.current);
        self.current -= actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// The player's weapon. Damage comes from the player's damage stat.
#[derive(Component, Debug, Clone)]
pub struct Weapon {
    /// Attack range in units
    pub reach: f32,
    /// Attack cooldown in seconds
    pub attack_cooldown: f32,
    pub knockback_velocity: f32,
    pub knockback_distance: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            reach: 2.0,
            attack_cooldown: 0.4,
            knockback_velocity: 8.0,
            knockback_distance: 1.5,
        }
    }
}

/// Time left until the weapon can swing again.
#[derive(Component, Default, Debug)]
pub struct WeaponCooldown(pub f32);

/// Marker component for entities that have died (prevents multiple death events).
#[derive(Component)]
pub struct Dead;
