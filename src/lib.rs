//! Enemy combat - real-time enemy behaviour for a top-down action game, in Bevy.
//!
//! # Architecture
//!
//! - **Core**: Game states, global events
//! - **Player**: Top-down movement, dash, follow camera
//! - **Combat**: Player weapon, damage and deaths
//! - **Enemies**: Per-enemy combat brain (state machine, attack sequences,
//!   stun/knockback/slow, health) plus the systems that drive it
//! - **Projectiles**: Shots fired by ranged enemies
//!
//! The enemy brain in [`enemies::brain`] never touches the ECS; it can be
//! driven directly from tests with a hand-built [`enemies::GameContext`].

pub mod combat;
pub mod core;
pub mod enemies;
pub mod player;
pub mod projectiles;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct EnemyCombatPlugin;

impl Plugin for EnemyCombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)
            .add_plugins(player::PlayerPlugin)
            .add_plugins(combat::CombatPlugin)
            .add_plugins(enemies::EnemyPlugin)
            .add_plugins(projectiles::ProjectilePlugin)
            // Visuals and audio
            .add_plugins(enemies::EnemyPresentationPlugin);
    }
}
