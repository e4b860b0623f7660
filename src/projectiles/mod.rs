//! Projectiles module - shots fired by ranged enemies.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::ProjectilePlugin;
