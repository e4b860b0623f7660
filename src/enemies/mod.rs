//! Enemies module - combat brain, behaviours, spawning and presentation.

mod ai;
pub mod behaviour;
pub mod brain;
mod components;
pub mod context;
pub mod data;
pub mod effects;
pub mod error;
mod events;
pub mod health;
pub mod knockback;
pub mod output;
mod plugin;
mod presentation;
pub mod scheduler;
pub mod sensor;
mod spawning;
pub mod stats;

pub use brain::EnemyBrain;
pub use components::*;
pub use context::{Ability, EnemyRng, GameContext, StatKind, Surroundings, ThornsConfig, TickContext};
pub use data::{EnemyDefinition, EnemyRegistry};
pub use error::EnemyDataError;
pub use events::*;
pub use output::{AnimationClip, EnemyOutput, EnemySound, IndicatorDisplay, IndicatorKind};
pub use plugin::EnemyPlugin;
pub use presentation::EnemyPresentationPlugin;
pub use spawning::spawn_enemy;

#[cfg(test)]
mod tests;
