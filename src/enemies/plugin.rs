//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;

use super::ai;
use super::context::{EnemyRng, GameContext};
use super::data::{load_enemy_definitions, EnemyRegistry};
use super::events::*;
use super::spawning::handle_spawn_requests;
use crate::core::GameState;

/// Enemy plugin - definitions, spawning, and the combat brain ticks.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnemyRegistry>()
            .init_resource::<GameContext>()
            .init_resource::<EnemyRng>()
            .add_event::<StunEvent>()
            .add_event::<SlowEvent>()
            .add_event::<KnockbackEvent>()
            .add_event::<SpawnEnemyEvent>()
            .add_event::<EnemyRemovedEvent>()
            .add_event::<LootDropEvent>()
            .add_event::<FireProjectileEvent>()
            .add_event::<EnemySoundEvent>()
            // Also registered by the physics plugin; needed when running without it
            .add_event::<CollisionEvent>()
            .add_systems(
                OnEnter(GameState::InGame),
                load_enemy_definitions
                    .run_if(|registry: Res<EnemyRegistry>| registry.definitions.is_empty()),
            )
            // Range sensing and knockback run at the physics rate
            .add_systems(
                FixedUpdate,
                (ai::enemy_fixed_tick, ai::dispatch_enemy_outputs)
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(
                Update,
                (
                    handle_spawn_requests,
                    ai::receive_damage,
                    ai::receive_stuns,
                    ai::receive_slows,
                    ai::receive_knockbacks,
                    ai::stop_knockback_on_collision,
                    ai::enemy_frame_tick,
                    ai::enemy_chase,
                    ai::dispatch_enemy_outputs,
                    ai::tick_indicators,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            );
    }
}
