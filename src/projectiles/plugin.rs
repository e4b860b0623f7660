//! Projectile plugin - spawning, flight and hits.

use bevy::prelude::*;

use super::components::ProjectileSettings;
use super::systems;
use crate::core::GameState;

pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProjectileSettings>()
            .add_systems(
                Update,
                (
                    systems::spawn_projectiles,
                    systems::attach_projectile_meshes
                        .run_if(resource_exists::<Assets<Mesh>>)
                        .run_if(resource_exists::<Assets<StandardMaterial>>),
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(
                FixedUpdate,
                (
                    systems::move_projectiles,
                    systems::hit_player,
                    systems::expire_projectiles,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            );
    }
}
