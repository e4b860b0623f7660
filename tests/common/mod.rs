//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides the ECS runtime and time.
//! - `StatesPlugin` drives `GameState`.
//! - presentation and physics stay out; enemy definitions are inserted by hand.

#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use enemy_combat::combat::CombatPlugin;
use enemy_combat::core::{CorePlugin, GameState};
use enemy_combat::enemies::{EnemyDefinition, EnemyPlugin, EnemyRegistry, EnemyRng};
use enemy_combat::player::PlayerPlugin;
use enemy_combat::projectiles::ProjectilePlugin;

/// Seconds advanced by every `app.update()`.
pub const FRAME: f32 = 0.05;

pub const GRUNT: &str = r#"
    (
        name: "Grunt",
        behaviour: Melee,
        move_speed: (base: 2.0),
        damage: (base: 10.0),
        max_health: (base: 30.0),
        combat: (
            engage_range: 3.0,
            disengage_range: 5.0,
            exhaustion_time: 1.0,
            successful_attack_cooldown: 0.8,
            first_attack_delay: 0.5,
        ),
        animations: {
            WindUp: 0.3,
            WindDown: 0.2,
        },
    )
"#;

pub const HUSK: &str = r#"
    (
        name: "Husk",
        behaviour: VengefulMelee(death_spawn: "grunt"),
        move_speed: (base: 2.0),
        damage: (base: 5.0),
        max_health: (base: 10.0),
        combat: (
            engage_range: 3.0,
            disengage_range: 5.0,
            exhaustion_time: 1.0,
            successful_attack_cooldown: 0.8,
            first_attack_delay: 0.5,
        ),
    )
"#;

pub const SPITTER: &str = r#"
    (
        name: "Spitter",
        behaviour: ProjectileRanged((
            projectile_speed: (base: 10.0),
            max_ammo: 2,
            burst: 2,
            burst_interval: 0.1,
            projectiles_per_shot: (1, 1),
        )),
        move_speed: (base: 1.0),
        damage: (base: 4.0),
        max_health: (base: 20.0),
        combat: (
            engage_range: 8.0,
            disengage_range: 10.0,
            exhaustion_time: 1.0,
            successful_attack_cooldown: 1.0,
            first_attack_delay: 0.0,
            freeze_in_range: true,
        ),
        animations: {
            WindUp: 0.2,
            WindDown: 0.2,
        },
    )
"#;

fn test_registry() -> EnemyRegistry {
    let mut registry = EnemyRegistry::default();
    for (enemy_type, source) in [("grunt", GRUNT), ("husk", HUSK), ("spitter", SPITTER)] {
        let definition: EnemyDefinition = ron::from_str(source).unwrap();
        registry.insert(enemy_type, definition);
    }
    registry
}

pub fn app_headless() -> App {
    let mut app = App::new();

    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            FRAME,
        )))
        .add_plugins((
            CorePlugin,
            PlayerPlugin,
            CombatPlugin,
            EnemyPlugin,
            ProjectilePlugin,
        ))
        .insert_resource(test_registry())
        .insert_resource(EnemyRng::seeded(11));

    app
}

/// Run until the game reaches `InGame`.
pub fn enter_game(app: &mut App) {
    for _ in 0..10 {
        app.update();
        if *app.world().resource::<State<GameState>>().get() == GameState::InGame {
            return;
        }
    }
    panic!("game never left the loading state");
}

/// Advance the app by roughly `seconds`.
pub fn run_for(app: &mut App, seconds: f32) {
    for _ in 0..(seconds / FRAME).round() as usize {
        app.update();
    }
}
