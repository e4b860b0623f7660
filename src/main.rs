//! Enemy Combat - Arena demo
//!
//! Controls:
//! - WASD: Move
//! - Space: Dash
//! - Left click: Attack
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use enemy_combat::core::GameState;
use enemy_combat::enemies::{Enemy, EnemyRemovedEvent, GameContext, SpawnEnemyEvent};
use enemy_combat::player::{spawn_player, PlayerCamera};

/// Enemy types and offsets of one wave.
const WAVE: [(&str, Vec3); 4] = [
    ("grunt", Vec3::new(8.0, 1.0, 0.0)),
    ("brute", Vec3::new(-8.0, 1.0, 2.0)),
    ("husk", Vec3::new(0.0, 1.0, -9.0)),
    ("spitter", Vec3::new(6.0, 1.0, 8.0)),
];

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Enemy Combat".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        // Our game plugin
        .add_plugins(enemy_combat::EnemyCombatPlugin)
        .add_systems(OnEnter(GameState::InGame), setup_arena.run_if(arena_missing))
        .add_systems(Update, next_round.run_if(in_state(GameState::InGame)))
        .run();
}

/// Marker for the arena floor.
#[derive(Component)]
struct ArenaFloor;

fn arena_missing(query: Query<(), With<ArenaFloor>>) -> bool {
    query.is_empty()
}

fn setup_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut spawn_events: EventWriter<SpawnEnemyEvent>,
) {
    commands.spawn((
        ArenaFloor,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(40.0, 40.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.25, 0.25, 0.28))),
        Transform::default(),
        RigidBody::Fixed,
        Collider::cuboid(20.0, 0.05, 20.0),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        PlayerCamera,
        Camera3d::default(),
        Transform::from_xyz(0.0, 12.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    spawn_player(&mut commands, Vec3::new(0.0, 1.0, 0.0));

    for (enemy_type, position) in WAVE {
        spawn_events.send(SpawnEnemyEvent {
            enemy_type: enemy_type.to_string(),
            position,
        });
    }
}

/// Start the next, tougher round once every enemy is gone.
fn next_round(
    mut removed_events: EventReader<EnemyRemovedEvent>,
    enemy_query: Query<(), With<Enemy>>,
    mut game: ResMut<GameContext>,
    mut spawn_events: EventWriter<SpawnEnemyEvent>,
) {
    if removed_events.read().count() == 0 || !enemy_query.is_empty() {
        return;
    }

    game.round += 1;
    info!("Round {}", game.round);
    for (enemy_type, position) in WAVE {
        spawn_events.send(SpawnEnemyEvent {
            enemy_type: enemy_type.to_string(),
            position,
        });
    }
}
