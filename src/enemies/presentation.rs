//! Enemy presentation: bodies, sounds, status indicators, hit flash and death fade.
//!
//! Nothing here feeds back into combat. Headless tests leave this plugin out.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use bevy_kira_audio::prelude::*;

use super::brain::EnemyBrain;
use super::components::{ActiveIndicators, DeathFade, Enemy, EnemyAnimation, EnemyAppearance};
use super::events::{EnemySoundEvent, LootDropEvent};
use super::output::{AnimationClip, DeathPhase, IndicatorKind};
use crate::core::GameState;

/// Visual child of an enemy. Owns the material that flashes and fades.
#[derive(Component)]
pub struct EnemyBody;

/// Dropped loot marker.
#[derive(Component)]
pub struct Loot;

pub struct EnemyPresentationPlugin;

impl Plugin for EnemyPresentationPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<AudioPlugin>() {
            app.add_plugins(AudioPlugin);
        }
        app.add_systems(
            Update,
            (
                attach_enemy_bodies,
                play_enemy_sounds,
                update_body_pose,
                update_body_alpha,
                draw_indicators,
                spawn_loot,
            )
                .run_if(in_state(GameState::InGame)),
        );
    }
}

fn attach_enemy_bodies(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    query: Query<(Entity, &EnemyAppearance), Added<Enemy>>,
) {
    for (entity, appearance) in query.iter() {
        let body = match &appearance.model_path {
            Some(path) => commands
                .spawn((
                    EnemyBody,
                    SceneRoot(asset_server.load(format!("{}#Scene0", path))),
                    Transform::from_xyz(0.0, -appearance.half_height - appearance.radius, 0.0)
                        .with_scale(Vec3::splat(appearance.scale)),
                ))
                .id(),
            None => commands
                .spawn((
                    EnemyBody,
                    Mesh3d(meshes.add(Capsule3d::new(appearance.radius, appearance.half_height * 2.0))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: Color::srgb(0.6, 0.15, 0.15),
                        alpha_mode: AlphaMode::Blend,
                        ..default()
                    })),
                    Transform::from_scale(Vec3::splat(appearance.scale)),
                ))
                .id(),
        };
        commands.entity(entity).add_child(body);
    }
}

fn play_enemy_sounds(
    asset_server: Res<AssetServer>,
    audio: Res<Audio>,
    mut sound_events: EventReader<EnemySoundEvent>,
) {
    for event in sound_events.read() {
        audio.play(asset_server.load(event.sound.asset_path()));
    }
}

/// Lean back during windup, slump when exhausted, tip over while dying.
fn update_body_pose(
    enemy_query: Query<(&EnemyAnimation, Option<&DeathFade>, &Children), With<Enemy>>,
    mut body_query: Query<&mut Transform, With<EnemyBody>>,
) {
    for (animation, fade, children) in enemy_query.iter() {
        let tilt = match (fade, animation.0) {
            (Some(fade), _) => match fade.phase {
                DeathPhase::Fade => ease_in_out(fade.progress) * FRAC_PI_2,
                DeathPhase::Vanish => FRAC_PI_2,
            },
            (None, AnimationClip::WindUp) => -0.25,
            (None, AnimationClip::WindDown) => 0.3,
            (None, AnimationClip::Exhausted) => 0.5,
            (None, AnimationClip::Stunned) => 0.15,
            (None, AnimationClip::Walk) => 0.0,
        };
        for child in children.iter() {
            if let Ok(mut transform) = body_query.get_mut(*child) {
                transform.rotation = Quat::from_rotation_x(tilt);
            }
        }
    }
}

fn update_body_alpha(
    enemy_query: Query<(&EnemyBrain, Option<&DeathFade>, &Children), With<Enemy>>,
    body_query: Query<&MeshMaterial3d<StandardMaterial>, With<EnemyBody>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (brain, fade, children) in enemy_query.iter() {
        let alpha = match fade {
            Some(DeathFade {
                phase: DeathPhase::Fade,
                progress,
            }) => 1.0 - 0.5 * ease_in_out(*progress),
            Some(DeathFade {
                phase: DeathPhase::Vanish,
                progress,
            }) => 0.5 * (1.0 - progress),
            None => brain.flash_alpha(),
        };
        for child in children.iter() {
            let Ok(material) = body_query.get(*child) else {
                continue;
            };
            if let Some(material) = materials.get_mut(&material.0) {
                material.base_color.set_alpha(alpha);
            }
        }
    }
}

fn indicator_color(kind: IndicatorKind) -> Color {
    match kind {
        IndicatorKind::Attacking => Color::srgb(1.0, 0.2, 0.1),
        IndicatorKind::Exhausted => Color::srgb(0.4, 0.4, 1.0),
        IndicatorKind::Stunned => Color::srgb(1.0, 0.9, 0.2),
        IndicatorKind::Slowed => Color::srgb(0.3, 0.8, 1.0),
        IndicatorKind::Death => Color::srgb(0.8, 0.8, 0.8),
    }
}

/// Stack a marker per active indicator above the enemy's head.
fn draw_indicators(mut gizmos: Gizmos, query: Query<(&GlobalTransform, &ActiveIndicators)>) {
    for (transform, indicators) in query.iter() {
        let head = transform.translation() + Vec3::Y * 1.4;
        for (slot, (kind, _)) in indicators.entries.iter().enumerate() {
            let center = head + Vec3::Y * (slot as f32 * 0.3);
            let color = indicator_color(*kind);
            gizmos.line(center - Vec3::X * 0.12, center + Vec3::X * 0.12, color);
            gizmos.line(center - Vec3::Z * 0.12, center + Vec3::Z * 0.12, color);
            gizmos.line(center, center + Vec3::Y * 0.2, color);
        }
    }
}

fn spawn_loot(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut loot_events: EventReader<LootDropEvent>,
) {
    for event in loot_events.read() {
        info!("Loot dropped at {:?}", event.position);
        commands.spawn((
            Loot,
            Mesh3d(meshes.add(Cuboid::new(0.3, 0.3, 0.3))),
            MeshMaterial3d(materials.add(Color::srgb(0.9, 0.75, 0.2))),
            Transform::from_translation(event.position),
        ));
    }
}

fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
