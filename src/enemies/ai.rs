//! Enemy AI systems: feed each [`EnemyBrain`] and carry out what it asks for.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::brain::EnemyBrain;
use super::components::{
    ActiveIndicators, DeathFade, Enemy, EnemyAnimation, EnemyMovement, EnemyType,
};
use super::context::{EnemyRng, GameContext, Surroundings, TickContext};
use super::events::*;
use super::output::{EnemyOutput, IndicatorDisplay};
use crate::core::DamageEvent;
use crate::player::{Dash, Player};

type PlayerView = (&'static Transform, Option<&'static Dash>);

fn surroundings(enemy: &Transform, player: &Transform, dash: Option<&Dash>) -> Surroundings {
    Surroundings {
        enemy_position: enemy.translation,
        player_position: player.translation,
        player_dashing: dash.is_some_and(Dash::is_dashing),
    }
}

/// Physics tick: range sensing, knockback travel and attack attempts.
pub fn enemy_fixed_tick(
    time: Res<Time>,
    game: Res<GameContext>,
    mut rng: ResMut<EnemyRng>,
    player_query: Query<PlayerView, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<(&Transform, &mut EnemyBrain), With<Enemy>>,
) {
    let Ok((player_transform, dash)) = player_query.get_single() else {
        return;
    };
    let dt = time.delta_secs();

    for (transform, mut brain) in enemy_query.iter_mut() {
        let mut ctx = TickContext {
            game: &game,
            rng: &mut rng.0,
            view: surroundings(transform, player_transform, dash),
        };
        brain.fixed_update(dt, &mut ctx);
    }
}

/// Frame tick: stun, cooldown, attack, reload, flash, slows and death.
pub fn enemy_frame_tick(
    time: Res<Time>,
    game: Res<GameContext>,
    mut rng: ResMut<EnemyRng>,
    player_query: Query<PlayerView, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<(&Transform, &mut EnemyBrain), With<Enemy>>,
) {
    let Ok((player_transform, dash)) = player_query.get_single() else {
        return;
    };
    let dt = time.delta_secs();

    for (transform, mut brain) in enemy_query.iter_mut() {
        let mut ctx = TickContext {
            game: &game,
            rng: &mut rng.0,
            view: surroundings(transform, player_transform, dash),
        };
        brain.update(dt, &mut ctx);
    }
}

/// Walk towards the player and turn to face them.
pub fn enemy_chase(
    time: Res<Time>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<(&mut Transform, &EnemyBrain, &EnemyMovement), (With<Enemy>, Without<Player>)>,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };
    let player_pos = player_transform.translation;

    for (mut transform, brain, movement) in enemy_query.iter_mut() {
        let enemy_pos = transform.translation;
        let direction = Vec3::new(player_pos.x - enemy_pos.x, 0.0, player_pos.z - enemy_pos.z);
        let distance = direction.length();

        if brain.can_move() && distance > movement.stopping_distance {
            let step = (brain.move_speed() * time.delta_secs()).min(distance - movement.stopping_distance);
            transform.translation += direction.normalize_or_zero() * step;
        }

        if brain.faces_player() && distance > 0.1 {
            let look_target = Vec3::new(player_pos.x, transform.translation.y, player_pos.z);
            transform.look_at(look_target, Vec3::Y);
            // Rotate 180° because model's forward is +Z, not -Z
            transform.rotate_y(std::f32::consts::PI);
        }
    }
}

/// Route hits aimed at enemies into their brains.
pub fn receive_damage(
    mut damage_events: EventReader<DamageEvent>,
    mut enemy_query: Query<&mut EnemyBrain, With<Enemy>>,
) {
    for event in damage_events.read() {
        let Ok(mut brain) = enemy_query.get_mut(event.target) else {
            continue;
        };
        if brain.is_invulnerable() {
            debug!("{:?} is invulnerable, ignoring hit", event.target);
            continue;
        }
        brain.take_damage(event.amount, true, true);
    }
}

pub fn receive_stuns(
    mut stun_events: EventReader<StunEvent>,
    mut enemy_query: Query<&mut EnemyBrain, With<Enemy>>,
) {
    for event in stun_events.read() {
        if let Ok(mut brain) = enemy_query.get_mut(event.target) {
            brain.stun(event.duration);
        }
    }
}

pub fn receive_slows(
    mut slow_events: EventReader<SlowEvent>,
    mut enemy_query: Query<&mut EnemyBrain, With<Enemy>>,
) {
    for event in slow_events.read() {
        if let Ok(mut brain) = enemy_query.get_mut(event.target) {
            brain.apply_slow(event.reduction, event.duration);
        }
    }
}

pub fn receive_knockbacks(
    mut knockback_events: EventReader<KnockbackEvent>,
    mut enemy_query: Query<&mut EnemyBrain, With<Enemy>>,
) {
    for event in knockback_events.read() {
        let Ok(mut brain) = enemy_query.get_mut(event.target) else {
            continue;
        };
        match event.direction {
            Some(direction) => {
                brain.apply_knockback(event.initial_velocity, event.distance, direction)
            }
            None => brain.apply_knockback_from_player(event.initial_velocity, event.distance),
        }
    }
}

/// A knocked-back enemy that hits something stops sliding.
pub fn stop_knockback_on_collision(
    mut collision_events: EventReader<CollisionEvent>,
    mut enemy_query: Query<&mut EnemyBrain, With<Enemy>>,
) {
    for event in collision_events.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };
        for entity in [*a, *b] {
            if let Ok(mut brain) = enemy_query.get_mut(entity) {
                if brain.knockback_velocity().is_some() {
                    debug!("{:?} knockback stopped by collision", entity);
                    brain.cancel_knockback();
                }
            }
        }
    }
}

/// Events produced while draining brain outputs.
#[derive(SystemParam)]
pub struct OutputWriters<'w> {
    damage: EventWriter<'w, DamageEvent>,
    projectiles: EventWriter<'w, FireProjectileEvent>,
    spawns: EventWriter<'w, SpawnEnemyEvent>,
    removals: EventWriter<'w, EnemyRemovedEvent>,
    loot: EventWriter<'w, LootDropEvent>,
    sounds: EventWriter<'w, EnemySoundEvent>,
}

/// Carry out everything the brains queued since the last drain.
pub fn dispatch_enemy_outputs(
    mut commands: Commands,
    player_query: Query<Entity, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (
            Entity,
            &EnemyType,
            &mut EnemyBrain,
            &mut Transform,
            &mut ActiveIndicators,
            &mut EnemyAnimation,
        ),
        With<Enemy>,
    >,
    mut writers: OutputWriters,
) {
    let player = player_query.get_single().ok();

    for (entity, enemy_type, mut brain, mut transform, mut indicators, mut animation) in
        enemy_query.iter_mut()
    {
        for output in brain.drain_outputs() {
            match output {
                EnemyOutput::Animation(clip) => animation.0 = clip,
                EnemyOutput::Sound(sound) => {
                    writers.sounds.send(EnemySoundEvent { entity, sound });
                }
                EnemyOutput::ShowIndicator { kind, display } => {
                    let timer = match display {
                        IndicatorDisplay::Persistent => None,
                        IndicatorDisplay::For(seconds) => Some(seconds),
                        IndicatorDisplay::Once => Some(ONCE_INDICATOR_SECONDS),
                    };
                    indicators.entries.retain(|(shown, _)| *shown != kind);
                    indicators.entries.push((kind, timer));
                }
                EnemyOutput::StopIndicator(kind) => {
                    indicators.entries.retain(|(shown, _)| *shown != kind);
                }
                EnemyOutput::DamagePlayer(amount) => {
                    if let Some(target) = player {
                        writers.damage.send(DamageEvent {
                            target,
                            source: entity,
                            amount,
                        });
                    }
                }
                EnemyOutput::FireProjectile {
                    origin,
                    direction,
                    speed,
                    damage,
                } => {
                    writers.projectiles.send(FireProjectileEvent {
                        source: entity,
                        origin,
                        direction,
                        speed,
                        damage,
                    });
                }
                EnemyOutput::Displace(offset) => transform.translation += offset,
                EnemyOutput::DeathVisual { phase, progress } => {
                    commands.entity(entity).insert(DeathFade { phase, progress });
                }
                EnemyOutput::SpawnEnemy {
                    enemy_type,
                    position,
                } => {
                    writers.spawns.send(SpawnEnemyEvent {
                        enemy_type,
                        position,
                    });
                }
                EnemyOutput::DropLoot { position } => {
                    writers.loot.send(LootDropEvent { position });
                }
                EnemyOutput::Removed => {
                    info!("{} {:?} removed", enemy_type.0, entity);
                    writers.removals.send(EnemyRemovedEvent {
                        entity,
                        enemy_type: enemy_type.0.clone(),
                    });
                    commands.entity(entity).despawn_recursive();
                }
            }
        }
    }
}

/// How long a one-shot indicator stays up.
pub const ONCE_INDICATOR_SECONDS: f32 = 0.6;

/// Count down timed indicators and drop the expired ones.
pub fn tick_indicators(time: Res<Time>, mut query: Query<&mut ActiveIndicators>) {
    let dt = time.delta_secs();
    for mut indicators in query.iter_mut() {
        for (_, timer) in indicators.entries.iter_mut() {
            if let Some(remaining) = timer {
                *remaining -= dt;
            }
        }
        indicators
            .entries
            .retain(|(_, timer)| timer.map_or(true, |remaining| remaining > 0.0));
    }
}
