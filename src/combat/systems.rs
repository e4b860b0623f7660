//! Combat systems - player attack, damage handling, deaths.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::core::GameState;
use crate::enemies::{Enemy, GameContext, KnockbackEvent, StatKind};
use crate::player::Player;

/// System set ordering for combat.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    Input,
    Damage,
}

/// Configure combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app.configure_sets(
        Update,
        (CombatSet::Input, CombatSet::Damage)
            .chain()
            .run_if(in_state(GameState::InGame)),
    )
    .add_systems(
        Update,
        (
            tick_weapon_cooldowns,
            player_attack.run_if(resource_exists::<ButtonInput<MouseButton>>),
        )
            .chain()
            .in_set(CombatSet::Input),
    )
    .add_systems(
        Update,
        (apply_damage, check_deaths).chain().in_set(CombatSet::Damage),
    );
}

fn tick_weapon_cooldowns(time: Res<Time>, mut query: Query<&mut WeaponCooldown>) {
    for mut cooldown in query.iter_mut() {
        cooldown.0 = (cooldown.0 - time.delta_secs()).max(0.0);
    }
}

/// Swing the player's weapon on left click.
///
/// Every enemy inside a sphere in front of the player is damaged by the
/// player's damage stat and knocked away.
fn player_attack(
    mouse: Res<ButtonInput<MouseButton>>,
    game: Res<GameContext>,
    mut query: Query<(Entity, &Transform, &Weapon, &mut WeaponCooldown), With<Player>>,
    enemy_query: Query<Entity, With<Enemy>>,
    rapier_context: Query<&RapierContext>,
    mut damage_events: EventWriter<DamageEvent>,
    mut knockback_events: EventWriter<KnockbackEvent>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok((player_entity, transform, weapon, mut cooldown)) = query.get_single_mut() else {
        return;
    };
    if cooldown.0 > 0.0 {
        return;
    }
    cooldown.0 = weapon.attack_cooldown;

    let Ok(context) = rapier_context.get_single() else {
        return;
    };

    let damage = game.stat(StatKind::Damage);
    let direction = transform.forward().as_vec3();
    let sphere_center = transform.translation + direction * (weapon.reach * 0.5);
    let shape = Collider::ball(weapon.reach * 0.6);

    let mut hits = Vec::new();
    context.intersections_with_shape(
        sphere_center,
        Quat::IDENTITY,
        &shape,
        QueryFilter::default().exclude_collider(player_entity),
        |hit_entity| {
            if enemy_query.get(hit_entity).is_ok() {
                hits.push(hit_entity);
            }
            true
        },
    );

    for target in hits {
        damage_events.send(DamageEvent {
            target,
            source: player_entity,
            amount: damage,
        });
        knockback_events.send(KnockbackEvent {
            target,
            initial_velocity: weapon.knockback_velocity,
            distance: weapon.knockback_distance,
            direction: None,
        });
    }
}

/// Apply damage to entities with a [`Health`] component.
fn apply_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    mut health_query: Query<(&mut Health, Option<&Dead>)>,
    mut death_events: EventWriter<DeathEvent>,
) {
    // Track entities that died this frame to avoid duplicate death events
    let mut died_this_frame = std::collections::HashSet::new();

    for event in damage_events.read() {
        if died_this_frame.contains(&event.target) {
            continue;
        }

        let Ok((mut health, dead)) = health_query.get_mut(event.target) else {
            continue;
        };
        if dead.is_some() {
            continue;
        }

        health.take_damage(event.amount);
        debug!(
            "{:?} took {} damage, {} left",
            event.target, event.amount, health.current
        );

        if health.is_dead() {
            died_this_frame.insert(event.target);
            commands.entity(event.target).insert(Dead);
            death_events.send(DeathEvent {
                entity: event.target,
                killed_by: Some(event.source),
            });
        }
    }
}

/// React to deaths of [`Health`] entities.
fn check_deaths(
    mut commands: Commands,
    mut death_events: EventReader<DeathEvent>,
    player_query: Query<Entity, With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for event in death_events.read() {
        if player_query.get(event.entity).is_ok() {
            info!("Player died! Transitioning to Game Over...");
            next_state.set(GameState::GameOver);
        } else {
            commands.entity(event.entity).despawn_recursive();
        }
    }
}
