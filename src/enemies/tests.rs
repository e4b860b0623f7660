//! Scenario tests for the enemy combat brain, driven tick by tick.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::behaviour::Reload;
use super::data::tests::GRUNT;
use super::data::BehaviourConfig;
use super::output::{AnimationClip, DeathPhase};
use super::*;

const DT: f32 = 0.1;

fn grunt() -> EnemyDefinition {
    ron::from_str(GRUNT).unwrap()
}

fn spitter(extra: &str) -> EnemyDefinition {
    let mut definition = grunt();
    definition.combat.first_attack_delay = 0.0;
    definition.behaviour = ron::from_str(&format!(
        "ProjectileRanged((projectile_speed: (base: 8.0), max_ammo: 3, burst: 3, burst_interval: 0.1, projectiles_per_shot: (1, 1){}))",
        extra
    ))
    .unwrap();
    definition
}

/// One enemy, one player and a record of everything the enemy asked for.
struct Arena {
    brain: EnemyBrain,
    game: GameContext,
    rng: EnemyRng,
    view: Surroundings,
    outputs: Vec<EnemyOutput>,
}

impl Arena {
    fn new(definition: EnemyDefinition) -> Self {
        Self::with_game(definition, GameContext::default())
    }

    fn with_game(definition: EnemyDefinition, game: GameContext) -> Self {
        Self {
            brain: EnemyBrain::from_definition(&definition, game.round),
            game,
            rng: EnemyRng::seeded(7),
            view: Surroundings {
                enemy_position: Vec3::ZERO,
                player_position: Vec3::new(20.0, 0.0, 0.0),
                player_dashing: false,
            },
            outputs: Vec::new(),
        }
    }

    fn place_player(&mut self, distance: f32) {
        self.view.player_position = self.view.enemy_position + Vec3::new(distance, 0.0, 0.0);
    }

    fn step(&mut self) {
        let mut ctx = TickContext {
            game: &self.game,
            rng: &mut self.rng.0,
            view: self.view,
        };
        self.brain.fixed_update(DT, &mut ctx);
        self.brain.update(DT, &mut ctx);
        self.flush();
    }

    fn run(&mut self, seconds: f32) {
        for _ in 0..(seconds / DT).round() as usize {
            self.step();
        }
    }

    /// Step until `done` holds, giving up after `max_seconds`.
    fn run_until(&mut self, max_seconds: f32, done: impl Fn(&EnemyBrain) -> bool) -> bool {
        for _ in 0..(max_seconds / DT).round() as usize {
            if done(&self.brain) {
                return true;
            }
            self.step();
        }
        done(&self.brain)
    }

    fn flush(&mut self) {
        self.outputs.extend(self.brain.drain_outputs());
    }

    fn count(&mut self, pred: impl Fn(&EnemyOutput) -> bool) -> usize {
        self.flush();
        self.outputs.iter().filter(|output| pred(output)).count()
    }

    fn damage_dealt(&mut self) -> Vec<f32> {
        self.flush();
        self.outputs
            .iter()
            .filter_map(|output| match output {
                EnemyOutput::DamagePlayer(amount) => Some(*amount),
                _ => None,
            })
            .collect()
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn sensor_uses_hysteresis() {
    let mut arena = Arena::new(grunt());

    arena.place_player(4.0);
    arena.step();
    assert!(!arena.brain.is_player_in_range());

    arena.place_player(2.0);
    arena.step();
    assert!(arena.brain.is_player_in_range());

    arena.place_player(4.0);
    arena.step();
    assert!(arena.brain.is_player_in_range());

    arena.place_player(6.0);
    arena.step();
    assert!(!arena.brain.is_player_in_range());
}

#[test]
fn distance_ignores_height() {
    let mut arena = Arena::new(grunt());
    arena.view.player_position = Vec3::new(2.0, 10.0, 0.0);
    arena.step();
    assert!(arena.brain.is_player_in_range());
}

#[test]
fn melee_attack_lands_after_delay_and_windup() {
    let mut arena = Arena::new(grunt());
    arena.place_player(2.0);

    arena.step();
    assert_eq!(arena.brain.state(), CombatState::Attacking);
    assert!(arena.brain.indicator_shown(IndicatorKind::Attacking));
    assert!(arena.brain.has_done_first_attack());

    // First attack delay plus most of the windup
    arena.run(0.6);
    assert!(arena.damage_dealt().is_empty());

    arena.run(0.8);
    assert_eq!(arena.damage_dealt(), vec![10.0]);
    assert_eq!(arena.brain.state(), CombatState::Walking);
    assert!(arena.brain.is_on_cooldown());
    assert!(!arena.brain.can_attack());
    assert_eq!(
        arena.count(|o| *o == EnemyOutput::Sound(EnemySound::Attack)),
        1
    );

    // The next attack skips the first attack delay
    assert!(arena.run_until(1.5, |brain| brain.can_attack() || brain.is_attacking()));
    arena.run(0.6);
    assert_eq!(arena.damage_dealt().len(), 2);
}

#[test]
fn leaving_range_during_windup_exhausts() {
    let mut arena = Arena::new(grunt());
    arena.place_player(2.0);
    assert!(arena.run_until(1.0, EnemyBrain::attack_performed));

    arena.place_player(6.0);
    assert!(arena.run_until(1.0, |brain| brain.state() == CombatState::Exhausted));
    assert!(arena.damage_dealt().is_empty());
    assert!(arena.brain.indicator_shown(IndicatorKind::Exhausted));
    assert!(!arena.brain.indicator_shown(IndicatorKind::Attacking));
    assert!(!arena.brain.can_move());
    assert!(!arena.brain.faces_player());

    arena.run(1.2);
    assert_eq!(arena.brain.state(), CombatState::Walking);
    assert!(arena.brain.can_attack());
    assert!(arena.brain.can_move());
    assert!(!arena.brain.indicator_shown(IndicatorKind::Exhausted));
}

#[test]
fn leaving_range_before_windup_recovers_without_exhaustion() {
    let mut arena = Arena::new(grunt());
    arena.place_player(2.0);
    arena.step();
    assert!(arena.brain.is_attacking());
    assert!(!arena.brain.attack_performed());

    arena.place_player(6.0);
    arena.step();
    assert!(!arena.brain.is_attacking());
    assert_eq!(arena.brain.state(), CombatState::Walking);
    assert!(arena.brain.can_attack());
    assert_eq!(
        arena.count(|o| matches!(
            o,
            EnemyOutput::ShowIndicator {
                kind: IndicatorKind::Exhausted,
                ..
            }
        )),
        0
    );
}

#[test]
fn dash_dodge_makes_the_attack_miss() {
    let game = GameContext::default().with_ability(Ability::DashInvulnerability);
    let mut arena = Arena::with_game(grunt(), game);
    arena.place_player(2.0);
    arena.view.player_dashing = true;

    assert!(arena.run_until(2.0, |brain| brain.state() == CombatState::Exhausted));
    assert!(arena.damage_dealt().is_empty());
}

#[test]
fn dashing_without_the_ability_still_gets_hit() {
    let mut arena = Arena::new(grunt());
    arena.place_player(2.0);
    arena.view.player_dashing = true;

    arena.run(1.4);
    assert_eq!(arena.damage_dealt(), vec![10.0]);
}

#[test]
fn stun_mid_windup_cancels_the_attack() {
    let mut arena = Arena::new(grunt());
    arena.place_player(2.0);
    assert!(arena.run_until(1.0, EnemyBrain::attack_performed));

    arena.brain.stun(2.0);
    assert_eq!(arena.brain.state(), CombatState::Stunned);
    assert!(!arena.brain.is_attacking());
    assert!(!arena.brain.can_attack());
    assert!(!arena.brain.can_move());
    assert!(arena.brain.indicator_shown(IndicatorKind::Stunned));
    assert!(!arena.brain.indicator_shown(IndicatorKind::Attacking));

    arena.place_player(6.0);
    arena.run(1.5);
    assert_eq!(arena.brain.state(), CombatState::Stunned);

    arena.run(1.0);
    assert_eq!(arena.brain.state(), CombatState::Walking);
    assert!(arena.brain.can_attack());
    assert!(arena.brain.can_move());
    assert!(!arena.brain.indicator_shown(IndicatorKind::Stunned));
    assert!(arena.damage_dealt().is_empty());
}

#[test]
fn stun_keeps_remaining_cooldown() {
    let mut arena = Arena::new(grunt());
    arena.place_player(2.0);
    assert!(arena.run_until(2.0, EnemyBrain::is_on_cooldown));
    let remaining = arena.brain.tasks.cooldown.get().map(|c| c.remaining);

    arena.brain.stun(0.3);
    assert_eq!(arena.brain.tasks.cooldown.get().map(|c| c.remaining), remaining);

    arena.run(0.5);
    assert_eq!(arena.brain.state(), CombatState::Walking);
    assert!(!arena.brain.can_attack());
    assert!(arena.brain.is_on_cooldown());
}

#[test]
fn stun_can_reset_the_cooldown() {
    let mut definition = grunt();
    definition.combat.stun_resets_attack_cooldown = true;
    let mut arena = Arena::new(definition);
    arena.place_player(2.0);
    assert!(arena.run_until(2.0, EnemyBrain::is_on_cooldown));

    arena.brain.stun(0.3);
    let remaining = arena.brain.tasks.cooldown.get().map(|c| c.remaining);
    assert_eq!(remaining, Some(0.3));
}

#[test]
fn negative_stun_is_ignored() {
    let mut arena = Arena::new(grunt());
    arena.brain.stun(-1.0);
    arena.brain.stun(f32::NAN);
    assert_eq!(arena.brain.state(), CombatState::Walking);
    assert!(!arena.brain.is_stunned());
}

#[test]
fn frozen_enemy_stands_still_in_range() {
    let mut definition = grunt();
    definition.combat.freeze_in_range = true;
    definition.combat.first_attack_delay = 5.0;
    let mut arena = Arena::new(definition);

    assert!(arena.brain.can_move());
    arena.place_player(2.0);
    arena.step();
    assert!(!arena.brain.can_move());

    arena.place_player(6.0);
    arena.step();
    assert!(arena.brain.can_move());
}

#[test]
fn ranged_burst_empties_ammo_and_reloads() {
    let mut arena = Arena::new(spitter(""));
    arena.place_player(2.0);

    assert!(arena.run_until(3.0, EnemyBrain::is_reloading));
    assert_eq!(arena.brain.ammo(), Some(0));
    assert_eq!(arena.brain.state(), CombatState::Exhausted);

    arena.flush();
    let shots: Vec<_> = arena
        .outputs
        .iter()
        .filter_map(|output| match output {
            EnemyOutput::FireProjectile {
                direction,
                speed,
                damage,
                ..
            } => Some((*direction, *speed, *damage)),
            _ => None,
        })
        .collect();
    assert_eq!(shots.len(), 3);
    for (direction, speed, damage) in shots {
        assert!(direction.abs_diff_eq(Vec3::X, 1e-5));
        assert_eq!(speed, 8.0);
        assert_eq!(damage, 10.0);
    }

    assert!(arena.run_until(2.0, |brain| !brain.is_reloading()));
    assert_eq!(arena.brain.ammo(), Some(3));
    assert_eq!(arena.brain.state(), CombatState::Walking);
    assert!(!arena.brain.indicator_shown(IndicatorKind::Exhausted));
}

#[test]
fn ranged_volley_spreads_across_the_arc() {
    let mut definition = spitter(", projectile_arc: 40.0");
    if let BehaviourConfig::ProjectileRanged(config) = &mut definition.behaviour {
        config.projectiles_per_shot = (3, 3);
        config.burst = 1;
    }
    let mut arena = Arena::new(definition);
    arena.place_player(2.0);
    assert!(arena.run_until(2.0, |brain| brain.ammo() == Some(2)));

    arena.flush();
    let angles: Vec<f32> = arena
        .outputs
        .iter()
        .filter_map(|output| match output {
            EnemyOutput::FireProjectile { direction, .. } => {
                Some(direction.angle_between(Vec3::X).to_degrees())
            }
            _ => None,
        })
        .collect();
    assert_eq!(angles.len(), 3);
    assert!(approx(angles[0], 20.0));
    assert!(approx(angles[1], 0.0));
    assert!(approx(angles[2], 20.0));
}

fn shot_directions(arena: &mut Arena) -> Vec<Vec3> {
    arena.flush();
    arena
        .outputs
        .iter()
        .filter_map(|output| match output {
            EnemyOutput::FireProjectile { direction, .. } => Some(*direction),
            _ => None,
        })
        .collect()
}

#[test]
fn ranged_dodged_windup_exhausts_without_firing() {
    let mut arena = Arena::new(spitter(", exhaust_on_dodge_windup: true"));
    arena.place_player(2.0);
    assert!(arena.run_until(1.0, EnemyBrain::attack_performed));

    arena.place_player(10.0);
    assert!(arena.run_until(1.0, |brain| brain.state() == CombatState::Exhausted));
    assert!(arena.brain.indicator_shown(IndicatorKind::Exhausted));
    assert!(!arena.brain.indicator_shown(IndicatorKind::Attacking));
    assert!(!arena.brain.can_move());

    assert!(arena.run_until(2.0, |brain| !brain.is_attacking()));
    assert_eq!(arena.brain.state(), CombatState::Walking);
    assert!(arena.brain.can_move());
    assert!(shot_directions(&mut arena).is_empty());
    assert_eq!(arena.brain.ammo(), Some(3));
}

#[test]
fn ranged_dodged_windup_keeps_firing_movement() {
    let mut arena = Arena::new(spitter(
        ", exhaust_on_dodge_windup: true, can_move_while_firing: true",
    ));
    arena.place_player(2.0);
    assert!(arena.run_until(1.0, EnemyBrain::attack_performed));

    arena.place_player(10.0);
    assert!(arena.run_until(1.0, |brain| brain.state() == CombatState::Exhausted));
    assert!(arena.brain.can_move());
    assert!(shot_directions(&mut arena).is_empty());
}

#[test]
fn ranged_without_dodge_exhaustion_fires_anyway() {
    let mut arena = Arena::new(spitter(""));
    arena.place_player(2.0);
    assert!(arena.run_until(1.0, EnemyBrain::attack_performed));

    arena.place_player(10.0);
    assert!(arena.run_until(2.0, |brain| !brain.is_attacking()));
    assert_eq!(shot_directions(&mut arena).len(), 3);
}

#[test]
fn infinite_ammo_never_reloads() {
    let mut arena = Arena::new(spitter(", infinite_ammo: true"));
    arena.place_player(2.0);
    assert!(arena.run_until(1.0, EnemyBrain::attack_performed));
    assert!(arena.run_until(2.0, |brain| !brain.is_attacking()));

    assert_eq!(shot_directions(&mut arena).len(), 3);
    assert_eq!(arena.brain.ammo(), Some(3));
    assert!(!arena.brain.is_reloading());
    assert_eq!(arena.brain.state(), CombatState::Walking);
}

#[test]
fn aim_follows_the_player_only_when_adjustable() {
    for adjustable in [false, true] {
        let extra = if adjustable {
            ", can_adjust_aim_during_burst: true"
        } else {
            ""
        };
        let mut arena = Arena::new(spitter(extra));
        arena.place_player(2.0);
        assert!(arena.run_until(1.0, |brain| brain.ammo() == Some(2)));

        arena.view.player_position = Vec3::new(0.0, 0.0, 2.0);
        assert!(arena.run_until(2.0, EnemyBrain::is_reloading));

        let shots = shot_directions(&mut arena);
        assert_eq!(shots.len(), 3);
        assert!(shots[0].abs_diff_eq(Vec3::X, 1e-5));
        let last = shots[2];
        if adjustable {
            assert!(last.abs_diff_eq(Vec3::Z, 1e-5));
        } else {
            assert!(last.abs_diff_eq(Vec3::X, 1e-5));
        }
    }
}

#[test]
fn attacking_indicator_can_outlive_the_burst() {
    let mut definition = spitter(", infinite_ammo: true, always_show_attacking_indicator: true");
    definition.combat.first_attack_delay = 1.0;
    let mut arena = Arena::new(definition);
    arena.place_player(2.0);
    arena.step();
    assert!(!arena.brain.attack_performed());
    assert!(arena.brain.indicator_shown(IndicatorKind::Attacking));

    assert!(arena.run_until(2.0, EnemyBrain::attack_performed));
    assert!(arena.run_until(2.0, |brain| !brain.is_attacking()));
    assert!(arena.brain.indicator_shown(IndicatorKind::Attacking));

    let mut arena = Arena::new(spitter(", infinite_ammo: true"));
    arena.place_player(2.0);
    assert!(arena.run_until(1.0, EnemyBrain::attack_performed));
    assert!(arena.brain.indicator_shown(IndicatorKind::Attacking));
    assert!(arena.run_until(2.0, |brain| !brain.is_attacking()));
    assert!(!arena.brain.indicator_shown(IndicatorKind::Attacking));
}

#[test]
fn firing_movement_follows_its_flag() {
    for can_move in [false, true] {
        let extra = if can_move {
            ", can_move_while_firing: true"
        } else {
            ""
        };
        let mut arena = Arena::new(spitter(extra));
        arena.place_player(2.0);
        assert!(arena.run_until(1.0, EnemyBrain::attack_performed));
        assert_eq!(arena.brain.can_move(), can_move);
    }
}

#[test]
fn reload_movement_follows_its_flag() {
    for can_move in [false, true] {
        let extra = if can_move {
            ", can_move_while_reloading: true"
        } else {
            ""
        };
        let mut arena = Arena::new(spitter(extra));
        arena.place_player(2.0);
        assert!(arena.run_until(3.0, EnemyBrain::is_reloading));
        for _ in 0..5 {
            arena.step();
            assert!(arena.brain.is_reloading());
            assert_eq!(arena.brain.can_move(), can_move);
        }
    }
}

#[test]
fn first_ranged_attack_waits_for_random_extra_delay() {
    let jitter: f32 = StdRng::seed_from_u64(7).gen_range(0.0..=5.0);
    let mut arena = Arena::new(spitter(", attack_randomness_range: 5.0"));
    arena.place_player(2.0);

    let mut steps = 0;
    while !arena.brain.attack_performed() && steps < 100 {
        arena.step();
        steps += 1;
    }
    assert!(arena.brain.attack_performed());
    assert!(arena.brain.has_done_first_attack());
    assert!(steps as f32 * DT >= jitter - 1e-3);
    assert!((steps - 1) as f32 * DT < jitter + 1e-3);
}

#[test]
fn reload_pauses_while_stunned() {
    let mut arena = Arena::new(spitter(""));
    arena.place_player(2.0);
    assert!(arena.run_until(3.0, EnemyBrain::is_reloading));
    let elapsed = arena.brain.tasks.reload.get().map(Reload::elapsed);

    arena.brain.stun(0.5);
    arena.run(0.3);
    assert!(arena.brain.is_reloading());
    assert_eq!(arena.brain.tasks.reload.get().map(Reload::elapsed), elapsed);
    assert_eq!(arena.brain.ammo(), Some(0));

    assert!(arena.run_until(3.0, |brain| !brain.is_reloading()));
    assert_eq!(arena.brain.ammo(), Some(3));
}

#[test]
fn stun_can_complete_the_reload() {
    let mut arena = Arena::new(spitter(", stun_completes_reload: true"));
    arena.place_player(2.0);
    assert!(arena.run_until(3.0, EnemyBrain::is_reloading));

    arena.brain.stun(0.5);
    arena.step();
    assert!(!arena.brain.is_reloading());
    assert_eq!(arena.brain.ammo(), Some(3));
    assert_eq!(arena.brain.state(), CombatState::Stunned);
}

#[test]
fn slows_stack_and_expire_in_any_order() {
    let mut arena = Arena::new(grunt());
    let base = arena.brain.stats().move_speed;

    arena.brain.apply_slow(0.5, 1.0);
    arena.brain.apply_slow(0.2, 2.0);
    assert_eq!(arena.brain.slow_count(), 2);
    assert!(approx(arena.brain.move_speed(), base * 0.5 * 0.8));
    assert!(arena.brain.indicator_shown(IndicatorKind::Slowed));

    arena.run(1.5);
    assert_eq!(arena.brain.slow_count(), 1);
    assert!(approx(arena.brain.move_speed(), base * 0.8));

    arena.run(1.0);
    assert!(!arena.brain.is_slowed());
    assert_eq!(arena.brain.move_speed(), base);
    assert!(!arena.brain.indicator_shown(IndicatorKind::Slowed));
}

#[test]
fn invalid_slow_is_rejected() {
    let mut arena = Arena::new(grunt());
    let base = arena.brain.move_speed();

    arena.brain.apply_slow(1.0, 1.0);
    arena.brain.apply_slow(-0.2, 1.0);
    assert_eq!(arena.brain.slow_count(), 0);
    assert_eq!(arena.brain.move_speed(), base);
    assert!(!arena.brain.indicator_shown(IndicatorKind::Slowed));
}

#[test]
fn knockback_stuns_and_travels_the_full_distance() {
    let mut arena = Arena::new(grunt());
    arena.brain.apply_knockback(4.0, 2.0, Vec3::new(0.0, 0.0, 3.0));
    assert!(arena.brain.is_stunned());
    assert_eq!(arena.brain.knockback_velocity(), Some(4.0));

    assert!(arena.run_until(3.0, |brain| brain.knockback_velocity().is_none()));
    arena.flush();
    let travelled: Vec3 = arena
        .outputs
        .iter()
        .filter_map(|output| match output {
            EnemyOutput::Displace(step) => Some(*step),
            _ => None,
        })
        .sum();
    assert!(approx(travelled.length(), 2.0));
    assert!(travelled.normalize().abs_diff_eq(Vec3::Z, 1e-4));

    arena.run(0.3);
    assert_eq!(arena.brain.state(), CombatState::Walking);
}

#[test]
fn unbounded_knockback_is_ignored() {
    let mut arena = Arena::new(grunt());
    arena.brain.apply_knockback(f32::INFINITY, 2.0, Vec3::X);
    arena.step();

    assert!(!arena.brain.is_stunned());
    assert_eq!(arena.brain.knockback_velocity(), None);
    assert_eq!(arena.brain.state(), CombatState::Walking);
    assert_eq!(arena.count(|o| matches!(o, EnemyOutput::Displace(_))), 0);
}

#[test]
fn knockback_away_from_player() {
    let mut arena = Arena::new(grunt());
    arena.place_player(10.0);
    arena.step();

    arena.brain.apply_knockback_from_player(4.0, 2.0);
    arena.step();
    arena.flush();
    assert!(arena.outputs.iter().any(
        |output| matches!(output, EnemyOutput::Displace(step) if step.x < 0.0 && step.z == 0.0)
    ));
}

#[test]
fn damage_flashes_then_kills_once() {
    let mut arena = Arena::new(grunt());

    arena.brain.take_damage(10.0, true, true);
    assert_eq!(arena.brain.health().current(), 20.0);
    assert!(arena.brain.is_invulnerable());
    assert!(arena.brain.flash_alpha() <= 1.0);
    assert_eq!(
        arena.count(|o| *o == EnemyOutput::Sound(EnemySound::Damaged)),
        1
    );

    arena.brain.take_damage(25.0, true, true);
    arena.brain.take_damage(25.0, true, true);
    arena.brain.die();
    assert!(arena.brain.is_dying());
    assert_eq!(arena.brain.health().current(), 0.0);
    assert!(!arena.brain.can_move());
    assert_eq!(
        arena.count(|o| *o == EnemyOutput::Sound(EnemySound::Death)),
        1
    );
}

#[test]
fn non_finite_damage_leaves_health_intact() {
    let mut arena = Arena::new(grunt());
    arena.brain.take_damage(f32::NAN, true, true);
    assert_eq!(arena.brain.health().current(), 30.0);
    assert!(!arena.brain.is_invulnerable());
    assert_eq!(
        arena.count(|o| *o == EnemyOutput::Sound(EnemySound::Damaged)),
        0
    );

    arena.brain.take_damage(1000.0, true, true);
    assert!(arena.brain.is_dying());
    assert_eq!(arena.brain.health().current(), 0.0);
}

#[test]
fn death_sequence_fades_then_removes() {
    let mut definition = grunt();
    definition.drop_chance = 100.0;
    let mut arena = Arena::new(definition);
    arena.brain.apply_slow(0.3, 5.0);
    arena.brain.die();
    assert!(!arena.brain.is_slowed());
    assert!(!arena.brain.indicator_shown(IndicatorKind::Slowed));

    assert!(arena.run_until(2.0, EnemyBrain::is_removed));
    assert_eq!(arena.outputs.last(), Some(&EnemyOutput::Removed));
    assert_eq!(arena.count(|o| matches!(o, EnemyOutput::DropLoot { .. })), 1);
    assert!(arena.count(|o| matches!(
        o,
        EnemyOutput::DeathVisual {
            phase: DeathPhase::Fade,
            ..
        }
    )) > 0);
    assert!(arena.count(|o| matches!(
        o,
        EnemyOutput::DeathVisual {
            phase: DeathPhase::Vanish,
            ..
        }
    )) > 0);

    let before = arena.outputs.len();
    arena.run(1.0);
    assert_eq!(arena.outputs.len(), before);
}

#[test]
fn dying_is_terminal() {
    let mut arena = Arena::new(grunt());
    arena.place_player(2.0);
    arena.step();
    arena.brain.die();

    arena.brain.stun(1.0);
    arena.brain.apply_slow(0.5, 1.0);
    arena.brain.apply_knockback(4.0, 2.0, Vec3::X);
    arena.brain.take_damage(5.0, true, true);
    arena.run(0.3);

    assert_eq!(arena.brain.state(), CombatState::Dying);
    assert!(!arena.brain.is_stunned());
    assert!(!arena.brain.is_slowed());
    assert!(arena.brain.knockback_velocity().is_none());
    assert!(!arena.brain.can_attack());
    assert!(arena.damage_dealt().is_empty());
}

#[test]
fn vengeful_enemy_spawns_once_on_death() {
    let mut definition = grunt();
    definition.behaviour = ron::from_str(r#"VengefulMelee(death_spawn: "grunt")"#).unwrap();
    let mut arena = Arena::new(definition);
    arena.view.enemy_position = Vec3::new(1.0, 0.0, 2.0);
    arena.place_player(10.0);
    arena.step();

    arena.brain.take_damage(100.0, true, true);
    arena.brain.die();
    arena.flush();
    let spawns: Vec<_> = arena
        .outputs
        .iter()
        .filter(|output| matches!(output, EnemyOutput::SpawnEnemy { .. }))
        .collect();
    assert_eq!(
        spawns,
        vec![&EnemyOutput::SpawnEnemy {
            enemy_type: "grunt".to_string(),
            position: Vec3::new(1.0, 0.0, 2.0),
        }]
    );
}

#[test]
fn defensive_enemy_retaliates_while_attacking() {
    let mut definition = grunt();
    definition.behaviour = BehaviourConfig::DefensiveMelee;
    let mut arena = Arena::new(definition);

    arena.brain.take_damage(5.0, false, false);
    assert_eq!(arena.brain.health().current(), 25.0);
    assert!(arena.damage_dealt().is_empty());

    arena.place_player(2.0);
    arena.step();
    assert!(arena.brain.is_attacking());

    arena.brain.take_damage(5.0, true, true);
    assert_eq!(arena.brain.health().current(), 25.0);
    assert_eq!(arena.damage_dealt(), vec![10.0]);
}

#[test]
fn thorns_hurt_and_slow_the_attacker() {
    let game = GameContext::default().with_ability(Ability::Thorns);
    let mut arena = Arena::with_game(grunt(), game);
    arena.place_player(2.0);

    arena.run(1.4);
    assert_eq!(arena.damage_dealt(), vec![10.0]);
    assert_eq!(arena.brain.health().current(), 25.0);
    assert!(arena.brain.is_slowed());
    assert!(arena.brain.move_speed() < arena.brain.stats().move_speed);
}

#[test]
fn thorns_can_kill_mid_attack() {
    let mut game = GameContext::default().with_ability(Ability::Thorns);
    game.stats.insert(StatKind::Damage, 100.0);
    let mut arena = Arena::with_game(grunt(), game);
    arena.place_player(2.0);

    assert!(arena.run_until(2.0, EnemyBrain::is_dying));
    assert_eq!(arena.damage_dealt(), vec![10.0]);
    assert!(!arena.brain.is_attacking());
    assert_eq!(
        arena.count(|o| *o == EnemyOutput::Sound(EnemySound::Attack)),
        0
    );
}

#[test]
fn stats_scale_with_round() {
    let game = GameContext::default().with_round(3);
    let arena = Arena::with_game(grunt(), game);
    assert_eq!(arena.brain.stats().damage, 14.0);
    assert_eq!(arena.brain.stats().max_health, 40.0);
    assert_eq!(arena.brain.stats().move_speed, 2.5);
}

#[test]
fn missing_clips_play_for_zero_seconds() {
    let mut arena = Arena::new(grunt());
    arena.brain.stun(0.0);
    arena.step();
    assert_eq!(arena.brain.state(), CombatState::Walking);
    assert_eq!(
        arena.count(|o| *o == EnemyOutput::Animation(AnimationClip::Stunned)),
        1
    );
}
