//! Per-enemy combat state machine.
//!
//! [`EnemyBrain`] owns everything an enemy needs to fight: stats, health, the
//! range sensor, active effects and a table of timed tasks. It does not touch
//! the ECS. Systems feed it through [`EnemyBrain::fixed_update`] and
//! [`EnemyBrain::update`] and drain the [`EnemyOutput`]s it queues.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use rand::Rng;

use super::behaviour::{AttackSequence, Behaviour, Reload};
use super::components::{CombatState, EnemyKind};
use super::context::{Ability, StatKind, Surroundings, TickContext};
use super::data::{BehaviourConfig, CombatTuning, EnemyDefinition};
use super::effects::{HitFlash, InvalidSlow, InvulnerabilityConfig, SlowStack, MAX_SLOW_REDUCTION};
use super::health::{EnemyHealth, HealthOutcome};
use super::knockback::Knockback;
use super::output::{
    AnimationClip, DeathPhase, EnemyOutput, EnemySound, IndicatorDisplay, IndicatorKind,
};
use super::scheduler::{Cooldown, Progress, TaskSlot};
use super::sensor::{horizontal_direction, horizontal_distance, RangeEdge, RangeSensor};
use super::stats::EnemyStats;

/// Eased fade and tilt at the start of the death sequence.
pub const DEATH_FADE_DURATION: f32 = 0.4;
/// Fast linear fade at the end of the death sequence.
pub const DEATH_VANISH_DURATION: f32 = 0.08;

#[derive(Debug, Clone)]
pub(super) struct Stun {
    elapsed: f32,
    duration: f32,
}

#[derive(Debug, Clone)]
pub(super) struct DeathSequence {
    phase: DeathPhase,
    elapsed: f32,
}

/// Timed processes, at most one of each kind.
#[derive(Debug, Default)]
pub(super) struct Tasks {
    pub(super) attack: TaskSlot<AttackSequence>,
    pub(super) cooldown: TaskSlot<Cooldown>,
    pub(super) stun: TaskSlot<Stun>,
    pub(super) knockback: TaskSlot<Knockback>,
    pub(super) flash: TaskSlot<HitFlash>,
    pub(super) reload: TaskSlot<Reload>,
    pub(super) death: TaskSlot<DeathSequence>,
}

impl Tasks {
    fn cancel_all(&mut self) {
        self.attack.cancel();
        self.cooldown.cancel();
        self.stun.cancel();
        self.knockback.cancel();
        self.flash.cancel();
        self.reload.cancel();
        self.death.cancel();
    }
}

#[derive(Component, Debug)]
pub struct EnemyBrain {
    pub(super) behaviour: Behaviour,
    pub(super) stats: EnemyStats,
    pub(super) tuning: CombatTuning,
    invulnerability: InvulnerabilityConfig,
    drop_chance: f32,
    animations: HashMap<AnimationClip, f32>,
    missing_clips: HashSet<AnimationClip>,

    pub(super) state: CombatState,
    can_attack: bool,
    sensor: RangeSensor,
    pub(super) has_done_first_attack: bool,
    frozen_in_range: bool,
    movement_enabled: bool,
    health: EnemyHealth,
    slows: SlowStack,
    move_speed: f32,
    indicators: HashSet<IndicatorKind>,

    pub(super) tasks: Tasks,
    pub(super) view: Surroundings,
    outputs: Vec<EnemyOutput>,
}

impl EnemyBrain {
    /// Build an enemy from its definition, with stats for `round`.
    pub fn from_definition(definition: &EnemyDefinition, round: u32) -> Self {
        let mut definition = definition.clone();
        for problem in definition.sanitize() {
            warn!("Enemy '{}': {}", definition.name, problem);
        }

        let behaviour = Behaviour::from_config(&definition.behaviour);
        let projectile_speed = match &definition.behaviour {
            BehaviourConfig::ProjectileRanged(config) => {
                Some(&config.projectile_speed)
            }
            _ => None,
        };
        let stats = EnemyStats::derive(
            round,
            &definition.move_speed,
            &definition.damage,
            &definition.max_health,
            projectile_speed,
            definition.mass,
        );

        Self {
            behaviour,
            sensor: RangeSensor::new(
                definition.combat.engage_range,
                definition.combat.disengage_range,
            ),
            health: EnemyHealth::new(stats.max_health),
            move_speed: stats.move_speed,
            stats,
            tuning: definition.combat,
            invulnerability: definition.invulnerability,
            drop_chance: definition.drop_chance,
            animations: definition.animations,
            missing_clips: HashSet::new(),
            state: CombatState::Walking,
            can_attack: true,
            has_done_first_attack: false,
            frozen_in_range: false,
            movement_enabled: true,
            slows: SlowStack::default(),
            indicators: HashSet::new(),
            tasks: Tasks::default(),
            view: Surroundings::default(),
            outputs: Vec::new(),
        }
    }

    // Ticks

    /// Physics tick: range sensor, knockback travel, attack attempt.
    pub fn fixed_update(&mut self, dt: f32, ctx: &mut TickContext) {
        self.view = ctx.view;
        if self.is_dying() {
            return;
        }

        let distance = horizontal_distance(self.view.enemy_position, self.view.player_position);
        match self.sensor.sample(distance) {
            Some(RangeEdge::Entered) => self.on_player_entered(),
            Some(RangeEdge::Left) => self.on_player_left(),
            None => {}
        }

        self.advance_knockback(dt);

        if self.wants_to_attack() {
            self.attack(ctx);
        }
    }

    /// Frame tick: every other timed process, in a fixed order.
    pub fn update(&mut self, dt: f32, ctx: &mut TickContext) {
        self.view = ctx.view;
        if self.is_dying() {
            self.advance_death(dt, ctx);
            return;
        }

        self.advance_stun(dt);
        self.advance_cooldown(dt);
        self.advance_attack(dt, ctx);
        self.advance_reload(dt);
        self.advance_flash(dt);
        self.advance_slows(dt);
    }

    fn wants_to_attack(&self) -> bool {
        if !self.sensor.in_range() {
            return false;
        }
        match self.kind() {
            EnemyKind::ProjectileRanged => {
                !self.tasks.reload.is_running() && self.state != CombatState::Stunned
            }
            _ => true,
        }
    }

    fn on_player_entered(&mut self) {
        self.has_done_first_attack = false;
        if self.tuning.freeze_in_range {
            self.frozen_in_range = true;
            self.set_movement(false);
        }
    }

    fn on_player_left(&mut self) {
        if self.frozen_in_range {
            self.frozen_in_range = false;
            if matches!(self.state, CombatState::Walking | CombatState::Attacking) {
                self.set_movement(true);
            }
        }
        self.hide_indicator(IndicatorKind::Attacking);
    }

    // Commands

    /// Start the variant's attack sequence. Ignored unless `can_attack`.
    pub fn attack(&mut self, ctx: &mut TickContext) {
        if !self.can_attack || self.is_dying() {
            return;
        }

        self.state = CombatState::Attacking;
        self.can_attack = false;
        let sequence = self.behaviour.begin_attack();
        self.tasks.attack.start(sequence);
        // Run up to the first wait point right away.
        self.advance_attack(0.0, ctx);
    }

    /// Interrupt everything for `duration` seconds.
    pub fn stun(&mut self, duration: f32) {
        if !(duration >= 0.0) || self.is_dying() {
            return;
        }

        self.state = CombatState::Stunned;
        self.can_attack = false;
        self.set_movement(false);
        self.hide_indicator(IndicatorKind::Attacking);
        self.hide_indicator(IndicatorKind::Exhausted);

        if let Some(cooldown) = self.tasks.cooldown.cancel() {
            let remaining = if self.tuning.stun_resets_attack_cooldown {
                duration
            } else {
                cooldown.remaining
            };
            self.tasks.cooldown.start(Cooldown::new(remaining));
        }
        if self.tasks.attack.cancel().is_some() {
            debug!("Attack interrupted by stun");
        }

        self.tasks.stun.start(Stun {
            elapsed: 0.0,
            duration,
        });
        self.play_animation(AnimationClip::Stunned);
        self.show_indicator(IndicatorKind::Stunned, IndicatorDisplay::For(duration));
    }

    /// Push the enemy along `direction`, stunning it until it comes to rest.
    pub fn apply_knockback(&mut self, initial_velocity: f32, distance: f32, direction: Vec3) {
        if self.is_dying() {
            return;
        }
        let Some(knockback) =
            Knockback::new(initial_velocity, distance, direction, self.stats.mass)
        else {
            debug!(
                "Ignoring knockback v0={} d={} dir={:?}",
                initial_velocity, distance, direction
            );
            return;
        };

        let duration = knockback.duration();
        self.tasks.knockback.start(knockback);
        self.stun(duration);
    }

    /// Knock the enemy directly away from the player.
    pub fn apply_knockback_from_player(&mut self, initial_velocity: f32, distance: f32) {
        let direction =
            horizontal_direction(self.view.player_position, self.view.enemy_position);
        self.apply_knockback(initial_velocity, distance, direction);
    }

    /// Stop knockback travel early. The stun it started keeps running.
    pub fn cancel_knockback(&mut self) {
        self.tasks.knockback.cancel();
    }

    pub fn apply_slow(&mut self, reduction: f32, duration: f32) {
        if self.is_dying() {
            return;
        }
        if let Err(InvalidSlow(reduction)) = self.slows.push(reduction, duration) {
            warn!(
                "Invalid slow amount {}! Expected a value from 0 to {}.",
                reduction, MAX_SLOW_REDUCTION
            );
            return;
        }

        self.refresh_move_speed();
        if !self.indicator_shown(IndicatorKind::Slowed) {
            self.show_indicator(IndicatorKind::Slowed, IndicatorDisplay::Persistent);
        }
    }

    /// Apply an incoming hit.
    ///
    /// A defensive enemy with a live attack ignores the hit and strikes the
    /// player back instead.
    pub fn take_damage(&mut self, amount: f32, play_sound: bool, do_invulnerability: bool) {
        if self.is_dying() {
            return;
        }
        if self.kind() == EnemyKind::DefensiveMelee && self.tasks.attack.is_running() {
            self.emit(EnemyOutput::DamagePlayer(self.stats.damage));
            return;
        }
        self.suffer_damage(amount, play_sound, do_invulnerability);
    }

    pub(super) fn suffer_damage(&mut self, amount: f32, play_sound: bool, do_invulnerability: bool) {
        match self.health.remove(amount) {
            HealthOutcome::Died => self.die(),
            HealthOutcome::Survived => {
                if play_sound {
                    self.play_sound(EnemySound::Damaged);
                }
                if do_invulnerability {
                    self.tasks.flash.start(HitFlash::new(&self.invulnerability));
                }
            }
            HealthOutcome::Rejected => warn!("Ignoring non-finite damage amount {}", amount),
            HealthOutcome::AlreadyDead => {}
        }
    }

    /// Start dying. Runs once; later calls do nothing.
    pub fn die(&mut self) {
        if self.is_dying() {
            return;
        }

        if let Some(output) = self.behaviour.on_death(self.view.enemy_position) {
            self.emit(output);
        }

        self.health.kill();
        self.can_attack = false;
        self.state = CombatState::Dying;
        self.tasks.cancel_all();
        self.slows.clear();
        self.hide_indicator(IndicatorKind::Attacking);
        self.hide_indicator(IndicatorKind::Exhausted);
        self.hide_indicator(IndicatorKind::Stunned);
        self.hide_indicator(IndicatorKind::Slowed);
        self.movement_enabled = false;
        self.play_sound(EnemySound::Death);
        self.tasks.death.start(DeathSequence {
            phase: DeathPhase::Fade,
            elapsed: 0.0,
        });
    }

    /// Take every output queued since the last drain.
    pub fn drain_outputs(&mut self) -> Vec<EnemyOutput> {
        std::mem::take(&mut self.outputs)
    }

    // Queries

    pub fn kind(&self) -> EnemyKind {
        self.behaviour.kind()
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn can_attack(&self) -> bool {
        self.can_attack
    }

    pub fn is_player_in_range(&self) -> bool {
        self.sensor.in_range()
    }

    pub fn has_done_first_attack(&self) -> bool {
        self.has_done_first_attack
    }

    pub fn is_attacking(&self) -> bool {
        self.tasks.attack.is_running()
    }

    /// True once the live attack committed to its windup.
    pub fn attack_performed(&self) -> bool {
        self.tasks
            .attack
            .get()
            .is_some_and(AttackSequence::attack_performed)
    }

    pub fn is_on_cooldown(&self) -> bool {
        self.tasks.cooldown.is_running()
    }

    pub fn is_stunned(&self) -> bool {
        self.tasks.stun.is_running()
    }

    pub fn is_reloading(&self) -> bool {
        self.tasks.reload.is_running()
    }

    pub fn is_dying(&self) -> bool {
        self.state == CombatState::Dying
    }

    /// True during the post-hit flash. Damage sources check this before
    /// calling [`EnemyBrain::take_damage`].
    pub fn is_invulnerable(&self) -> bool {
        self.tasks.flash.is_running()
    }

    /// Body alpha for the hit flash, 1.0 when not flashing.
    pub fn flash_alpha(&self) -> f32 {
        self.tasks.flash.get().map_or(1.0, HitFlash::alpha)
    }

    pub fn knockback_velocity(&self) -> Option<f32> {
        self.tasks.knockback.get().map(Knockback::velocity)
    }

    pub fn health(&self) -> &EnemyHealth {
        &self.health
    }

    pub fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    pub fn ammo(&self) -> Option<u32> {
        self.behaviour.ammo()
    }

    /// Current speed after slows.
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn is_slowed(&self) -> bool {
        self.slows.is_slowed()
    }

    pub fn slow_count(&self) -> usize {
        self.slows.len()
    }

    /// Whether the movement controller may walk the enemy.
    pub fn can_move(&self) -> bool {
        self.movement_enabled && !self.is_dying()
    }

    /// Whether the enemy should turn towards the player this frame.
    pub fn faces_player(&self) -> bool {
        !matches!(
            self.state,
            CombatState::Stunned | CombatState::Exhausted | CombatState::Dying
        )
    }

    pub fn indicator_shown(&self, kind: IndicatorKind) -> bool {
        self.indicators.contains(&kind)
    }

    // Helpers for the attack sequences

    pub(super) fn emit(&mut self, output: EnemyOutput) {
        self.outputs.push(output);
    }

    pub(super) fn play_sound(&mut self, sound: EnemySound) {
        self.emit(EnemyOutput::Sound(sound));
    }

    /// Play `clip` and return its length. Unknown clips last zero seconds.
    pub(super) fn play_animation(&mut self, clip: AnimationClip) -> f32 {
        self.emit(EnemyOutput::Animation(clip));
        match self.animations.get(&clip) {
            Some(duration) => *duration,
            None => {
                if self.missing_clips.insert(clip) {
                    warn!("Animation clip {:?} is not defined, using 0s", clip);
                }
                0.0
            }
        }
    }

    pub(super) fn show_indicator(&mut self, kind: IndicatorKind, display: IndicatorDisplay) {
        if display != IndicatorDisplay::Once {
            self.indicators.insert(kind);
        }
        self.emit(EnemyOutput::ShowIndicator { kind, display });
    }

    pub(super) fn hide_indicator(&mut self, kind: IndicatorKind) {
        if self.indicators.remove(&kind) {
            self.emit(EnemyOutput::StopIndicator(kind));
        }
    }

    pub(super) fn set_movement(&mut self, enabled: bool) {
        if !self.is_dying() {
            self.movement_enabled = enabled;
        }
    }

    /// Re-enable movement unless the sensor is holding the enemy in place.
    pub(super) fn release_movement(&mut self) {
        self.set_movement(!self.frozen_in_range);
    }

    pub(super) fn return_to_walking(&mut self) {
        self.state = CombatState::Walking;
        self.release_movement();
    }

    /// Enter the post-miss lockout. Returns how long it lasts.
    pub(super) fn become_exhausted(&mut self) -> f32 {
        let duration = self.tuning.exhaustion_time;
        self.state = CombatState::Exhausted;
        self.set_movement(false);
        self.hide_indicator(IndicatorKind::Attacking);
        self.play_animation(AnimationClip::Exhausted);
        self.show_indicator(IndicatorKind::Exhausted, IndicatorDisplay::For(duration));
        duration
    }

    pub(super) fn recover_from_failed_attack(&mut self) {
        self.hide_indicator(IndicatorKind::Exhausted);
        self.play_animation(AnimationClip::Walk);
        self.return_to_walking();
        self.can_attack = true;
    }

    pub(super) fn start_cooldown(&mut self, seconds: f32) {
        self.tasks.cooldown.start(Cooldown::new(seconds));
    }

    pub(super) fn start_reload(&mut self, reload: Reload) {
        self.hide_indicator(IndicatorKind::Attacking);
        self.tasks.reload.start(reload);
    }

    /// Land a hit on the player, taking thorns damage if the player has it.
    pub(super) fn strike_player(&mut self, ctx: &TickContext) {
        self.emit(EnemyOutput::DamagePlayer(self.stats.damage));

        if ctx.game.is_unlocked(Ability::Thorns) {
            let thorns = ctx.game.thorns;
            let reflected = ctx.game.stat(StatKind::Damage) * thorns.damage_ratio;
            self.suffer_damage(reflected, false, false);
            if !self.is_dying() {
                self.apply_slow(thorns.slow_amount, thorns.slow_duration);
            }
        }
    }

    fn refresh_move_speed(&mut self) {
        self.move_speed = self.stats.move_speed * self.slows.multiplier();
    }

    // Task advancement

    fn advance_attack(&mut self, dt: f32, ctx: &mut TickContext) {
        let Some(mut sequence) = self.tasks.attack.suspend() else {
            return;
        };
        let progress = sequence.advance(self, dt, ctx);
        self.tasks.attack.resume(sequence, progress);
    }

    fn advance_stun(&mut self, dt: f32) {
        let Some(mut stun) = self.tasks.stun.suspend() else {
            return;
        };
        self.state = CombatState::Stunned;
        stun.elapsed += dt;

        let progress = if stun.elapsed >= stun.duration {
            self.hide_indicator(IndicatorKind::Stunned);
            self.play_animation(AnimationClip::Walk);
            self.return_to_walking();
            self.can_attack = !self.tasks.cooldown.is_running();
            Progress::Done
        } else {
            Progress::Pending
        };
        self.tasks.stun.resume(stun, progress);
    }

    fn advance_cooldown(&mut self, dt: f32) {
        let Some(mut cooldown) = self.tasks.cooldown.suspend() else {
            return;
        };
        let progress = cooldown.tick(dt);
        if progress.is_done() && !self.tasks.stun.is_running() {
            if self.state != CombatState::Exhausted {
                self.state = CombatState::Walking;
            }
            self.can_attack = true;
        }
        self.tasks.cooldown.resume(cooldown, progress);
    }

    fn advance_reload(&mut self, dt: f32) {
        let Some(mut reload) = self.tasks.reload.suspend() else {
            return;
        };
        let progress = reload.advance(self, dt);
        self.tasks.reload.resume(reload, progress);
    }

    fn advance_flash(&mut self, dt: f32) {
        let Some(mut flash) = self.tasks.flash.suspend() else {
            return;
        };
        let progress = flash.tick(dt);
        self.tasks.flash.resume(flash, progress);
    }

    fn advance_slows(&mut self, dt: f32) {
        if self.slows.tick(dt) {
            self.refresh_move_speed();
            if !self.slows.is_slowed() {
                self.hide_indicator(IndicatorKind::Slowed);
            }
        }
    }

    fn advance_knockback(&mut self, dt: f32) {
        let Some(mut knockback) = self.tasks.knockback.suspend() else {
            return;
        };
        let (displacement, progress) = knockback.step(dt);
        if displacement != Vec3::ZERO {
            self.emit(EnemyOutput::Displace(displacement));
        }
        self.tasks.knockback.resume(knockback, progress);
    }

    fn advance_death(&mut self, dt: f32, ctx: &mut TickContext) {
        let Some(mut death) = self.tasks.death.suspend() else {
            return;
        };

        let duration = match death.phase {
            DeathPhase::Fade => DEATH_FADE_DURATION,
            DeathPhase::Vanish => DEATH_VANISH_DURATION,
        };
        let progress = (death.elapsed / duration).min(1.0);
        self.emit(EnemyOutput::DeathVisual {
            phase: death.phase,
            progress,
        });
        death.elapsed += dt;

        let mut done = Progress::Pending;
        if death.elapsed > duration {
            match death.phase {
                DeathPhase::Fade => {
                    death.phase = DeathPhase::Vanish;
                    death.elapsed = 0.0;
                }
                DeathPhase::Vanish => {
                    self.finish_death(ctx);
                    done = Progress::Done;
                }
            }
        }
        self.tasks.death.resume(death, done);
    }

    fn finish_death(&mut self, ctx: &mut TickContext) {
        let roll: f32 = ctx.rng.gen_range(0.0..100.0);
        if roll <= self.drop_chance {
            self.emit(EnemyOutput::DropLoot {
                position: self.view.enemy_position,
            });
        }

        self.show_indicator(IndicatorKind::Death, IndicatorDisplay::Once);
        self.hide_indicator(IndicatorKind::Attacking);
        self.hide_indicator(IndicatorKind::Exhausted);
        self.hide_indicator(IndicatorKind::Slowed);
        self.emit(EnemyOutput::Removed);
    }

    /// True once the death sequence has finished.
    pub fn is_removed(&self) -> bool {
        self.is_dying() && !self.tasks.death.is_running()
    }
}
