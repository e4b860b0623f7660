//! Ranged attack: aim, fire a burst of volleys, reload when empty.

use bevy::prelude::*;
use rand::Rng;

use crate::enemies::brain::EnemyBrain;
use crate::enemies::components::CombatState;
use crate::enemies::context::TickContext;
use crate::enemies::data::ProjectileConfig;
use crate::enemies::output::{
    AnimationClip, EnemyOutput, EnemySound, IndicatorDisplay, IndicatorKind,
};
use crate::enemies::scheduler::{Countdown, Progress};
use crate::enemies::sensor::horizontal_direction;

#[derive(Debug, Clone)]
enum RangedStep {
    Begin,
    FirstAttackDelay { elapsed: f32, total: f32 },
    Windup(Countdown),
    Exhausted(Countdown),
    BurstInterval(Countdown),
    Winddown(Countdown),
}

#[derive(Debug, Clone)]
pub struct RangedSequence {
    config: ProjectileConfig,
    step: RangedStep,
    attack_performed: bool,
    aim: Vec3,
    volleys: u32,
}

impl RangedSequence {
    pub fn new(config: ProjectileConfig) -> Self {
        Self {
            config,
            step: RangedStep::Begin,
            attack_performed: false,
            aim: Vec3::ZERO,
            volleys: 0,
        }
    }

    pub fn attack_performed(&self) -> bool {
        self.attack_performed
    }

    pub fn advance(&mut self, brain: &mut EnemyBrain, dt: f32, ctx: &mut TickContext) -> Progress {
        match &mut self.step {
            RangedStep::Begin => {
                if self.config.always_show_attacking_indicator
                    && !brain.indicator_shown(IndicatorKind::Attacking)
                {
                    brain.show_indicator(IndicatorKind::Attacking, IndicatorDisplay::Persistent);
                }

                if !brain.has_done_first_attack {
                    let jitter = if self.config.attack_randomness_range > 0.0 {
                        ctx.rng.gen_range(0.0..=self.config.attack_randomness_range)
                    } else {
                        0.0
                    };
                    let total = brain.tuning.first_attack_delay + jitter;
                    if total > 0.0 {
                        self.step = RangedStep::FirstAttackDelay {
                            elapsed: 0.0,
                            total,
                        };
                        return Progress::Pending;
                    }
                    brain.has_done_first_attack = true;
                }
                self.windup(brain, ctx)
            }
            RangedStep::FirstAttackDelay { elapsed, total } => {
                *elapsed += dt;
                if brain.is_player_in_range() && *elapsed < *total {
                    return Progress::Pending;
                }
                brain.has_done_first_attack = true;
                self.windup(brain, ctx)
            }
            RangedStep::Windup(wait) => {
                if !wait.tick(dt) {
                    return Progress::Pending;
                }
                self.resolve(brain, ctx)
            }
            RangedStep::Exhausted(wait) => {
                if !wait.tick(dt) {
                    return Progress::Pending;
                }
                brain.recover_from_failed_attack();
                Progress::Done
            }
            RangedStep::BurstInterval(wait) => {
                if !wait.tick(dt) {
                    return Progress::Pending;
                }
                self.fire_volley(brain, ctx)
            }
            RangedStep::Winddown(wait) => {
                if !wait.tick(dt) {
                    return Progress::Pending;
                }
                brain.play_animation(AnimationClip::Walk);
                brain.start_cooldown(brain.tuning.successful_attack_cooldown);
                if !brain.is_reloading() {
                    brain.return_to_walking();
                }
                Progress::Done
            }
        }
    }

    fn windup(&mut self, brain: &mut EnemyBrain, ctx: &mut TickContext) -> Progress {
        if !brain.is_player_in_range() {
            return self.resolve(brain, ctx);
        }

        self.attack_performed = true;
        if self.config.can_move_while_firing {
            brain.release_movement();
        } else {
            brain.set_movement(false);
        }
        if !brain.indicator_shown(IndicatorKind::Attacking) {
            brain.show_indicator(IndicatorKind::Attacking, IndicatorDisplay::Persistent);
        }

        let duration = brain.play_animation(AnimationClip::WindUp);
        self.step = RangedStep::Windup(Countdown::new(duration));
        Progress::Pending
    }

    fn resolve(&mut self, brain: &mut EnemyBrain, ctx: &mut TickContext) -> Progress {
        if !brain.is_player_in_range() && self.config.exhaust_on_dodge_windup {
            if !self.attack_performed {
                brain.recover_from_failed_attack();
                return Progress::Done;
            }
            let wait = brain.become_exhausted();
            if self.config.can_move_while_firing {
                brain.release_movement();
            }
            self.step = RangedStep::Exhausted(Countdown::new(wait));
            return Progress::Pending;
        }

        let view = brain.view;
        self.aim = horizontal_direction(view.enemy_position, view.player_position);
        self.volleys = 0;
        self.fire_volley(brain, ctx)
    }

    fn fire_volley(&mut self, brain: &mut EnemyBrain, ctx: &mut TickContext) -> Progress {
        if self.volleys >= self.config.burst {
            return self.end_burst(brain);
        }

        let view = brain.view;
        if self.config.can_adjust_aim_during_burst {
            self.aim = horizontal_direction(view.enemy_position, view.player_position);
        }

        let (min, max) = self.config.projectiles_per_shot;
        let count = ctx.rng.gen_range(min..=max.max(min));
        let (x, y, z) = self.config.origin_offset;
        let origin = view.enemy_position + Vec3::new(x, y, z);

        for projectile in 0..count {
            let mut angle = self.config.bloom * ctx.rng.gen_range(-1.0f32..=1.0);
            if count > 1 {
                angle += self.config.projectile_arc / 2.0
                    - projectile as f32 * (self.config.projectile_arc / (count - 1) as f32);
            }
            let direction = Quat::from_rotation_y(angle.to_radians()) * self.aim;
            brain.emit(EnemyOutput::FireProjectile {
                origin,
                direction: direction.normalize_or_zero(),
                speed: brain.stats.projectile_speed,
                damage: brain.stats.damage,
            });
        }

        let ammo = brain.behaviour.spend_ammo();
        brain.play_sound(EnemySound::Attack);
        self.volleys += 1;

        if ammo == 0 && !self.config.infinite_ammo {
            return self.end_burst(brain);
        }

        self.step = RangedStep::BurstInterval(Countdown::new(self.config.burst_interval));
        Progress::Pending
    }

    fn end_burst(&mut self, brain: &mut EnemyBrain) -> Progress {
        if !self.config.infinite_ammo && brain.behaviour.ammo() == Some(0) {
            brain.start_reload(Reload::new(&self.config, brain.tuning.exhaustion_time));
        }
        if !self.config.always_show_attacking_indicator {
            brain.hide_indicator(IndicatorKind::Attacking);
        }

        let duration = brain.play_animation(AnimationClip::WindDown);
        self.step = RangedStep::Winddown(Countdown::new(duration));
        Progress::Pending
    }
}

/// Refill after the ammo runs out. Counts up only while not stunned.
#[derive(Debug, Clone)]
pub struct Reload {
    elapsed: f32,
    duration: f32,
    can_move: bool,
    stun_completes: bool,
}

impl Reload {
    pub fn new(config: &ProjectileConfig, duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
            can_move: config.can_move_while_reloading,
            stun_completes: config.stun_completes_reload,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn advance(&mut self, brain: &mut EnemyBrain, dt: f32) -> Progress {
        if brain.state() != CombatState::Stunned {
            brain.state = CombatState::Exhausted;
            self.elapsed += dt;
            if self.can_move {
                brain.release_movement();
            } else {
                brain.set_movement(false);
            }
            if !brain.indicator_shown(IndicatorKind::Exhausted) {
                brain.show_indicator(IndicatorKind::Exhausted, IndicatorDisplay::Persistent);
            }
        } else if self.stun_completes {
            self.elapsed = self.duration;
        }

        if self.elapsed < self.duration {
            return Progress::Pending;
        }

        if brain.state() != CombatState::Stunned {
            brain.return_to_walking();
        }
        brain.behaviour.refill_ammo();
        brain.has_done_first_attack = false;
        brain.hide_indicator(IndicatorKind::Exhausted);
        Progress::Done
    }
}
