//! Close-range attack: windup, hit or miss, winddown.

use crate::enemies::brain::EnemyBrain;
use crate::enemies::context::{Ability, TickContext};
use crate::enemies::output::{AnimationClip, EnemySound, IndicatorDisplay, IndicatorKind};
use crate::enemies::scheduler::{Countdown, Progress};

#[derive(Debug, Clone, Default)]
enum MeleeStep {
    #[default]
    Begin,
    FirstAttackDelay {
        elapsed: f32,
        total: f32,
    },
    Windup(Countdown),
    Exhausted(Countdown),
    Winddown(Countdown),
}

/// Melee attack shared by every melee kind.
#[derive(Debug, Clone, Default)]
pub struct MeleeSequence {
    step: MeleeStep,
    attack_performed: bool,
}

impl MeleeSequence {
    pub fn attack_performed(&self) -> bool {
        self.attack_performed
    }

    pub fn advance(&mut self, brain: &mut EnemyBrain, dt: f32, ctx: &mut TickContext) -> Progress {
        match &mut self.step {
            MeleeStep::Begin => {
                if !brain.indicator_shown(IndicatorKind::Attacking)
                    && !brain.indicator_shown(IndicatorKind::Exhausted)
                {
                    brain.show_indicator(IndicatorKind::Attacking, IndicatorDisplay::Persistent);
                }

                if !brain.has_done_first_attack {
                    brain.has_done_first_attack = true;
                    let total = brain.tuning.first_attack_delay;
                    if total > 0.0 {
                        self.step = MeleeStep::FirstAttackDelay {
                            elapsed: 0.0,
                            total,
                        };
                        return Progress::Pending;
                    }
                }
                self.windup(brain, ctx)
            }
            MeleeStep::FirstAttackDelay { elapsed, total } => {
                *elapsed += dt;
                if brain.is_player_in_range() && *elapsed < *total {
                    return Progress::Pending;
                }
                self.windup(brain, ctx)
            }
            MeleeStep::Windup(wait) => {
                if !wait.tick(dt) {
                    return Progress::Pending;
                }
                self.resolve(brain, ctx)
            }
            MeleeStep::Exhausted(wait) => {
                if !wait.tick(dt) {
                    return Progress::Pending;
                }
                brain.recover_from_failed_attack();
                Progress::Done
            }
            MeleeStep::Winddown(wait) => {
                if !wait.tick(dt) {
                    return Progress::Pending;
                }
                brain.play_animation(AnimationClip::Walk);
                brain.return_to_walking();
                brain.start_cooldown(brain.tuning.successful_attack_cooldown);
                Progress::Done
            }
        }
    }

    fn windup(&mut self, brain: &mut EnemyBrain, ctx: &mut TickContext) -> Progress {
        if !brain.is_player_in_range() {
            return self.resolve(brain, ctx);
        }
        self.attack_performed = true;
        let duration = brain.play_animation(AnimationClip::WindUp);
        self.step = MeleeStep::Windup(Countdown::new(duration));
        Progress::Pending
    }

    fn resolve(&mut self, brain: &mut EnemyBrain, ctx: &mut TickContext) -> Progress {
        let dodged = ctx.game.is_unlocked(Ability::DashInvulnerability) && brain.view.player_dashing;

        if !brain.is_player_in_range() || dodged {
            if !self.attack_performed {
                brain.recover_from_failed_attack();
                return Progress::Done;
            }
            let wait = brain.become_exhausted();
            self.step = MeleeStep::Exhausted(Countdown::new(wait));
            return Progress::Pending;
        }

        brain.strike_player(ctx);
        if brain.is_dying() {
            return Progress::Done;
        }

        brain.play_sound(EnemySound::Attack);
        let duration = brain.play_animation(AnimationClip::WindDown);
        self.step = MeleeStep::Winddown(Countdown::new(duration));
        Progress::Pending
    }
}
