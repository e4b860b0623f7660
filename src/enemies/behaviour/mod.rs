//! Per-kind behaviour: which attack sequence an enemy runs and what it does
//! when it dies.

mod melee;
mod ranged;

pub use melee::MeleeSequence;
pub use ranged::{RangedSequence, Reload};

use bevy::prelude::*;

use super::brain::EnemyBrain;
use super::components::EnemyKind;
use super::context::TickContext;
use super::data::{BehaviourConfig, ProjectileConfig};
use super::output::EnemyOutput;
use super::scheduler::Progress;

/// Runtime state of an enemy's behaviour variant.
#[derive(Debug, Clone)]
pub enum Behaviour {
    Melee,
    DefensiveMelee,
    VengefulMelee {
        death_spawn: String,
        has_spawned: bool,
    },
    ProjectileRanged {
        config: ProjectileConfig,
        ammo: u32,
    },
}

impl Behaviour {
    pub fn from_config(config: &BehaviourConfig) -> Self {
        match config {
            BehaviourConfig::Melee => Behaviour::Melee,
            BehaviourConfig::DefensiveMelee => Behaviour::DefensiveMelee,
            BehaviourConfig::VengefulMelee { death_spawn } => Behaviour::VengefulMelee {
                death_spawn: death_spawn.clone(),
                has_spawned: false,
            },
            BehaviourConfig::ProjectileRanged(config) => Behaviour::ProjectileRanged {
                ammo: config.max_ammo,
                config: config.clone(),
            },
        }
    }

    pub fn kind(&self) -> EnemyKind {
        match self {
            Behaviour::Melee => EnemyKind::Melee,
            Behaviour::DefensiveMelee => EnemyKind::DefensiveMelee,
            Behaviour::VengefulMelee { .. } => EnemyKind::VengefulMelee,
            Behaviour::ProjectileRanged { .. } => EnemyKind::ProjectileRanged,
        }
    }

    /// A fresh attack sequence for this variant.
    pub fn begin_attack(&self) -> AttackSequence {
        match self {
            Behaviour::ProjectileRanged { config, .. } => {
                AttackSequence::Ranged(RangedSequence::new(config.clone()))
            }
            _ => AttackSequence::Melee(MeleeSequence::default()),
        }
    }

    /// Variant side effect run before the common death cleanup.
    pub fn on_death(&mut self, position: Vec3) -> Option<EnemyOutput> {
        match self {
            Behaviour::VengefulMelee {
                death_spawn,
                has_spawned,
            } if !*has_spawned => {
                *has_spawned = true;
                Some(EnemyOutput::SpawnEnemy {
                    enemy_type: death_spawn.clone(),
                    position,
                })
            }
            _ => None,
        }
    }

    /// Remaining volleys, `None` for melee kinds.
    pub fn ammo(&self) -> Option<u32> {
        match self {
            Behaviour::ProjectileRanged { ammo, .. } => Some(*ammo),
            _ => None,
        }
    }

    pub(super) fn spend_ammo(&mut self) -> u32 {
        match self {
            Behaviour::ProjectileRanged { config, ammo } if !config.infinite_ammo => {
                *ammo = ammo.saturating_sub(1);
                *ammo
            }
            Behaviour::ProjectileRanged { ammo, .. } => *ammo,
            _ => 0,
        }
    }

    pub(super) fn refill_ammo(&mut self) {
        if let Behaviour::ProjectileRanged { config, ammo } = self {
            *ammo = config.max_ammo;
        }
    }
}

/// The live attack of an enemy.
#[derive(Debug, Clone)]
pub enum AttackSequence {
    Melee(MeleeSequence),
    Ranged(RangedSequence),
}

impl AttackSequence {
    pub fn advance(&mut self, brain: &mut EnemyBrain, dt: f32, ctx: &mut TickContext) -> Progress {
        match self {
            AttackSequence::Melee(sequence) => sequence.advance(brain, dt, ctx),
            AttackSequence::Ranged(sequence) => sequence.advance(brain, dt, ctx),
        }
    }

    /// True once the enemy committed to a windup.
    pub fn attack_performed(&self) -> bool {
        match self {
            AttackSequence::Melee(sequence) => sequence.attack_performed(),
            AttackSequence::Ranged(sequence) => sequence.attack_performed(),
        }
    }
}
