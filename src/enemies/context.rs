//! What an enemy may know about the rest of the game.
//!
//! Round number, unlocked abilities and player stats are injected through
//! [`GameContext`] instead of being looked up globally, so tests can run the
//! combat core against a hand-built context.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Player abilities that change how enemies fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    /// Dashing at the end of an enemy windup makes the attack miss.
    DashInvulnerability,
    /// Enemies that hit the player take damage back and are slowed.
    Thorns,
}

/// Player stats enemies can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    Damage,
}

/// Player-side thorns tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThornsConfig {
    /// Fraction of the player's damage stat reflected onto the attacker.
    pub damage_ratio: f32,
    pub slow_amount: f32,
    pub slow_duration: f32,
}

impl Default for ThornsConfig {
    fn default() -> Self {
        Self {
            damage_ratio: 0.5,
            slow_amount: 0.3,
            slow_duration: 2.0,
        }
    }
}

/// Round, ability and stat lookups.
#[derive(Resource, Debug, Clone)]
pub struct GameContext {
    pub round: u32,
    pub unlocked: HashSet<Ability>,
    pub stats: HashMap<StatKind, f32>,
    pub thorns: ThornsConfig,
}

impl Default for GameContext {
    fn default() -> Self {
        Self {
            round: 1,
            unlocked: HashSet::new(),
            stats: HashMap::from([(StatKind::Damage, 10.0)]),
            thorns: ThornsConfig::default(),
        }
    }
}

impl GameContext {
    pub fn with_round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.unlocked.insert(ability);
        self
    }

    pub fn is_unlocked(&self, ability: Ability) -> bool {
        self.unlocked.contains(&ability)
    }

    pub fn stat(&self, kind: StatKind) -> f32 {
        self.stats.get(&kind).copied().unwrap_or(0.0)
    }
}

/// Positions and player flags sampled for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Surroundings {
    pub enemy_position: Vec3,
    pub player_position: Vec3,
    pub player_dashing: bool,
}

/// Everything one enemy tick may read besides the enemy itself.
pub struct TickContext<'a> {
    pub game: &'a GameContext,
    pub rng: &'a mut dyn RngCore,
    pub view: Surroundings,
}

/// Randomness used by enemies (projectile spread, delays, drops).
#[derive(Resource)]
pub struct EnemyRng(pub StdRng);

impl EnemyRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for EnemyRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}
