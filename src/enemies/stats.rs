//! Round-scaled enemy statistics.

use serde::Deserialize;

/// A stat that grows with the round number.
///
/// `value(round) = min(base + per_round * (round - 1), cap)`.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct StatCurve {
    pub base: f32,
    #[serde(default)]
    pub per_round: f32,
    #[serde(default)]
    pub cap: Option<f32>,
}

impl StatCurve {
    pub const fn flat(base: f32) -> Self {
        Self {
            base,
            per_round: 0.0,
            cap: None,
        }
    }

    /// Value at the given round. Rounds start at 1.
    pub fn at_round(&self, round: u32) -> f32 {
        let value = self.base + self.per_round * round.saturating_sub(1) as f32;
        match self.cap {
            Some(cap) => value.min(cap),
            None => value,
        }
    }
}

/// Stats fixed at spawn time.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyStats {
    /// Unslowed move speed.
    pub move_speed: f32,
    pub damage: f32,
    pub max_health: f32,
    /// Only meaningful for ranged enemies.
    pub projectile_speed: f32,
    pub mass: f32,
}

impl EnemyStats {
    pub fn derive(
        round: u32,
        move_speed: &StatCurve,
        damage: &StatCurve,
        max_health: &StatCurve,
        projectile_speed: Option<&StatCurve>,
        mass: f32,
    ) -> Self {
        Self {
            move_speed: move_speed.at_round(round),
            damage: damage.at_round(round),
            max_health: max_health.at_round(round).trunc(),
            projectile_speed: projectile_speed.map_or(0.0, |curve| curve.at_round(round)),
            mass,
        }
    }
}
