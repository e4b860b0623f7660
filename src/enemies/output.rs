//! Requests the combat core makes of the outside world.
//!
//! The core never talks to audio, UI, physics or spawning directly. It queues
//! [`EnemyOutput`]s which the engine adapter drains after every tick.

use bevy::prelude::*;
use serde::Deserialize;

/// Animation clips every enemy may play.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationClip {
    Walk,
    WindUp,
    WindDown,
    Stunned,
    Exhausted,
}

/// Sounds an enemy emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemySound {
    Attack,
    Damaged,
    Death,
}

impl EnemySound {
    pub fn asset_path(self) -> &'static str {
        match self {
            EnemySound::Attack => "audio/enemy/attack.ogg",
            EnemySound::Damaged => "audio/enemy/damaged.ogg",
            EnemySound::Death => "audio/enemy/death.ogg",
        }
    }
}

/// Status indicators shown above an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Attacking,
    Exhausted,
    Stunned,
    Slowed,
    Death,
}

/// How long an indicator stays up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorDisplay {
    /// Until explicitly stopped.
    Persistent,
    /// For a fixed number of seconds.
    For(f32),
    /// Plays once and removes itself.
    Once,
}

/// Stage of the death fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathPhase {
    /// Slow eased tint and tilt.
    Fade,
    /// Short linear fade to nothing.
    Vanish,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnemyOutput {
    Animation(AnimationClip),
    Sound(EnemySound),
    ShowIndicator {
        kind: IndicatorKind,
        display: IndicatorDisplay,
    },
    StopIndicator(IndicatorKind),
    DamagePlayer(f32),
    FireProjectile {
        origin: Vec3,
        direction: Vec3,
        speed: f32,
        damage: f32,
    },
    /// Knockback travel for this tick.
    Displace(Vec3),
    /// Progress in `[0, 1]` through one phase of the death fade.
    DeathVisual { phase: DeathPhase, progress: f32 },
    /// Ask the round manager for a follow-up enemy.
    SpawnEnemy { enemy_type: String, position: Vec3 },
    DropLoot { position: Vec3 },
    /// The death sequence finished; the enemy should be removed.
    Removed,
}
