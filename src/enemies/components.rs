//! Enemy-related components.

use bevy::prelude::*;

use super::output::{AnimationClip, DeathPhase, IndicatorKind};

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy type identifier (matches RON file name).
#[derive(Component, Clone, Debug)]
pub struct EnemyType(pub String);

/// Behaviour variant of an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Melee,
    DefensiveMelee,
    VengefulMelee,
    ProjectileRanged,
}

/// Combat state machine for enemy behavior.
///
/// Exactly one state is active. `Stunned` and `Dying` may preempt any state;
/// `Dying` is terminal.
#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum CombatState {
    /// Following the player, free to attack.
    #[default]
    Walking,
    /// An attack sequence is running.
    Attacking,
    /// Interrupted by a stun or knockback.
    Stunned,
    /// Locked out after a missed attack, or reloading.
    Exhausted,
    /// Playing the death sequence before removal.
    Dying,
}

/// Indicators currently displayed above an enemy.
///
/// The timer is `None` for persistent indicators.
#[derive(Component, Default, Debug)]
pub struct ActiveIndicators {
    pub entries: Vec<(IndicatorKind, Option<f32>)>,
}

/// Chase settings for the movement controller.
#[derive(Component, Clone, Copy, Debug)]
pub struct EnemyMovement {
    /// The chase stops this close to the player.
    pub stopping_distance: f32,
}

/// Clip the enemy is currently playing.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct EnemyAnimation(pub AnimationClip);

impl Default for EnemyAnimation {
    fn default() -> Self {
        Self(AnimationClip::Walk)
    }
}

/// Progress of the death fade, written while the enemy is dying.
#[derive(Component, Clone, Copy, Debug)]
pub struct DeathFade {
    pub phase: DeathPhase,
    pub progress: f32,
}

/// How the enemy should look. Used when attaching visuals.
#[derive(Component, Clone, Debug)]
pub struct EnemyAppearance {
    pub model_path: Option<String>,
    pub scale: f32,
    pub radius: f32,
    pub half_height: f32,
}
