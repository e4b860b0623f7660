//! Enemy health bookkeeping.

/// What a damage application did to the enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthOutcome {
    Survived,
    /// Health reached zero with this hit. Reported exactly once.
    Died,
    /// The enemy was already dead; nothing changed.
    AlreadyDead,
    /// The amount was not a finite number; nothing changed.
    Rejected,
}

/// Current and maximum health. Health never goes below zero.
#[derive(Debug, Clone)]
pub struct EnemyHealth {
    current: f32,
    maximum: f32,
    dead: bool,
}

impl EnemyHealth {
    pub fn new(max: f32) -> Self {
        Self {
            current: max.max(0.0),
            maximum: max.max(0.0),
            dead: false,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn remove(&mut self, amount: f32) -> HealthOutcome {
        if self.dead {
            return HealthOutcome::AlreadyDead;
        }
        if !amount.is_finite() {
            return HealthOutcome::Rejected;
        }
        self.current = (self.current - amount).clamp(0.0, self.maximum);
        if self.current <= 0.0 {
            self.dead = true;
            HealthOutcome::Died
        } else {
            HealthOutcome::Survived
        }
    }

    /// Mark dead without damage (killed by some other means).
    pub fn kill(&mut self) -> HealthOutcome {
        if self.dead {
            return HealthOutcome::AlreadyDead;
        }
        self.current = 0.0;
        self.dead = true;
        HealthOutcome::Died
    }
}
