//! Timed modifiers on an enemy: stacked slows and the hit-invulnerability flash.

use std::collections::VecDeque;
use std::f32::consts::FRAC_PI_2;

use serde::Deserialize;

use super::scheduler::Progress;

/// Largest accepted slow reduction; 1.0 would stop the enemy outright.
pub const MAX_SLOW_REDUCTION: f32 = 0.999;

/// One active slow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlowEffect {
    pub reduction: f32,
    pub remaining: f32,
}

/// Why a slow was refused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidSlow(pub f32);

/// Active slows in application order.
///
/// The effective speed multiplier is the product of `1 - reduction` over all
/// live slows, recomputed whenever the set changes.
#[derive(Debug, Clone, Default)]
pub struct SlowStack {
    slows: VecDeque<SlowEffect>,
}

impl SlowStack {
    pub fn push(&mut self, reduction: f32, duration: f32) -> Result<(), InvalidSlow> {
        if !(0.0..=MAX_SLOW_REDUCTION).contains(&reduction) {
            return Err(InvalidSlow(reduction));
        }
        self.slows.push_back(SlowEffect {
            reduction,
            remaining: if duration.is_nan() { 0.0 } else { duration },
        });
        Ok(())
    }

    /// Count all slows down by `dt`. Returns true if any expired.
    pub fn tick(&mut self, dt: f32) -> bool {
        let before = self.slows.len();
        for slow in self.slows.iter_mut() {
            slow.remaining -= dt;
        }
        self.slows.retain(|slow| slow.remaining > 0.0);
        self.slows.len() != before
    }

    pub fn multiplier(&self) -> f32 {
        self.slows.iter().map(|s| 1.0 - s.reduction).product()
    }

    pub fn is_slowed(&self) -> bool {
        !self.slows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slows.len()
    }

    pub fn clear(&mut self) {
        self.slows.clear();
    }
}

/// Post-hit invulnerability window settings.
#[derive(Deserialize, Clone, Debug)]
pub struct InvulnerabilityConfig {
    pub duration: f32,
    #[serde(default = "default_flashes")]
    pub flashes: u32,
    #[serde(default = "default_max_alpha")]
    pub max_alpha: f32,
    #[serde(default = "default_min_alpha")]
    pub min_alpha: f32,
}

fn default_flashes() -> u32 {
    3
}

fn default_max_alpha() -> f32 {
    1.0
}

fn default_min_alpha() -> f32 {
    0.3
}

impl Default for InvulnerabilityConfig {
    fn default() -> Self {
        Self {
            duration: 0.5,
            flashes: default_flashes(),
            max_alpha: default_max_alpha(),
            min_alpha: default_min_alpha(),
        }
    }
}

/// Running invulnerability flash. The enemy is invulnerable while it lives.
#[derive(Debug, Clone)]
pub struct HitFlash {
    elapsed: f32,
    config: InvulnerabilityConfig,
}

impl HitFlash {
    pub fn new(config: &InvulnerabilityConfig) -> Self {
        Self {
            elapsed: 0.0,
            config: config.clone(),
        }
    }

    pub fn tick(&mut self, dt: f32) -> Progress {
        self.elapsed += dt;
        if self.elapsed >= self.config.duration {
            Progress::Done
        } else {
            Progress::Pending
        }
    }

    /// Sprite alpha at the current point of the flash.
    ///
    /// Each flash eases from max down to min over its first half and back up
    /// over its second half.
    pub fn alpha(&self) -> f32 {
        let InvulnerabilityConfig {
            duration,
            flashes,
            max_alpha,
            min_alpha,
        } = self.config;
        if flashes == 0 || duration <= 0.0 {
            return max_alpha;
        }
        let period = duration / flashes as f32;
        let half = period / 2.0;
        let phase = self.elapsed.rem_euclid(period);
        if phase < half {
            let t = 1.0 - (phase / half * FRAC_PI_2).cos();
            lerp(max_alpha, min_alpha, t)
        } else {
            let t = ((phase - half) / half * FRAC_PI_2).sin();
            lerp(min_alpha, max_alpha, t)
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
