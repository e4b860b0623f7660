//! Knockback travel under constant deceleration.
//!
//! Given an initial speed `v0` and a travel distance `d`, the body decelerates
//! at `a = v0² / 2d` and comes to rest after `v0 / a` seconds, having covered
//! exactly `d`. Heavier bodies go less far (`d / m`) and slower (`v0 / √m`).

use bevy::prelude::*;

use super::scheduler::Progress;

#[derive(Debug, Clone)]
pub struct Knockback {
    initial_velocity: f32,
    deceleration: f32,
    direction: Vec3,
    distance: f32,
    duration: f32,
    elapsed: f32,
    travelled: f32,
}

impl Knockback {
    /// Returns `None` for a zero direction or a non-positive or non-finite
    /// speed or distance.
    pub fn new(initial_velocity: f32, distance: f32, direction: Vec3, mass: f32) -> Option<Self> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || !(mass > 0.0) {
            return None;
        }

        let distance = distance / mass;
        let initial_velocity = initial_velocity / mass.sqrt();
        if !(distance > 0.0 && initial_velocity > 0.0) {
            return None;
        }

        let deceleration = initial_velocity.powi(2) / (2.0 * distance);
        let duration = initial_velocity / deceleration;
        if ![initial_velocity, distance, deceleration, duration]
            .iter()
            .all(|value| value.is_finite() && *value > 0.0)
        {
            return None;
        }

        Some(Self {
            initial_velocity,
            deceleration,
            direction,
            distance,
            duration,
            elapsed: 0.0,
            travelled: 0.0,
        })
    }

    /// Time until the body comes to rest.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Mass-scaled travel distance.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn deceleration(&self) -> f32 {
        self.deceleration
    }

    pub fn travelled(&self) -> f32 {
        self.travelled
    }

    pub fn velocity(&self) -> f32 {
        (self.initial_velocity - self.deceleration * self.elapsed).max(0.0)
    }

    fn position_at(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, self.duration);
        (self.initial_velocity * t - 0.5 * self.deceleration * t * t).min(self.distance)
    }

    /// Advance one physics tick. Returns this tick's displacement.
    pub fn step(&mut self, dt: f32) -> (Vec3, Progress) {
        let target = self.position_at(self.elapsed + dt);
        let advance = (target - self.travelled).max(0.0);
        self.travelled += advance;
        self.elapsed += dt;

        let progress = if self.travelled >= self.distance || self.elapsed >= self.duration {
            Progress::Done
        } else {
            Progress::Pending
        };
        (self.direction * advance, progress)
    }
}
