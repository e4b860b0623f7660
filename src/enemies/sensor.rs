//! Engage/disengage range detection with hysteresis.

use bevy::prelude::*;

/// Edge raised when the player crosses one of the sensor radii.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEdge {
    Entered,
    Left,
}

/// Tracks whether the player is "in range" of an enemy.
///
/// The player enters range below `engage` and leaves above `disengage`;
/// in between, the previous answer holds.
#[derive(Debug, Clone)]
pub struct RangeSensor {
    engage: f32,
    disengage: f32,
    in_range: bool,
}

impl RangeSensor {
    pub fn new(engage: f32, disengage: f32) -> Self {
        Self {
            engage,
            disengage,
            in_range: false,
        }
    }

    pub fn in_range(&self) -> bool {
        self.in_range
    }

    /// Feed one distance sample; returns the edge crossed, if any.
    pub fn sample(&mut self, distance: f32) -> Option<RangeEdge> {
        if !self.in_range && distance < self.engage {
            self.in_range = true;
            Some(RangeEdge::Entered)
        } else if self.in_range && distance > self.disengage {
            self.in_range = false;
            Some(RangeEdge::Left)
        } else {
            None
        }
    }
}

/// Distance on the ground plane, ignoring height.
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(b.x - a.x, 0.0, b.z - a.z).length()
}

/// Unit vector from `from` towards `to` on the ground plane.
pub fn horizontal_direction(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z).normalize_or_zero()
}
