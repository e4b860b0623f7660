//! Player-related components.

use bevy::prelude::*;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Dash state. While `remaining > 0` the player is dashing.
#[derive(Component, Default, Debug)]
pub struct Dash {
    pub remaining: f32,
    pub cooldown: f32,
    pub direction: Vec3,
}

impl Dash {
    pub fn is_dashing(&self) -> bool {
        self.remaining > 0.0
    }
}

/// Configuration for the top-down character controller.
#[derive(Resource)]
pub struct PlayerConfig {
    /// Base movement speed in units per second
    pub move_speed: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    /// Camera offset from the player
    pub camera_offset: Vec3,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            dash_speed: 14.0,
            dash_duration: 0.2,
            dash_cooldown: 0.8,
            camera_offset: Vec3::new(0.0, 12.0, 8.0),
        }
    }
}

/// Marker for the camera that follows the player.
#[derive(Component)]
pub struct PlayerCamera;
