//! Player plugin - movement, dash and camera.

use bevy::prelude::*;

use super::components::*;
use super::movement;

/// Player plugin - handles player movement, dashing and the follow camera.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerConfig>();
        movement::setup_movement_systems(app);
    }
}
