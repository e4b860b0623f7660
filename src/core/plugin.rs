//! Core plugin that sets up game states and global events.

use bevy::prelude::*;

use super::events::*;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<GameState>()
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()
            // Nothing to preload yet, so go straight to the game
            .add_systems(OnEnter(GameState::Loading), start_game)
            .add_systems(
                Update,
                handle_pause_input
                    .run_if(resource_exists::<ButtonInput<KeyCode>>)
                    .run_if(in_state(GameState::InGame).or(in_state(GameState::Paused))),
            );
    }
}

fn start_game(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => {
                info!("Paused");
                next_state.set(GameState::Paused)
            }
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}
