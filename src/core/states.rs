//! Game state definitions that control the overall flow of the game.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading`
/// - `InGame` once the arena is ready
/// - `Paused` freezes enemies and projectiles but keeps the world visible
/// - `GameOver` when the player dies
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state
    #[default]
    Loading,
    /// Active gameplay
    InGame,
    /// Game is paused (overlay on gameplay)
    Paused,
    /// Player has died
    GameOver,
}
