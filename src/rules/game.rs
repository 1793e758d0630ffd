//! Game trait for trainer-driven self-play.
//!
//! Games implement `Game` to define their rules:
//! - What a fresh start state looks like
//! - How a chosen action advances the state
//! - Win/loss/draw detection
//! - How the current position encodes for model input

use crate::core::{EncodedInput, Seat};

/// Result of querying a game's progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// The game continues; at least one legal action exists.
    Playing,
    /// First seat won.
    P1Win,
    /// Second seat won.
    P2Win,
    /// Terminal without a winner.
    Draw,
}

impl GameStatus {
    /// Whether the game has reached a terminal state.
    #[must_use]
    pub fn is_over(self) -> bool {
        self != GameStatus::Playing
    }

    /// The winning seat, if any.
    #[must_use]
    pub fn winner(self) -> Option<Seat> {
        match self {
            GameStatus::P1Win => Some(Seat::P1),
            GameStatus::P2Win => Some(Seat::P2),
            GameStatus::Playing | GameStatus::Draw => None,
        }
    }

    /// Check if a seat won.
    #[must_use]
    pub fn is_win_for(self, seat: Seat) -> bool {
        self.winner() == Some(seat)
    }
}

/// Game trait.
///
/// The self-play driver runs one game to completion through this
/// interface, recording a [`crate::training::Turn`] per ply.
///
/// ## Implementation Notes
///
/// - `advance` is only called with action indices in
///   `0..encode().available_actions()` for the current position
/// - `encode` is only called while `status()` is `Playing`, and must
///   report at least one available action there
/// - A game that never terminates violates this contract; the trainer
///   does not guard against it
pub trait Game {
    /// Reset to a fresh start state.
    fn init(&mut self);

    /// Apply a legal action to the current position.
    fn advance(&mut self, action: usize);

    /// Current progress of the game.
    fn status(&self) -> GameStatus;

    /// Encode the current position for model input.
    fn encode(&self) -> EncodedInput;

    /// The seat to move at the current position.
    fn to_move(&self) -> Seat;
}
