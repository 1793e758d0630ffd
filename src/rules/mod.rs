//! Game contract consumed by the trainer.
//!
//! Games implement `Game` to define:
//! - How a fresh game starts and how actions advance it
//! - When the game is over and who won
//! - How the current position is encoded for model input
//!
//! The trainer calls into `Game` but never interprets game-specific
//! concepts directly.

pub mod game;

pub use game::{Game, GameStatus};
