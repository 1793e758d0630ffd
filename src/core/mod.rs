//! Core trainer types: seats, deterministic RNG, encoded inputs.
//!
//! This module contains the fundamental building blocks that are
//! game-agnostic and model-agnostic. Games and models both speak in
//! these types; nothing here depends on the rest of the crate.

pub mod input;
pub mod player;
pub mod rng;

pub use input::EncodedInput;
pub use player::Seat;
pub use rng::TrainRng;
