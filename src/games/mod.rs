//! Built-in games for exercising the trainer.
//!
//! Production deployments supply their own [`crate::rules::Game`]
//! implementations; the game here exists to validate the training loop
//! end to end and to keep the worker integration tests fast.

pub mod race;

pub use race::RaceGame;
