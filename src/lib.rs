//! # selftrain
//!
//! A self-play temporal-difference training engine for two-player game
//! evaluators.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: The trainer never interprets game rules.
//!    Games plug in through the `Game` trait; only the encoded state
//!    and the legal-action count cross the boundary.
//!
//! 2. **Model-Agnostic**: The evaluation model is an opaque weighted
//!    function with a fast and a full mode sharing one set of weights.
//!    The trainer drives it through the `Model` capability trait.
//!
//! 3. **Lock-Free Training, Locked Publishing**: The background loop
//!    trains a private model copy without synchronization and touches
//!    the shared canonical model only at its periodic publish point.
//!    Readers always get fully formed clones, never references into
//!    the locked instance.
//!
//! ## Architecture
//!
//! - **Self-play**: One game per iteration fills a trajectory buffer
//!   that is reused across games and grows to the longest game seen.
//!
//! - **Backward TD**: The finished trajectory is walked in reverse;
//!   each turn's value target bootstraps from the next turn's full
//!   evaluation, flipped when the mover alternates.
//!
//! - **Distillation**: The cheap fast evaluator is trained toward the
//!   expensive full evaluator's outputs, compressing its knowledge
//!   into the mode used for exploration decisions.
//!
//! - **Versioned publishing**: Every hundredth iteration the worker
//!   publishes a named clone of its private model, or adopts an
//!   externally installed replacement instead.
//!
//! ## Modules
//!
//! - `core`: Seats, deterministic RNG, encoded inputs
//! - `rules`: The `Game` trait games implement
//! - `games`: A built-in race game for tests
//! - `model`: The `Model` capability trait, buffers, snapshots, and
//!   reference models
//! - `training`: Trajectory buffer, self-play driver, learning passes,
//!   scheduler
//! - `worker`: The lock-protected model lifecycle manager

pub mod core;
pub mod games;
pub mod model;
pub mod rules;
pub mod training;
pub mod worker;

// Re-export commonly used types
pub use crate::core::{EncodedInput, Seat, TrainRng};

pub use crate::rules::{Game, GameStatus};

pub use crate::games::RaceGame;

pub use crate::model::{
    next_version, EvalMode, Evaluation, LinearModel, Model, ModelSnapshot, NamedTensor,
    UniformModel,
};

pub use crate::training::{
    backward_td, distill, replay, train_on_game, ExplorationConfig, LearnSchedule, SelfPlayDriver,
    TrajectoryBuffer, Turn,
};

pub use crate::worker::{ErrorHistory, Worker, WorkerConfig};
