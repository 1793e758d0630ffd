//! Training infrastructure: trajectory recording, self-play, and the
//! temporal-difference learning passes.
//!
//! ## Overview
//!
//! - **TrajectoryBuffer**: Per-ply records reused across games
//! - **SelfPlayDriver**: Plays one game to completion, filling the
//!   buffer with states, dual evaluations, and chosen actions
//! - **Backward pass**: Walks the finished trajectory in reverse,
//!   bootstrapping value targets and submitting full-mode gradients
//! - **Distillation pass**: Trains the fast evaluator toward the full
//!   evaluator's output
//! - **LearnSchedule**: Commits gradient updates and weight decay on
//!   per-game tick counters
//!
//! ## Usage
//!
//! ```rust,ignore
//! use selftrain::training::{train_on_game, SelfPlayDriver, TrajectoryBuffer};
//!
//! let mut driver = SelfPlayDriver::new(ExplorationConfig::default(), rng);
//! let mut buffer = TrajectoryBuffer::new();
//!
//! driver.play_game(&mut game, model.as_ref(), &mut buffer);
//! let total_error = train_on_game(model.as_mut(), &mut buffer, game.status());
//! schedule.game_finished(model.as_mut(), learn_rate);
//! ```

pub mod backward;
pub mod schedule;
pub mod self_play;
pub mod trajectory;

pub use backward::{backward_td, distill, train_on_game};
pub use schedule::LearnSchedule;
pub use self_play::{replay, ExplorationConfig, SelfPlayDriver};
pub use trajectory::{TrajectoryBuffer, Turn};
