//! Evaluation model integration for the trainer.
//!
//! This module defines the capability interface the training loop
//! drives, plus reference implementations.
//!
//! ## Overview
//!
//! - **Trait**: [`Model`] — dual-mode evaluation, batch gradient
//!   accumulation, learning-rate application, cloning, version labels,
//!   snapshots
//! - **Buffers**: [`Evaluation`] — reusable per-turn output buffers
//! - **Snapshots**: [`ModelSnapshot`] — structured serializable state
//! - **Baselines**: [`UniformModel`] for tests, [`LinearModel`] as a
//!   real trainable reference

pub mod linear;
pub mod snapshot;
pub mod traits;

pub use linear::LinearModel;
pub use snapshot::{ModelSnapshot, NamedTensor};
pub use traits::{next_version, EvalMode, Evaluation, Model, UniformModel};
