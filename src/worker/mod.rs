//! Model lifecycle management.
//!
//! The [`Worker`] owns the canonical shared model under one lock and
//! runs the background training loop against a private copy of it.
//! External callers query, clone, serialize, or replace the canonical
//! model through short lock-protected operations; the loop touches the
//! lock only at its periodic publish point, so training proceeds
//! almost entirely lock-free.

pub mod diagnostics;
pub mod engine;

pub use diagnostics::ErrorHistory;
pub use engine::{Worker, WorkerConfig};
