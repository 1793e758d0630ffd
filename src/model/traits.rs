//! Model capability trait and evaluation buffers.
//!
//! The trainer sees a model as an opaque weighted function with two
//! evaluation modes computed from one set of underlying weights:
//!
//! - **Fast**: the cheap mode used for exploration decisions, trained
//!   by distillation
//! - **Full**: the expensive mode trained directly from game outcomes
//!
//! Both modes share the model's batch-accumulation state, so the mode
//! is a parameter on [`Model::calc`] and [`Model::backprop`] rather
//! than a separate type.

use crate::core::EncodedInput;
use crate::model::snapshot::ModelSnapshot;
use serde::{Deserialize, Serialize};

/// Which of the model's two evaluation modes to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvalMode {
    /// Cheap evaluation, trained to mimic `Full`.
    Fast,
    /// Expensive evaluation, trained from game outcomes.
    Full,
}

/// Reusable buffer holding one evaluation's per-action outputs.
///
/// Buffers are created once per trajectory slot and reused across
/// games; [`Evaluation::reset`] resizes without releasing capacity.
#[derive(Clone, Debug, Default)]
pub struct Evaluation {
    out: Vec<f32>,
}

impl Evaluation {
    /// Per-action output probabilities of the last `calc`.
    #[must_use]
    pub fn out(&self) -> &[f32] {
        &self.out
    }

    /// Mutable access for models filling the buffer.
    pub fn out_mut(&mut self) -> &mut [f32] {
        &mut self.out
    }

    /// Resize to `len` outputs, all zero, keeping allocated capacity.
    pub fn reset(&mut self, len: usize) {
        self.out.clear();
        self.out.resize(len, 0.0);
    }

    /// Output probability for one action.
    #[must_use]
    pub fn pct_for_action(&self, action: usize) -> f32 {
        self.out[action]
    }

    /// Action with the highest output (greedy choice; first on ties).
    #[must_use]
    pub fn best_action(&self) -> usize {
        assert!(!self.out.is_empty(), "evaluation holds no outputs");
        let mut best = 0;
        for (action, &pct) in self.out.iter().enumerate().skip(1) {
            if pct > self.out[best] {
                best = action;
            }
        }
        best
    }

    /// Bootstrapped value of this state for its mover.
    ///
    /// `expected` summarizes the realized continuation through `chosen`
    /// (propagated backward from the eventual outcome); the remaining
    /// actions are valued by the model's own outputs. The mover is
    /// worth the larger of the two, clamped to a valid probability.
    #[must_use]
    pub fn clamped_best_pct(&self, chosen: usize, expected: f32) -> f32 {
        let mut best = expected;
        for (action, &pct) in self.out.iter().enumerate() {
            if action != chosen && pct > best {
                best = pct;
            }
        }
        best.clamp(0.0, 1.0)
    }
}

/// Model capability trait.
///
/// Implementations must be deterministic in `calc` for a fixed model
/// state and input, and must accumulate `backprop` contributions
/// additively between `backprop_init` and `learn`.
pub trait Model: Send {
    /// Create an output buffer sized for this model's evaluations.
    fn make_eval(&self) -> Evaluation {
        Evaluation::default()
    }

    /// Evaluate `input` into `eval` under the given mode.
    ///
    /// Resizes `eval` to the input's available-action count.
    fn calc(&self, eval: &mut Evaluation, input: &EncodedInput, mode: EvalMode);

    /// Reset per-batch gradient accumulation.
    fn backprop_init(&mut self);

    /// Accumulate a gradient contribution.
    ///
    /// `eval` holds the forward outputs the contribution is computed
    /// against; `error` is the per-action error vector (sparse in the
    /// TD step, dense in distillation).
    fn backprop(&mut self, eval: &Evaluation, input: &EncodedInput, error: &[f32], mode: EvalMode);

    /// Apply accumulated gradients at the given learning rate.
    fn learn(&mut self, rate: f32);

    /// Shrink weights toward zero at the given decay rate.
    fn normalize(&mut self, rate: f32);

    /// Produce an independent copy.
    fn clone_model(&self) -> Box<dyn Model>;

    /// Human-readable version label; empty if never set.
    fn name(&self) -> &str;

    /// Advance the version label by one step (see [`next_version`]).
    fn increment_name(&mut self);

    /// Structured serializable state.
    fn snapshot(&self) -> ModelSnapshot;
}

/// Advance a version label by one step.
///
/// A trailing decimal suffix is incremented (`"gen-4"` to `"gen-5"`);
/// labels without one gain a `-1` suffix; an empty label becomes `"1"`.
#[must_use]
pub fn next_version(name: &str) -> String {
    if name.is_empty() {
        return "1".to_string();
    }
    let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return format!("{name}-1");
    }
    let (prefix, suffix) = name.split_at(name.len() - digits);
    match suffix.parse::<u64>() {
        Ok(n) => format!("{prefix}{}", n + 1),
        Err(_) => format!("{name}-1"),
    }
}

/// Baseline model for tests: every action scores 0.5, learning is a
/// no-op.
#[derive(Clone, Debug, Default)]
pub struct UniformModel {
    name: String,
}

impl UniformModel {
    /// Create an unnamed uniform model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version label.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Model for UniformModel {
    fn calc(&self, eval: &mut Evaluation, input: &EncodedInput, _mode: EvalMode) {
        eval.reset(input.available_actions());
        eval.out_mut().fill(0.5);
    }

    fn backprop_init(&mut self) {}

    fn backprop(
        &mut self,
        _eval: &Evaluation,
        _input: &EncodedInput,
        _error: &[f32],
        _mode: EvalMode,
    ) {
    }

    fn learn(&mut self, _rate: f32) {}

    fn normalize(&mut self, _rate: f32) {}

    fn clone_model(&self) -> Box<dyn Model> {
        Box::new(self.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn increment_name(&mut self) {
        self.name = next_version(&self.name);
    }

    fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            name: self.name.clone(),
            arch: "uniform".to_string(),
            tensors: Vec::new(),
        }
    }
}
