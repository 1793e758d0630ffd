//! Trainable linear reference model.
//!
//! One sigmoid head per evaluation mode over the encoded input, with a
//! bias column. Small enough to train inside tests, complete enough to
//! exercise every capability the trainer drives: dual-mode evaluation,
//! additive gradient accumulation, learning-rate application, weight
//! decay, cloning, version labels, and snapshot restore.

use crate::core::{EncodedInput, TrainRng};
use crate::model::snapshot::{ModelSnapshot, NamedTensor};
use crate::model::traits::{next_version, EvalMode, Evaluation, Model};

const ARCH: &str = "linear-sigmoid";

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

/// One mode's weights and gradient accumulator.
///
/// Layout is row-major `[actions][input_dim + 1]`, bias last.
#[derive(Clone, Debug)]
struct Head {
    weights: Vec<f32>,
    grads: Vec<f32>,
}

impl Head {
    fn random(rng: &mut TrainRng, len: usize) -> Self {
        let weights = (0..len).map(|_| (rng.unit_f32() - 0.5) * 0.2).collect();
        Self {
            weights,
            grads: vec![0.0; len],
        }
    }

    fn from_weights(weights: Vec<f32>) -> Self {
        let len = weights.len();
        Self {
            weights,
            grads: vec![0.0; len],
        }
    }
}

/// Linear model with independent sigmoid heads for the fast and full
/// evaluation modes.
#[derive(Clone, Debug)]
pub struct LinearModel {
    name: String,
    input_dim: usize,
    max_actions: usize,
    fast: Head,
    full: Head,
}

impl LinearModel {
    /// Create a randomly initialized model.
    ///
    /// `input_dim` is the encoded-input length; `max_actions` bounds
    /// the per-position action count. The version label starts at
    /// `"gen-0"`.
    #[must_use]
    pub fn new(input_dim: usize, max_actions: usize, seed: u64) -> Self {
        assert!(max_actions > 0, "model needs at least one action output");
        let mut rng = TrainRng::new(seed);
        let len = max_actions * (input_dim + 1);
        Self {
            name: "gen-0".to_string(),
            input_dim,
            max_actions,
            fast: Head::random(&mut rng, len),
            full: Head::random(&mut rng, len),
        }
    }

    /// Set the version label.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restore a model from a snapshot.
    ///
    /// Returns `None` if the snapshot's architecture tag or tensor
    /// shapes do not describe a linear model.
    #[must_use]
    pub fn from_snapshot(snapshot: &ModelSnapshot) -> Option<Self> {
        if snapshot.arch != ARCH {
            return None;
        }
        let fast = snapshot.tensor("fast")?;
        let full = snapshot.tensor("full")?;
        if fast.shape.len() != 2 || full.shape != fast.shape {
            return None;
        }
        let (rows, cols) = (fast.shape[0], fast.shape[1]);
        if rows == 0 || cols == 0 {
            return None;
        }
        if fast.data.len() != rows * cols || full.data.len() != rows * cols {
            return None;
        }
        Some(Self {
            name: snapshot.name.clone(),
            input_dim: cols - 1,
            max_actions: rows,
            fast: Head::from_weights(fast.data.clone()),
            full: Head::from_weights(full.data.clone()),
        })
    }

    fn head(&self, mode: EvalMode) -> &Head {
        match mode {
            EvalMode::Fast => &self.fast,
            EvalMode::Full => &self.full,
        }
    }

    fn head_mut(&mut self, mode: EvalMode) -> &mut Head {
        match mode {
            EvalMode::Fast => &mut self.fast,
            EvalMode::Full => &mut self.full,
        }
    }

    fn tensor(&self, label: &str, head: &Head) -> NamedTensor {
        NamedTensor {
            label: label.to_string(),
            shape: vec![self.max_actions, self.input_dim + 1],
            data: head.weights.clone(),
        }
    }
}

impl Model for LinearModel {
    fn calc(&self, eval: &mut Evaluation, input: &EncodedInput, mode: EvalMode) {
        let actions = input.available_actions();
        assert!(
            actions <= self.max_actions,
            "input exposes more actions than the model supports"
        );
        assert_eq!(input.len(), self.input_dim, "input length mismatch");

        eval.reset(actions);
        let head = self.head(mode);
        let stride = self.input_dim + 1;
        for a in 0..actions {
            let row = &head.weights[a * stride..(a + 1) * stride];
            let mut z = row[self.input_dim];
            for (w, x) in row.iter().zip(input.values()) {
                z += w * x;
            }
            eval.out_mut()[a] = sigmoid(z);
        }
    }

    fn backprop_init(&mut self) {
        self.fast.grads.fill(0.0);
        self.full.grads.fill(0.0);
    }

    fn backprop(&mut self, eval: &Evaluation, input: &EncodedInput, error: &[f32], mode: EvalMode) {
        let stride = self.input_dim + 1;
        let input_dim = self.input_dim;
        let head = self.head_mut(mode);
        for (a, &e) in error.iter().enumerate() {
            if e == 0.0 {
                continue;
            }
            let out = eval.pct_for_action(a);
            let g = e * out * (1.0 - out);
            let row = &mut head.grads[a * stride..(a + 1) * stride];
            for (slot, x) in row.iter_mut().zip(input.values()) {
                *slot += g * x;
            }
            row[input_dim] += g;
        }
    }

    fn learn(&mut self, rate: f32) {
        for head in [&mut self.fast, &mut self.full] {
            for (w, g) in head.weights.iter_mut().zip(&head.grads) {
                *w -= rate * g;
            }
        }
    }

    fn normalize(&mut self, rate: f32) {
        for head in [&mut self.fast, &mut self.full] {
            for w in &mut head.weights {
                *w *= 1.0 - rate;
            }
        }
    }

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
            arch: ARCH.to_string(),
            tensors: vec![self.tensor("fast", &self.fast), self.tensor("full", &self.full)],
        }
    }
}
