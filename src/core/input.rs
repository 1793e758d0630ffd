//! Encoded game state handed to evaluation models.
//!
//! A game encodes its current position into a flat feature vector plus
//! the number of legal actions at that position. The trainer scales its
//! error signals by the action count, so the count travels with the
//! features rather than living in a separate channel.

use serde::{Deserialize, Serialize};

/// Encoded game state as a flat feature vector for model input.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodedInput {
    values: Vec<f32>,
    actions: usize,
}

impl EncodedInput {
    /// Create a new encoded input.
    ///
    /// `actions` is the number of legal actions at the encoded position;
    /// games only encode non-terminal positions, so it is at least 1
    /// there.
    #[must_use]
    pub fn new(values: Vec<f32>, actions: usize) -> Self {
        Self { values, actions }
    }

    /// The feature vector.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of legal actions at the encoded position.
    #[must_use]
    pub fn available_actions(&self) -> usize {
        self.actions
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the feature vector is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
