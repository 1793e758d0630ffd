//! Self-play driver: plays one game to completion, recording a
//! trajectory.
//!
//! Each game draws a single "exploring" flag. Exploring games mix a
//! uniform random action (30% of decisions) with the fast evaluator's
//! greedy choice; non-exploring games always follow the full
//! evaluator. The random branch reuses the threshold draw itself,
//! rescaled into the legal-action range, so one uniform draw decides
//! both the branch and the action.

use crate::core::TrainRng;
use crate::model::{EvalMode, Model};
use crate::rules::{Game, GameStatus};
use crate::training::trajectory::TrajectoryBuffer;

/// Exploration policy parameters.
///
/// `random_action_prob` is both the branch threshold and the rescale
/// divisor for the random-action draw; the two must change together,
/// which is why they are one field.
#[derive(Clone, Debug)]
pub struct ExplorationConfig {
    /// Probability that a game explores at all.
    pub explore_game_prob: f64,

    /// Within an exploring game, probability that a decision picks a
    /// uniformly random legal action instead of the fast evaluator's
    /// greedy choice.
    pub random_action_prob: f32,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            explore_game_prob: 0.5,
            random_action_prob: 0.3,
        }
    }
}

impl ExplorationConfig {
    /// Create the default exploration policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-game exploring probability.
    #[must_use]
    pub fn with_explore_game_prob(mut self, prob: f64) -> Self {
        self.explore_game_prob = prob;
        self
    }

    /// Set the per-decision random-action probability.
    #[must_use]
    pub fn with_random_action_prob(mut self, prob: f32) -> Self {
        self.random_action_prob = prob;
        self
    }
}

/// Rescale a sub-threshold uniform draw into a legal action index.
///
/// `r` is uniform on `[0, threshold)`, so `r / threshold` is uniform on
/// `[0, 1)`; scaled by the action count it lands in `[0, actions)`.
/// The final clamp absorbs the float rounding that could otherwise
/// produce `actions` when `r` sits just under the threshold.
fn scaled_random_action(r: f32, threshold: f32, actions: usize) -> usize {
    debug_assert!(r < threshold);
    ((r / threshold * actions as f32) as usize).min(actions - 1)
}

/// Drives single games of self-play into a trajectory buffer.
pub struct SelfPlayDriver {
    config: ExplorationConfig,
    rng: TrainRng,
}

impl SelfPlayDriver {
    /// Create a driver with the given exploration policy and RNG.
    #[must_use]
    pub fn new(config: ExplorationConfig, rng: TrainRng) -> Self {
        Self { config, rng }
    }

    /// Play one game to its terminal outcome.
    ///
    /// Resets the game, records one [`crate::training::Turn`] per ply
    /// (growing the buffer as needed), and returns the ply count. Both
    /// evaluator outputs are computed into the slot's reused buffers
    /// before the action is chosen.
    pub fn play_game<G: Game + ?Sized>(
        &mut self,
        game: &mut G,
        model: &dyn Model,
        buffer: &mut TrajectoryBuffer,
    ) -> usize {
        game.init();
        buffer.begin_game();
        let exploring = self.rng.gen_bool(self.config.explore_game_prob);

        while game.status() == GameStatus::Playing {
            let turn = buffer.next_slot();
            turn.input = game.encode();
            turn.mover = game.to_move();

            let eval = turn.eval.get_or_insert_with(|| model.make_eval());
            model.calc(eval, &turn.input, EvalMode::Fast);
            let eval_full = turn.eval_full.get_or_insert_with(|| model.make_eval());
            model.calc(eval_full, &turn.input, EvalMode::Full);

            turn.chosen_action = if exploring {
                let r = self.rng.unit_f32();
                if r < self.config.random_action_prob {
                    scaled_random_action(
                        r,
                        self.config.random_action_prob,
                        turn.input.available_actions(),
                    )
                } else {
                    eval.best_action()
                }
            } else {
                eval_full.best_action()
            };

            game.advance(turn.chosen_action);
        }

        buffer.len()
    }
}

/// Recompute both evaluator outputs over an already-recorded
/// trajectory.
///
/// Chosen actions are left untouched; only the evaluation snapshots are
/// refreshed, e.g. to re-score a stored trajectory against an updated
/// model.
pub fn replay(model: &dyn Model, buffer: &mut TrajectoryBuffer) {
    for turn in buffer.recorded_mut() {
        let eval = turn.eval.get_or_insert_with(|| model.make_eval());
        model.calc(eval, &turn.input, EvalMode::Fast);
        let eval_full = turn.eval_full.get_or_insert_with(|| model.make_eval());
        model.calc(eval_full, &turn.input, EvalMode::Full);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::RaceGame;
    use crate::model::UniformModel;
    use proptest::prelude::*;

    fn driver(seed: u64) -> SelfPlayDriver {
        SelfPlayDriver::new(ExplorationConfig::default(), TrainRng::new(seed))
    }

    #[test]
    fn test_play_game_records_every_ply() {
        let mut game = RaceGame::default();
        let model = UniformModel::new();
        let mut buffer = TrajectoryBuffer::new();

        let plies = driver(42).play_game(&mut game, &model, &mut buffer);

        assert!(plies > 0);
        assert_eq!(buffer.len(), plies);
        assert!(game.status().is_over());
        for turn in buffer.recorded() {
            assert!(turn.eval.is_some());
            assert!(turn.eval_full.is_some());
            assert!(turn.input.available_actions() > 0);
        }
    }

    #[test]
    fn test_chosen_actions_are_legal() {
        let model = UniformModel::new();
        let mut buffer = TrajectoryBuffer::new();

        for seed in 0..50 {
            let mut game = RaceGame::default();
            driver(seed).play_game(&mut game, &model, &mut buffer);
            for turn in buffer.recorded() {
                assert!(turn.chosen_action < turn.input.available_actions());
            }
        }
    }

    #[test]
    fn test_buffer_growth_is_idempotent() {
        let model = UniformModel::new();
        let mut buffer = TrajectoryBuffer::new();
        let mut driver = driver(7);
        let mut high_water = 0;

        for _ in 0..30 {
            let mut game = RaceGame::default();
            driver.play_game(&mut game, &model, &mut buffer);
            assert!(buffer.high_water() >= high_water);
            high_water = buffer.high_water();
        }
    }

    #[test]
    fn test_movers_recorded() {
        let mut game = RaceGame::default();
        let model = UniformModel::new();
        let mut buffer = TrajectoryBuffer::new();

        driver(3).play_game(&mut game, &model, &mut buffer);

        // The race alternates seats strictly.
        for pair in buffer.recorded().windows(2) {
            assert_ne!(pair[0].mover, pair[1].mover);
        }
    }

    #[test]
    fn test_replay_refreshes_evaluations() {
        let mut game = RaceGame::default();
        let model = UniformModel::new();
        let mut buffer = TrajectoryBuffer::new();
        driver(11).play_game(&mut game, &model, &mut buffer);

        // Stamp the recorded outputs, then replay to overwrite them.
        let actions: Vec<_> = buffer.recorded().iter().map(|t| t.chosen_action).collect();
        for turn in buffer.recorded_mut() {
            turn.eval.as_mut().unwrap().out_mut().fill(0.0);
        }

        replay(&model, &mut buffer);

        for (turn, &action) in buffer.recorded().iter().zip(&actions) {
            assert_eq!(turn.chosen_action, action);
            assert!(turn.eval.as_ref().unwrap().out().iter().all(|&p| p == 0.5));
        }
    }

    #[test]
    fn test_scaled_random_action_spans_range() {
        // Draws near the threshold reach the top of the action range.
        assert_eq!(scaled_random_action(0.0, 0.3, 4), 0);
        assert_eq!(scaled_random_action(0.29, 0.3, 4), 3);
    }

    proptest! {
        #[test]
        fn prop_scaled_random_action_in_range(r in 0.0f32..0.3, actions in 1usize..64) {
            let index = scaled_random_action(r, 0.3, actions);
            prop_assert!(index < actions);
        }
    }
}
