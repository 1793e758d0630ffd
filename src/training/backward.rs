//! Learning passes over a finished trajectory.
//!
//! Two passes share one gradient batch:
//!
//! 1. **Backward TD** ([`backward_td`]): walks the trajectory in
//!    reverse. The terminal turn's target is the actual outcome; every
//!    earlier turn's target is bootstrapped from the next turn's full
//!    evaluation, flipped whenever the mover changes between plies.
//!    Errors are injected sparsely at the chosen action, scaled by the
//!    legal-action count so gradient magnitude stays comparable across
//!    branching factors.
//! 2. **Distillation** ([`distill`]): walks the trajectory forward,
//!    training the fast evaluator toward the full evaluator's output
//!    with a dense error over all legal actions. The game outcome is
//!    not consulted.
//!
//! Both passes accumulate into the model's batch; committing the batch
//! is the scheduler's job, not theirs.

use crate::model::{EvalMode, Model};
use crate::rules::GameStatus;
use crate::training::trajectory::TrajectoryBuffer;

/// Run both learning passes for one finished game.
///
/// Resets the model's gradient batch, then applies the backward TD
/// pass and the distillation pass. Returns the summed total squared
/// error of both.
pub fn train_on_game(
    model: &mut dyn Model,
    buffer: &mut TrajectoryBuffer,
    result: GameStatus,
) -> f32 {
    model.backprop_init();
    backward_td(model, buffer, result) + distill(model, buffer)
}

/// Backward temporal-difference pass over a finished trajectory.
///
/// Submits one sparse full-mode gradient contribution per recorded
/// turn and returns the total squared error.
pub fn backward_td(model: &mut dyn Model, buffer: &mut TrajectoryBuffer, result: GameStatus) -> f32 {
    let turns = buffer.recorded_mut();
    assert!(!turns.is_empty(), "trajectory holds no turns");

    let mut total_error = 0.0f32;
    let last = turns.len() - 1;

    // Terminal turn: the mover either won outright or did not.
    let last_won = result.is_win_for(turns[last].mover);
    {
        let turn = &mut turns[last];
        let actions = turn.input.available_actions();
        let eval_full = turn
            .eval_full
            .as_ref()
            .expect("recorded turn is missing its full evaluation");
        let predicted = eval_full.pct_for_action(turn.chosen_action);
        let error = predicted - if last_won { 1.0 } else { 0.0 };

        turn.error_full.clear();
        turn.error_full.resize(actions, 0.0);
        turn.error_full[turn.chosen_action] = error * actions as f32;

        model.backprop(eval_full, &turn.input, &turn.error_full, EvalMode::Full);
        total_error += error * error;
    }

    // Earlier turns bootstrap from the turn one ply ahead. The carried
    // value is always expressed from the later turn's mover.
    let mut carried = if last_won { 1.0f32 } else { 0.0 };
    for i in (0..last).rev() {
        let (head, tail) = turns.split_at_mut(i + 1);
        let turn = &mut head[i];
        let next = &tail[0];

        let next_full = next
            .eval_full
            .as_ref()
            .expect("recorded turn is missing its full evaluation");
        let mut expected = next_full.clamped_best_pct(next.chosen_action, carried);
        if next.mover != turn.mover {
            expected = 1.0 - expected;
        }

        let actions = turn.input.available_actions();
        let eval_full = turn
            .eval_full
            .as_ref()
            .expect("recorded turn is missing its full evaluation");
        let predicted = eval_full.pct_for_action(turn.chosen_action);
        let error = predicted - expected;

        turn.error_full.clear();
        turn.error_full.resize(actions, 0.0);
        turn.error_full[turn.chosen_action] = error * actions as f32;

        model.backprop(eval_full, &turn.input, &turn.error_full, EvalMode::Full);
        total_error += error * error;
        carried = expected;
    }

    total_error
}

/// Distillation pass: train the fast evaluator toward the full one.
///
/// Submits one dense fast-mode gradient contribution per recorded turn
/// and returns the total squared error (the error vectors' self dot
/// products).
pub fn distill(model: &mut dyn Model, buffer: &mut TrajectoryBuffer) -> f32 {
    let mut total_error = 0.0f32;

    for turn in buffer.recorded_mut() {
        let actions = turn.input.available_actions();
        let eval = turn
            .eval
            .as_ref()
            .expect("recorded turn is missing its fast evaluation");
        let eval_full = turn
            .eval_full
            .as_ref()
            .expect("recorded turn is missing its full evaluation");

        turn.error.clear();
        turn.error.resize(actions, 0.0);
        for ((slot, &fast), &full) in turn.error.iter_mut().zip(eval.out()).zip(eval_full.out()) {
            *slot = fast - full;
        }

        model.backprop(eval, &turn.input, &turn.error, EvalMode::Fast);
        total_error += turn.error.iter().map(|e| e * e).sum::<f32>();
    }

    total_error
}
