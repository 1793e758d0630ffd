//! Integration tests for the self-play and learning pipeline.

use selftrain::{
    distill, replay, train_on_game, EvalMode, ExplorationConfig, Game, GameStatus, LinearModel,
    Model, RaceGame, SelfPlayDriver, TrainRng, TrajectoryBuffer, UniformModel,
};

fn driver(seed: u64) -> SelfPlayDriver {
    SelfPlayDriver::new(ExplorationConfig::default(), TrainRng::new(seed))
}

// =============================================================================
// Self-Play Tests
// =============================================================================

#[test]
fn test_self_play_fills_trajectory() {
    let mut game = RaceGame::default();
    let model = LinearModel::new(4, 3, 42);
    let mut buffer = TrajectoryBuffer::new();

    let plies = driver(1).play_game(&mut game, &model, &mut buffer);

    assert!(plies > 0);
    assert_eq!(buffer.len(), plies);
    assert!(game.status().is_over());

    for turn in buffer.recorded() {
        assert!(turn.eval.is_some());
        assert!(turn.eval_full.is_some());
        assert!(turn.chosen_action < turn.input.available_actions());
    }
}

#[test]
fn test_exploration_stays_legal_across_many_games() {
    let model = LinearModel::new(4, 3, 42);
    let mut buffer = TrajectoryBuffer::new();

    for seed in 0..100 {
        let mut game = RaceGame::default();
        driver(seed).play_game(&mut game, &model, &mut buffer);
        for turn in buffer.recorded() {
            assert!(turn.chosen_action < turn.input.available_actions());
        }
    }
}

#[test]
fn test_buffer_reused_across_games() {
    let model = LinearModel::new(4, 3, 42);
    let mut buffer = TrajectoryBuffer::new();
    let mut driver = driver(7);

    let mut game = RaceGame::default();
    driver.play_game(&mut game, &model, &mut buffer);
    let high_water = buffer.high_water();
    assert!(high_water > 0);

    for _ in 0..20 {
        let mut game = RaceGame::default();
        driver.play_game(&mut game, &model, &mut buffer);
        // The arena only ever grows.
        assert!(buffer.high_water() >= high_water);
    }
}

// =============================================================================
// Learning Pipeline Tests
// =============================================================================

#[test]
fn test_pipeline_produces_finite_error() {
    let mut game = RaceGame::default();
    let mut model = LinearModel::new(4, 3, 42);
    let mut buffer = TrajectoryBuffer::new();
    let mut driver = driver(3);

    for _ in 0..10 {
        driver.play_game(&mut game, &model, &mut buffer);
        let total = train_on_game(&mut model, &mut buffer, game.status());
        assert!(total.is_finite());
        assert!(total >= 0.0);
    }
}

#[test]
fn test_learning_changes_weights() {
    let mut game = RaceGame::default();
    let mut model = LinearModel::new(4, 3, 42);
    let initial = model.snapshot();
    let mut buffer = TrajectoryBuffer::new();
    let mut driver = driver(5);

    driver.play_game(&mut game, &model, &mut buffer);
    train_on_game(&mut model, &mut buffer, game.status());
    model.learn(0.1);

    assert_ne!(model.snapshot(), initial);
}

#[test]
fn test_distillation_converges_on_fixed_state() {
    let mut game = RaceGame::default();
    let mut model = LinearModel::new(4, 3, 42);
    let mut buffer = TrajectoryBuffer::new();
    driver(9).play_game(&mut game, &model, &mut buffer);

    // Repeatedly distill and commit on the same trajectory; the fast
    // head's gap to the (untouched) full head must shrink.
    model.backprop_init();
    replay(&model, &mut buffer);
    let first = distill(&mut model, &mut buffer);
    model.learn(0.25);

    let mut last = first;
    for _ in 0..20 {
        model.backprop_init();
        replay(&model, &mut buffer);
        last = distill(&mut model, &mut buffer);
        model.learn(0.25);
    }

    assert!(last < first);
}

#[test]
fn test_terminal_result_feeds_backward_pass() {
    let mut game = RaceGame::new(3, 3);
    let mut model = LinearModel::new(4, 3, 42);
    let mut buffer = TrajectoryBuffer::new();

    let plies = driver(2).play_game(&mut game, &model, &mut buffer);
    assert!(plies >= 1);
    assert_ne!(game.status(), GameStatus::Playing);

    let total = train_on_game(&mut model, &mut buffer, game.status());
    assert!(total.is_finite());
}

// =============================================================================
// Replay Tests
// =============================================================================

#[test]
fn test_replay_rescores_against_new_model() {
    let mut game = RaceGame::default();
    let trained = LinearModel::new(4, 3, 42);
    let mut buffer = TrajectoryBuffer::new();
    driver(11).play_game(&mut game, &trained, &mut buffer);

    let actions: Vec<_> = buffer.recorded().iter().map(|t| t.chosen_action).collect();

    // Re-score the stored trajectory with a different model.
    let uniform = UniformModel::new();
    replay(&uniform, &mut buffer);

    for (turn, &action) in buffer.recorded().iter().zip(&actions) {
        assert_eq!(turn.chosen_action, action);
        let eval = turn.eval.as_ref().unwrap();
        assert!(eval.out().iter().all(|&p| p == 0.5));
    }
}

// =============================================================================
// Model Contract Tests
// =============================================================================

#[test]
fn test_calc_is_deterministic_across_calls() {
    let model = LinearModel::new(4, 3, 42);
    let game = RaceGame::default();
    let input = game.encode();

    let mut a = model.make_eval();
    let mut b = model.make_eval();
    model.calc(&mut a, &input, EvalMode::Full);
    model.calc(&mut b, &input, EvalMode::Full);
    assert_eq!(a.out(), b.out());
}

#[test]
fn test_snapshot_restores_equivalent_model() {
    let model = LinearModel::new(4, 3, 42);
    let restored = LinearModel::from_snapshot(&model.snapshot()).unwrap();

    let game = RaceGame::default();
    let input = game.encode();
    let mut a = model.make_eval();
    let mut b = restored.make_eval();
    model.calc(&mut a, &input, EvalMode::Fast);
    restored.calc(&mut b, &input, EvalMode::Fast);
    assert_eq!(a.out(), b.out());
}
