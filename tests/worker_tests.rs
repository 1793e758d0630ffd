//! Integration tests for the worker's lifecycle and publish protocol.

use std::time::{Duration, Instant};

use selftrain::{
    next_version, LinearModel, Model, ModelSnapshot, RaceGame, Worker, WorkerConfig,
};

const PUBLISH_INTERVAL: u32 = 10;

fn start_worker(config: WorkerConfig) -> Worker<RaceGame> {
    let model = Box::new(LinearModel::new(4, 3, 42));
    let mut worker = Worker::new(model, RaceGame::default(), config);
    worker.start();
    worker
}

/// Block until the worker has completed at least `target` iterations.
fn wait_for_trials(worker: &Worker<RaceGame>, target: u64) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while worker.trials() < target {
        assert!(
            Instant::now() < deadline,
            "worker stalled below {target} trials"
        );
        std::thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_publish_advances_version_once_per_interval() {
    let mut worker = start_worker(
        WorkerConfig::new()
            .with_publish_interval(PUBLISH_INTERVAL)
            .with_seed(1),
    );

    wait_for_trials(&worker, 35);
    worker.join();

    // Publishes land at every interval boundary; the version label has
    // advanced exactly one step per publish.
    let trials = worker.trials();
    let publishes = trials / u64::from(PUBLISH_INTERVAL);
    assert!(publishes >= 3);
    assert_eq!(worker.model_name(), format!("gen-{publishes}"));
}

#[test]
fn test_published_model_matches_private_clone() {
    let mut worker = start_worker(
        WorkerConfig::new()
            .with_publish_interval(PUBLISH_INTERVAL)
            .with_seed(2),
    );

    wait_for_trials(&worker, 15);
    worker.join();

    // After the loop stops, the canonical model is stable; a clone is
    // bit-identical to it.
    assert_eq!(worker.clone_model().snapshot(), worker.snapshot_model());
}

#[test]
fn test_replace_model_overrides_private_training() {
    let mut worker = start_worker(
        WorkerConfig::new()
            .with_publish_interval(PUBLISH_INTERVAL)
            .with_seed(3),
    );

    let replacement = Box::new(LinearModel::new(4, 3, 99).with_name("override-0"));
    worker.replace_model(replacement);

    // Canonical is swapped immediately; publishes are suppressed until
    // the loop adopts the replacement.
    assert_eq!(worker.model_name(), "override-0");

    // One boundary to adopt, one more to publish the adopted line.
    let seen = worker.trials();
    wait_for_trials(&worker, seen + 2 * u64::from(PUBLISH_INTERVAL) + 1);
    worker.join();

    let name = worker.model_name();
    assert!(name.starts_with("override-"), "unexpected name {name}");
    assert_ne!(name, "override-0");
    assert!(!name.starts_with("gen-"));
}

#[test]
fn test_versions_follow_next_version_chain() {
    let mut worker = start_worker(
        WorkerConfig::new()
            .with_publish_interval(PUBLISH_INTERVAL)
            .with_seed(4),
    );

    wait_for_trials(&worker, 12);
    worker.join();

    let publishes = worker.trials() / u64::from(PUBLISH_INTERVAL);
    let mut expected = "gen-0".to_string();
    for _ in 0..publishes {
        expected = next_version(&expected);
    }
    assert_eq!(worker.model_name(), expected);
}

#[test]
fn test_recent_errors_published_with_model() {
    let capacity = 5;
    let mut worker = start_worker(
        WorkerConfig::new()
            .with_publish_interval(PUBLISH_INTERVAL)
            .with_error_history(capacity)
            .with_seed(5),
    );

    wait_for_trials(&worker, 12);
    worker.join();

    // At least one publish copied the ring out; it holds the most
    // recent totals, capped at its capacity.
    let errors = worker.recent_errors();
    assert_eq!(errors.len(), capacity);
    assert!(errors.iter().all(|e| e.is_finite()));
}

#[test]
fn test_join_stops_the_loop() {
    let mut worker = start_worker(WorkerConfig::new().with_publish_interval(PUBLISH_INTERVAL));

    wait_for_trials(&worker, 5);
    worker.join();
    assert!(!worker.is_running());

    let stopped_at = worker.trials();
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(worker.trials(), stopped_at);
}

#[test]
fn test_serialize_while_training() {
    let mut worker = start_worker(
        WorkerConfig::new()
            .with_publish_interval(PUBLISH_INTERVAL)
            .with_seed(6),
    );

    wait_for_trials(&worker, 5);

    // Accessors work mid-training and always see a coherent model.
    let mut bytes = Vec::new();
    worker.serialize_model(&mut bytes).unwrap();
    let snapshot = ModelSnapshot::from_bytes(&bytes).unwrap();
    assert!(LinearModel::from_snapshot(&snapshot).is_some());

    let name = worker.model_name();
    assert!(name.starts_with("gen-"), "unexpected name {name}");

    worker.join();
}

#[test]
fn test_drop_joins_running_worker() {
    let worker = start_worker(WorkerConfig::new().with_publish_interval(PUBLISH_INTERVAL));
    wait_for_trials(&worker, 2);
    // Dropping must stop the loop rather than leak the thread.
    drop(worker);
}
