//! The background training worker and its publish protocol.
//!
//! One `Mutex` guards the canonical model; everything else the loop
//! touches is private to it. The loop plays games and trains a private
//! model copy without synchronization, then every
//! `publish_interval` iterations takes the lock once: if an external
//! replacement is pending it adopts a clone of the new canonical model
//! (external override wins), otherwise it advances its private model's
//! version label and publishes a clone as the new canonical model.
//! Readers therefore always observe a fully formed model, never a
//! partially trained one.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use thread_priority::{set_current_thread_priority, ThreadPriority};

use crate::core::TrainRng;
use crate::model::{Model, ModelSnapshot};
use crate::rules::Game;
use crate::training::{train_on_game, ExplorationConfig, LearnSchedule, SelfPlayDriver, TrajectoryBuffer};
use crate::worker::diagnostics::ErrorHistory;

/// Worker tuning knobs.
#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// Learning rate for gradient commits.
    pub learn_rate: f32,

    /// Seed for the loop's exploration RNG.
    pub seed: u64,

    /// Iterations between canonical-model synchronizations.
    pub publish_interval: u32,

    /// Capacity of the diagnostic error ring.
    pub error_history: usize,

    /// Exploration policy for self-play.
    pub exploration: ExplorationConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            learn_rate: 1e-3,
            seed: 0,
            publish_interval: 100,
            error_history: 100,
            exploration: ExplorationConfig::default(),
        }
    }
}

impl WorkerConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the learning rate.
    #[must_use]
    pub fn with_learn_rate(mut self, rate: f32) -> Self {
        self.learn_rate = rate;
        self
    }

    /// Set the exploration RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the publish interval.
    #[must_use]
    pub fn with_publish_interval(mut self, interval: u32) -> Self {
        assert!(interval > 0, "publish interval must be positive");
        self.publish_interval = interval;
        self
    }

    /// Set the diagnostic ring capacity.
    #[must_use]
    pub fn with_error_history(mut self, capacity: usize) -> Self {
        self.error_history = capacity;
        self
    }

    /// Set the exploration policy.
    #[must_use]
    pub fn with_exploration(mut self, exploration: ExplorationConfig) -> Self {
        self.exploration = exploration;
        self
    }
}

/// Lock-guarded canonical state shared with external callers.
struct CanonicalSlot {
    model: Box<dyn Model>,
    replace_pending: bool,
    recent_errors: Vec<f32>,
}

struct Shared {
    slot: Mutex<CanonicalSlot>,
    exit: AtomicBool,
    trials: AtomicU64,
}

/// Background self-play trainer owning the canonical shared model.
///
/// The worker is one-shot: `start` spawns the loop, `join` requests a
/// cooperative exit (observed between games, never mid-game) and waits
/// for it. Dropping a running worker joins it.
pub struct Worker<G: Game + Send + 'static> {
    shared: Arc<Shared>,
    config: WorkerConfig,
    game: Option<G>,
    handle: Option<JoinHandle<()>>,
}

impl<G: Game + Send + 'static> Worker<G> {
    /// Create a worker around an initial canonical model and the game
    /// it will train on.
    pub fn new(model: Box<dyn Model>, game: G, config: WorkerConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(CanonicalSlot {
                    model,
                    replace_pending: false,
                    recent_errors: Vec::new(),
                }),
                exit: AtomicBool::new(false),
                trials: AtomicU64::new(0),
            }),
            config,
            game: Some(game),
            handle: None,
        }
    }

    /// Install a new canonical model, discarding the old one.
    ///
    /// The background loop adopts a clone of it at its next publish
    /// point, overriding whatever it trained in the meantime.
    pub fn replace_model(&self, model: Box<dyn Model>) {
        let mut slot = self.shared.slot.lock().unwrap();
        slot.model = model;
        slot.replace_pending = true;
    }

    /// Independent copy of the canonical model.
    pub fn clone_model(&self) -> Box<dyn Model> {
        self.shared.slot.lock().unwrap().model.clone_model()
    }

    /// The canonical model's version label, or `"none"` if unset.
    pub fn model_name(&self) -> String {
        let slot = self.shared.slot.lock().unwrap();
        let name = slot.model.name();
        if name.is_empty() {
            "none".to_string()
        } else {
            name.to_string()
        }
    }

    /// Snapshot of the canonical model.
    pub fn snapshot_model(&self) -> ModelSnapshot {
        self.shared.slot.lock().unwrap().model.snapshot()
    }

    /// Serialize the canonical model into a writer.
    ///
    /// The snapshot is taken under the lock; writing happens outside
    /// it, so a slow writer cannot stall the training loop.
    pub fn serialize_model(&self, writer: &mut dyn io::Write) -> bincode::Result<()> {
        self.snapshot_model().write_to(writer)
    }

    /// The diagnostics ring as of the loop's last publish point,
    /// oldest first.
    pub fn recent_errors(&self) -> Vec<f32> {
        self.shared.slot.lock().unwrap().recent_errors.clone()
    }

    /// Completed training iterations.
    pub fn trials(&self) -> u64 {
        self.shared.trials.load(Ordering::Relaxed)
    }

    /// Whether the background loop has been started and not joined.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawn the background training loop.
    pub fn start(&mut self) {
        assert!(self.handle.is_none(), "worker already started");
        let game = self.game.take().expect("worker already ran");
        let shared = Arc::clone(&self.shared);
        let config = self.config.clone();
        self.handle = Some(thread::spawn(move || run(&shared, game, &config)));
    }

    /// Request a cooperative exit and wait for the loop to observe it.
    ///
    /// The exit flag is checked once per completed game-plus-learning
    /// iteration; a game in progress always runs to completion first.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.shared.exit.store(true, Ordering::Relaxed);
            handle.join().expect("training loop panicked");
        }
    }
}

impl<G: Game + Send + 'static> Drop for Worker<G> {
    fn drop(&mut self) {
        self.join();
    }
}

fn run<G: Game>(shared: &Shared, mut game: G, config: &WorkerConfig) {
    // Self-play training is a low-urgency background workload.
    if let Err(err) = set_current_thread_priority(ThreadPriority::Min) {
        log::warn!("could not lower training thread priority: {err:?}");
    }

    let mut working = {
        let mut slot = shared.slot.lock().unwrap();
        slot.replace_pending = false;
        slot.model.clone_model()
    };

    let mut driver = SelfPlayDriver::new(config.exploration.clone(), TrainRng::new(config.seed));
    let mut buffer = TrajectoryBuffer::new();
    let mut schedule = LearnSchedule::new();
    let mut history = ErrorHistory::new(config.error_history);
    let mut publish_tick = 0u32;

    log::info!("training loop started from model {:?}", working.name());

    while !shared.exit.load(Ordering::Relaxed) {
        driver.play_game(&mut game, working.as_ref(), &mut buffer);
        let total_error = train_on_game(working.as_mut(), &mut buffer, game.status());
        history.record(total_error);
        schedule.game_finished(working.as_mut(), config.learn_rate);

        publish_tick += 1;
        if publish_tick >= config.publish_interval {
            publish_tick = 0;
            let mut slot = shared.slot.lock().unwrap();
            if slot.replace_pending {
                working = slot.model.clone_model();
                slot.replace_pending = false;
                log::debug!("adopted replacement model {:?}", working.name());
            } else {
                working.increment_name();
                slot.model = working.clone_model();
                log::debug!("published model {:?}", working.name());
            }
            slot.recent_errors = history.oldest_first();
        }

        shared.trials.fetch_add(1, Ordering::Relaxed);
    }

    log::info!(
        "training loop stopped after {} trials",
        shared.trials.load(Ordering::Relaxed)
    );
}
