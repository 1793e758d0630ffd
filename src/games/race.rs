//! Minimal race game for testing the trainer.
//!
//! Two seats race along their own tracks: on your turn you advance
//! 1..=`max_step` squares, and the first seat to reach the target wins.
//! There are no draws and every game terminates within a bounded ply
//! count. The legal-action count shrinks as a seat nears the target,
//! which exercises the trainer's per-turn action-count handling.

use crate::core::{EncodedInput, Seat};
use crate::rules::{Game, GameStatus};

/// Two-player race to a target square.
#[derive(Clone, Debug)]
pub struct RaceGame {
    target: u32,
    max_step: u32,
    positions: [u32; 2],
    to_move: Seat,
    winner: Option<Seat>,
}

impl RaceGame {
    /// Create a race to `target` with steps of 1..=`max_step`.
    #[must_use]
    pub fn new(target: u32, max_step: u32) -> Self {
        assert!(target > 0, "target must be positive");
        assert!(max_step > 0, "max_step must be positive");
        Self {
            target,
            max_step,
            positions: [0, 0],
            to_move: Seat::P1,
            winner: None,
        }
    }

    /// Position of a seat on its track.
    #[must_use]
    pub fn position(&self, seat: Seat) -> u32 {
        self.positions[seat.index()]
    }

    fn remaining(&self, seat: Seat) -> u32 {
        self.target - self.positions[seat.index()]
    }
}

impl Default for RaceGame {
    fn default() -> Self {
        Self::new(10, 3)
    }
}

impl Game for RaceGame {
    fn init(&mut self) {
        self.positions = [0, 0];
        self.to_move = Seat::P1;
        self.winner = None;
    }

    fn advance(&mut self, action: usize) {
        debug_assert!(self.winner.is_none(), "advance on a finished game");
        self.positions[self.to_move.index()] += action as u32 + 1;
        if self.positions[self.to_move.index()] >= self.target {
            self.winner = Some(self.to_move);
        } else {
            self.to_move = self.to_move.opponent();
        }
    }

    fn status(&self) -> GameStatus {
        match self.winner {
            Some(Seat::P1) => GameStatus::P1Win,
            Some(Seat::P2) => GameStatus::P2Win,
            None => GameStatus::Playing,
        }
    }

    fn encode(&self) -> EncodedInput {
        let values = vec![
            self.positions[0] as f32 / self.target as f32,
            self.positions[1] as f32 / self.target as f32,
            if self.to_move == Seat::P1 { 1.0 } else { 0.0 },
            if self.to_move == Seat::P2 { 1.0 } else { 0.0 },
        ];
        let actions = self.remaining(self.to_move).min(self.max_step) as usize;
        EncodedInput::new(values, actions)
    }

    fn to_move(&self) -> Seat {
        self.to_move
    }
}
