//! Seat identification for two-player zero-sum games.
//!
//! The trainer frames every game as two alternating-or-not seats. Each
//! recorded turn carries the seat that moved, and the backward pass
//! flips its value targets whenever the seat changes between plies.

use serde::{Deserialize, Serialize};

/// One of the two seats in a zero-sum game.
///
/// Seats are identities, not turn orders: a game is free to let the
/// same seat move twice in a row (extra-turn rules), and the backward
/// pass handles both cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    /// The seat that moves first after `Game::init`.
    #[default]
    P1,
    /// The other seat.
    P2,
}

impl Seat {
    /// The opposing seat.
    #[must_use]
    pub const fn opponent(self) -> Seat {
        match self {
            Seat::P1 => Seat::P2,
            Seat::P2 => Seat::P1,
        }
    }

    /// 0-based index, for per-seat array storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Seat::P1 => 0,
            Seat::P2 => 1,
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seat::P1 => write!(f, "P1"),
            Seat::P2 => write!(f, "P2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Seat::P1.opponent(), Seat::P2);
        assert_eq!(Seat::P2.opponent(), Seat::P1);
        assert_eq!(Seat::P1.opponent().opponent(), Seat::P1);
    }

    #[test]
    fn test_index() {
        assert_eq!(Seat::P1.index(), 0);
        assert_eq!(Seat::P2.index(), 1);
    }

    #[test]
    fn test_default_is_first_mover() {
        assert_eq!(Seat::default(), Seat::P1);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Seat::P1), "P1");
        assert_eq!(format!("{}", Seat::P2), "P2");
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Seat::P2).unwrap();
        let back: Seat = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Seat::P2);
    }
}
