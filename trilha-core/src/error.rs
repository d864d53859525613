//! Rejected point selections
//!
//! Every rule violation is a recoverable input error: the state machine keeps
//! its phase, board and counters and only records the rejection.

use crate::board::Point;
use crate::game::Phase;
use crate::position::Player;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum MoveError {
    #[error("point index out of range: {0}")]
    InvalidPoint(usize),

    #[error("point {0} is occupied")]
    OccupiedDestination(Point),

    #[error("point {to} is not adjacent to {from}")]
    NonAdjacentMove { from: Point, to: Point },

    #[error("point {point} does not hold a piece of player {expected}")]
    WrongPieceOwner { point: Point, expected: Player },

    #[error("piece on {0} is part of a mill and unprotected pieces remain")]
    ProtectedMillRemoval(Point),

    #[error("no selection is accepted during {0:?}")]
    OutOfPhaseAction(Phase),
}
