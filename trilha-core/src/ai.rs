//! Rule-priority opponent
//!
//! One-ply policy, first satisfied rule wins:
//! 1. win now: complete a mill
//! 2. block: land on a point where the opponent would complete a mill next turn
//! 3. build: make two-of-three on a line whose third point is empty
//! 4. anything legal
//!
//! Ties inside a rule are broken uniformly at random.

use crate::board::Point;
use crate::game::{movement_actions, placement_actions, Action, GameState, Phase};
use crate::position::{Board, Player, FLYING_THRESHOLD};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;

/// Which rule of the cascade produced a decision
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reason {
    Win,
    Block,
    Build,
    Random,
}

/// Heuristic computer player
pub struct HeuristicAi {
    rng: ChaCha8Rng,
}

impl Default for HeuristicAi {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicAi {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick a placement or move for the player to act.
    ///
    /// Returns `None` outside the placing/moving/flying phases, or when the
    /// mover has no legal action at all (which the state machine rules out).
    pub fn choose_action(&mut self, state: &GameState) -> Option<Action> {
        self.choose_action_with_reason(state).map(|(action, _)| action)
    }

    pub fn choose_action_with_reason(&mut self, state: &GameState) -> Option<(Action, Reason)> {
        if !state.phase().is_actionable() {
            return None;
        }

        let me = state.current_player();
        let board = state.board();
        let candidates = state.legal_actions();
        if candidates.is_empty() {
            return None;
        }

        let winning: Vec<Action> = candidates
            .iter()
            .copied()
            .filter(|&a| apply(board, a, me).forms_mill(me, a.destination()))
            .collect();
        if let Some(&action) = winning.choose(&mut self.rng) {
            return Some((action, Reason::Win));
        }

        let threats = opponent_threats(state);
        let blocking: Vec<Action> = candidates
            .iter()
            .copied()
            .filter(|a| threats.contains(&a.destination()))
            .collect();
        if let Some(&action) = blocking.choose(&mut self.rng) {
            return Some((action, Reason::Block));
        }

        let building: Vec<Action> = candidates
            .iter()
            .copied()
            .filter(|&a| builds_pair(&apply(board, a, me), me, a.destination()))
            .collect();
        if let Some(&action) = building.choose(&mut self.rng) {
            return Some((action, Reason::Build));
        }

        candidates
            .choose(&mut self.rng)
            .map(|&action| (action, Reason::Random))
    }

    /// Pick the opponent piece to take after forming a mill.
    /// Unprotected pieces are preferred; if all are in mills any will do.
    pub fn choose_removal(&mut self, state: &GameState) -> Option<Point> {
        if state.phase() != Phase::RemovingPiece {
            return None;
        }
        state.legal_removals().choose(&mut self.rng).copied()
    }

    /// The selection this player makes next: a removal, a placement, or the
    /// first half (piece pick) of a move.
    pub fn next_selection(&mut self, state: &GameState) -> Option<Point> {
        match state.phase() {
            Phase::RemovingPiece => self.choose_removal(state),
            Phase::Placing => match self.choose_action(state)? {
                Action::Place(p) => Some(p),
                Action::Move { .. } => None,
            },
            _ => match self.choose_action(state)? {
                Action::Move { from, .. } => Some(from),
                Action::Place(_) => None,
            },
        }
    }

    /// Play a game to the end with this policy on both seats.
    ///
    /// Stops early after `max_turns` completed turns; returns the final state
    /// and the number of selections made.
    pub fn play_game(&mut self, initial: GameState, max_turns: u32) -> (GameState, usize) {
        let mut state = initial;
        let mut selections = 0;

        while !state.is_over() && state.turn() < max_turns {
            let next = if state.phase() == Phase::RemovingPiece {
                self.choose_removal(&state)
                    .and_then(|p| state.try_select(p.index()).ok())
            } else {
                self.choose_action(&state).and_then(|a| state.apply_action(a).ok())
            };
            match next {
                Some(next) => {
                    selections += 1;
                    state = next;
                }
                None => break,
            }
        }

        (state, selections)
    }
}

/// Board after `player` performs `action`
fn apply(board: &Board, action: Action, player: Player) -> Board {
    match action {
        Action::Place(p) => board.with(p, Some(player)),
        Action::Move { from, to } => board.with_move(from, to),
    }
}

/// Points where the opponent could complete a mill with their next action.
///
/// The opponent's next action is a placement while they still hold pieces in
/// hand, otherwise a move (flying when down to three).
fn opponent_threats(state: &GameState) -> FxHashSet<Point> {
    let opponent = state.current_player().opponent();
    let board = state.board();
    let counts = state.pieces(opponent);

    let actions = if counts.to_place > 0 {
        placement_actions(board)
    } else {
        // The opponent only reaches the movement phase once both hands are
        // empty, so flying is decided by their board count alone.
        movement_actions(board, opponent, counts.on_board == FLYING_THRESHOLD)
    };

    actions
        .into_iter()
        .filter(|&a| apply(board, a, opponent).forms_mill(opponent, a.destination()))
        .map(Action::destination)
        .collect()
}

/// Some line through `point` now holds exactly two of `player`'s pieces and one empty point
fn builds_pair(board: &Board, player: Player, point: Point) -> bool {
    point.mill_lines().any(|line| {
        let mine = line.iter().filter(|&&p| board.get(p) == Some(player)).count();
        let empty = line.iter().filter(|&&p| board.is_empty(p)).count();
        mine == 2 && empty == 1
    })
}

// ============================================================================
// TESTS
// ============================================================================
