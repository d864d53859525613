//! Game state and the phase state machine
//!
//! `GameState` is an immutable snapshot. Every accepted point selection
//! produces a fresh state; a rejected one produces a copy that differs only in
//! `last_error`.

use crate::board::Point;
use crate::error::MoveError;
use crate::position::{Board, PieceCount, Player, FLYING_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Seat taken by the computer in player-vs-AI games
pub const AI_PLAYER: Player = Player::Two;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Turn phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Placing,
    Moving,
    Flying,
    RemovingPiece,
    GameOver,
}

impl Phase {
    /// Phases in which the mover chooses a placement or a move
    pub fn is_actionable(self) -> bool {
        matches!(self, Phase::Placing | Phase::Moving | Phase::Flying)
    }
}

/// Who sits in the second seat
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    PlayerVsPlayer,
    #[default]
    PlayerVsAi,
}

/// A complete turn action (the removal after a mill is a separate selection)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Place(Point),
    Move { from: Point, to: Point },
}

impl Action {
    /// Point the piece lands on
    pub fn destination(self) -> Point {
        match self {
            Action::Place(p) => p,
            Action::Move { to, .. } => to,
        }
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    current_player: Player,
    phase: Phase,
    pieces: [PieceCount; 2],
    selected: Option<Point>,
    winner: Option<Player>,
    just_formed_mill: bool,
    mode: GameMode,
    /// Why the last selection was rejected, cleared by the next accepted one
    last_error: Option<MoveError>,
    /// Completed turns
    turn: u32,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Fresh game: empty board, player one to place
    pub fn new(mode: GameMode) -> Self {
        Self {
            board: Board::new(),
            current_player: Player::One,
            phase: Phase::Placing,
            pieces: [PieceCount::default(); 2],
            selected: None,
            winner: None,
            just_formed_mill: false,
            mode,
            last_error: None,
            turn: 0,
        }
    }

    /// Start from an arbitrary position, e.g. a puzzle or a test fixture.
    ///
    /// On-board counters are derived from the board; the phase is the one the
    /// mover would naturally be in. Returns `None` if a player would exceed the
    /// piece budget, a point is listed twice, or the mover's hand is empty
    /// while the opponent still has pieces to place.
    pub fn with_position(
        mode: GameMode,
        one: &[Point],
        two: &[Point],
        to_place: [u8; 2],
        to_move: Player,
    ) -> Option<Self> {
        if to_place[to_move.index()] == 0 && to_place[to_move.opponent().index()] > 0 {
            return None;
        }

        let mut board = Board::new();
        for (player, points) in [(Player::One, one), (Player::Two, two)] {
            for &p in points {
                if !board.is_empty(p) {
                    return None;
                }
                board.set(p, Some(player));
            }
        }

        let mut pieces = [PieceCount::default(); 2];
        for player in [Player::One, Player::Two] {
            let on_board = board.count(player) as u8;
            let budget = on_board.checked_add(to_place[player.index()])?;
            if budget > crate::position::PIECES_PER_PLAYER {
                return None;
            }
            pieces[player.index()] = PieceCount {
                on_board,
                to_place: to_place[player.index()],
            };
        }

        let mut state = Self {
            board,
            current_player: to_move,
            pieces,
            ..Self::new(mode)
        };
        state.phase = state.natural_phase();
        if state.phase != Phase::Placing && !state.can_move(to_move) {
            state.finish(to_move.opponent());
        }
        Some(state)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pieces(&self, player: Player) -> PieceCount {
        self.pieces[player.index()]
    }

    pub fn selected(&self) -> Option<Point> {
        self.selected
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn just_formed_mill(&self) -> bool {
        self.just_formed_mill
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn last_error(&self) -> Option<MoveError> {
        self.last_error
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Both players have put all nine pieces down
    pub fn placement_finished(&self) -> bool {
        self.pieces.iter().all(|c| c.to_place == 0)
    }

    /// Flying applies once placement is over and a player is down to three
    pub fn is_flying(&self, player: Player) -> bool {
        self.placement_finished() && self.pieces(player).on_board == FLYING_THRESHOLD
    }

    /// Whether `player` would have at least one legal move on their turn
    pub fn can_move(&self, player: Player) -> bool {
        if self.pieces(player).on_board < FLYING_THRESHOLD {
            return false;
        }
        self.board.has_destination(player, self.is_flying(player))
    }

    /// The computer holds the turn (selections from the human seat are not expected)
    pub fn is_computer_turn(&self) -> bool {
        self.mode == GameMode::PlayerVsAi && self.current_player == AI_PLAYER && !self.is_over()
    }

    // ========================================================================
    // ACTION GENERATION
    // ========================================================================

    /// All complete actions available to the mover in the current phase
    pub fn legal_actions(&self) -> Vec<Action> {
        match self.phase {
            Phase::Placing => placement_actions(&self.board),
            Phase::Moving | Phase::Flying => movement_actions(
                &self.board,
                self.current_player,
                self.is_flying(self.current_player),
            ),
            Phase::RemovingPiece | Phase::GameOver => vec![],
        }
    }

    /// Opponent pieces the mover may take during `RemovingPiece`
    pub fn legal_removals(&self) -> Vec<Point> {
        if self.phase != Phase::RemovingPiece {
            return vec![];
        }
        self.board.removable_points(self.current_player.opponent())
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// Total entry point: a rejected selection is recorded in `last_error`
    /// and nothing else changes.
    pub fn select(&self, index: usize) -> GameState {
        match self.try_select(index) {
            Ok(next) => next,
            Err(err) => {
                let mut unchanged = self.clone();
                unchanged.last_error = Some(err);
                unchanged
            }
        }
    }

    /// Validate a point selection against the current phase
    pub fn try_select(&self, index: usize) -> Result<GameState, MoveError> {
        let point = Point::new(index).ok_or(MoveError::InvalidPoint(index))?;

        let mut next = self.clone();
        next.last_error = None;

        match self.phase {
            Phase::Placing => next.place(point)?,
            Phase::Moving | Phase::Flying => match self.selected {
                None => next.pick(point)?,
                Some(from) if from == point => next.selected = None,
                Some(from) => next.relocate(from, point)?,
            },
            Phase::RemovingPiece => next.remove(point)?,
            Phase::GameOver => return Err(MoveError::OutOfPhaseAction(Phase::GameOver)),
        }

        Ok(next)
    }

    /// Apply a whole action through the same validated selections a player makes
    pub fn apply_action(&self, action: Action) -> Result<GameState, MoveError> {
        match action {
            Action::Place(p) => self.try_select(p.index()),
            Action::Move { from, to } => self.try_select(from.index())?.try_select(to.index()),
        }
    }

    // Handlers validate before touching anything so a rejection never
    // leaves a half-applied clone behind.

    fn place(&mut self, point: Point) -> Result<(), MoveError> {
        if !self.board.is_empty(point) {
            return Err(MoveError::OccupiedDestination(point));
        }
        let count = &mut self.pieces[self.current_player.index()];
        if count.to_place == 0 {
            return Err(MoveError::OutOfPhaseAction(Phase::Placing));
        }

        count.to_place -= 1;
        count.on_board += 1;
        self.board.set(point, Some(self.current_player));
        self.landed(point);
        Ok(())
    }

    fn pick(&mut self, point: Point) -> Result<(), MoveError> {
        if self.board.get(point) != Some(self.current_player) {
            return Err(MoveError::WrongPieceOwner {
                point,
                expected: self.current_player,
            });
        }
        self.selected = Some(point);
        Ok(())
    }

    fn relocate(&mut self, from: Point, to: Point) -> Result<(), MoveError> {
        if !self.board.is_empty(to) {
            return Err(MoveError::OccupiedDestination(to));
        }
        if !self.is_flying(self.current_player) && !from.is_adjacent_to(to) {
            return Err(MoveError::NonAdjacentMove { from, to });
        }

        self.board = self.board.with_move(from, to);
        self.selected = None;
        self.landed(to);
        Ok(())
    }

    fn remove(&mut self, point: Point) -> Result<(), MoveError> {
        let opponent = self.current_player.opponent();
        if self.board.get(point) != Some(opponent) {
            return Err(MoveError::WrongPieceOwner {
                point,
                expected: opponent,
            });
        }
        if self.board.is_protected_by_mill(point) && !self.board.all_protected(opponent) {
            return Err(MoveError::ProtectedMillRemoval(point));
        }

        self.board.set(point, None);
        self.pieces[opponent.index()].on_board -= 1;
        self.just_formed_mill = false;

        if self.placement_finished() && self.pieces(opponent).on_board < FLYING_THRESHOLD {
            self.finish(self.current_player);
        } else {
            self.end_turn();
        }
        Ok(())
    }

    /// A piece of the mover just arrived on `point`
    fn landed(&mut self, point: Point) {
        let opponent_has_pieces = self.pieces(self.current_player.opponent()).on_board > 0;
        if opponent_has_pieces && self.board.forms_mill(self.current_player, point) {
            self.phase = Phase::RemovingPiece;
            self.just_formed_mill = true;
        } else {
            self.end_turn();
        }
    }

    fn end_turn(&mut self) {
        self.current_player = self.current_player.opponent();
        self.turn += 1;
        self.selected = None;
        self.phase = self.natural_phase();

        if self.phase != Phase::Placing && !self.can_move(self.current_player) {
            self.finish(self.current_player.opponent());
        }
    }

    /// Phase implied by the counters for the player to move
    fn natural_phase(&self) -> Phase {
        if !self.placement_finished() {
            Phase::Placing
        } else if self.is_flying(self.current_player) {
            Phase::Flying
        } else {
            Phase::Moving
        }
    }

    fn finish(&mut self, winner: Player) {
        self.winner = Some(winner);
        self.phase = Phase::GameOver;
        self.selected = None;
        self.just_formed_mill = false;
    }
}

/// Every empty point as a placement
pub fn placement_actions(board: &Board) -> Vec<Action> {
    board.empty_points().map(Action::Place).collect()
}

/// Every `{from, to}` move for `player`; a flying player may go to any empty point
pub fn movement_actions(board: &Board, player: Player, flying: bool) -> Vec<Action> {
    let mut moves = Vec::new();
    for from in board.points_of(player) {
        if flying {
            moves.extend(board.empty_points().map(|to| Action::Move { from, to }));
        } else {
            moves.extend(
                from.neighbors()
                    .iter()
                    .filter(|&&to| board.is_empty(to))
                    .map(|&to| Action::Move { from, to }),
            );
        }
    }
    moves
}

// ============================================================================
// TESTS
// ============================================================================
