//! Position model: board occupancy, piece counters and mill detection

use crate::board::{Point, POINT_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pieces each player starts with
pub const PIECES_PER_PLAYER: u8 = 9;

/// A player reduced to this many pieces may fly
pub const FLYING_THRESHOLD: u8 = 3;

/// Player seat. Player one always opens the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One = 0,
    Two = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "1"),
            Player::Two => write!(f, "2"),
        }
    }
}

/// Per-player piece bookkeeping
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceCount {
    pub on_board: u8,
    pub to_place: u8,
}

impl Default for PieceCount {
    fn default() -> Self {
        Self {
            on_board: 0,
            to_place: PIECES_PER_PLAYER,
        }
    }
}

/// Occupancy of the 24 points. `None` is an empty point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Player>; POINT_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, point: Point) -> Option<Player> {
        self.cells[point.index()]
    }

    pub fn is_empty(&self, point: Point) -> bool {
        self.cells[point.index()].is_none()
    }

    pub fn set(&mut self, point: Point, owner: Option<Player>) {
        self.cells[point.index()] = owner;
    }

    /// Board with one more piece, used for one-ply lookahead
    pub fn with(&self, point: Point, owner: Option<Player>) -> Self {
        let mut board = *self;
        board.set(point, owner);
        board
    }

    /// Board with the piece on `from` relocated to `to`
    pub fn with_move(&self, from: Point, to: Point) -> Self {
        let mut board = *self;
        let owner = board.get(from);
        board.set(from, None);
        board.set(to, owner);
        board
    }

    pub fn empty_points(&self) -> impl Iterator<Item = Point> + '_ {
        Point::all().filter(move |&p| self.is_empty(p))
    }

    pub fn points_of(&self, player: Player) -> impl Iterator<Item = Point> + '_ {
        Point::all().filter(move |&p| self.get(p) == Some(player))
    }

    pub fn count(&self, player: Player) -> usize {
        self.cells.iter().filter(|&&c| c == Some(player)).count()
    }

    /// True iff some line through `point` is entirely owned by `player`.
    ///
    /// Only lines through the touched point are inspected: a single placement
    /// or move can only complete a line it lands on.
    pub fn forms_mill(&self, player: Player, point: Point) -> bool {
        point
            .mill_lines()
            .any(|line| line.iter().all(|&p| self.get(p) == Some(player)))
    }

    /// True iff the point holds a piece that currently sits in a mill
    pub fn is_protected_by_mill(&self, point: Point) -> bool {
        match self.get(point) {
            Some(owner) => self.forms_mill(owner, point),
            None => false,
        }
    }

    /// True iff every piece `player` has on the board sits in a mill
    pub fn all_protected(&self, player: Player) -> bool {
        self.points_of(player).all(|p| self.is_protected_by_mill(p))
    }

    /// Pieces of `player` the opponent may legally remove
    pub fn removable_points(&self, player: Player) -> Vec<Point> {
        let owned: Vec<Point> = self.points_of(player).collect();
        let unprotected: Vec<Point> = owned
            .iter()
            .copied()
            .filter(|&p| !self.is_protected_by_mill(p))
            .collect();
        if unprotected.is_empty() {
            owned
        } else {
            unprotected
        }
    }

    /// Whether `player` has any destination available.
    /// A flying player only needs one empty point anywhere.
    pub fn has_destination(&self, player: Player, flying: bool) -> bool {
        if flying {
            return self.empty_points().next().is_some();
        }
        self.points_of(player)
            .any(|p| p.neighbors().iter().any(|&n| self.is_empty(n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(i: usize) -> Point {
        Point::new(i).unwrap()
    }

    fn board_with(one: &[usize], two: &[usize]) -> Board {
        let mut board = Board::new();
        for &i in one {
            board.set(pt(i), Some(Player::One));
        }
        for &i in two {
            board.set(pt(i), Some(Player::Two));
        }
        board
    }

    #[test]
    fn test_forms_mill_on_line() {
        let board = board_with(&[0, 1, 2], &[]);
        assert!(board.forms_mill(Player::One, pt(0)));
        assert!(board.forms_mill(Player::One, pt(1)));
        assert!(board.forms_mill(Player::One, pt(2)));
        assert!(!board.forms_mill(Player::Two, pt(1)));
    }

    #[test]
    fn test_forms_mill_is_path_local() {
        let board = board_with(&[0, 1, 2, 9], &[]);
        // 9 is not on the completed line
        assert!(!board.forms_mill(Player::One, pt(9)));
    }

    #[test]
    fn test_mixed_line_is_not_mill() {
        let board = board_with(&[1, 17], &[9]);
        assert!(!board.forms_mill(Player::One, pt(17)));
        assert!(!board.forms_mill(Player::One, pt(1)));
    }

    #[test]
    fn test_protection() {
        let board = board_with(&[0, 1, 2, 5], &[]);
        assert!(board.is_protected_by_mill(pt(1)));
        assert!(!board.is_protected_by_mill(pt(5)));
        assert!(!board.is_protected_by_mill(pt(10)));
        assert!(!board.all_protected(Player::One));
        assert_eq!(board.removable_points(Player::One), vec![pt(5)]);
    }

    #[test]
    fn test_removable_when_all_protected() {
        let board = board_with(&[0, 1, 2], &[]);
        assert!(board.all_protected(Player::One));
        assert_eq!(board.removable_points(Player::One).len(), 3);
    }

    #[test]
    fn test_has_destination() {
        // Player one boxed in at 0 by two's pieces on 1 and 7
        let board = board_with(&[0], &[1, 7]);
        assert!(!board.has_destination(Player::One, false));
        assert!(board.has_destination(Player::One, true));
        assert!(board.has_destination(Player::Two, false));
    }

    #[test]
    fn test_with_move() {
        let board = board_with(&[0], &[]);
        let moved = board.with_move(pt(0), pt(1));
        assert!(moved.is_empty(pt(0)));
        assert_eq!(moved.get(pt(1)), Some(Player::One));
        assert_eq!(moved.count(Player::One), 1);
    }
}
