//! Board topology: the 24 points, their adjacency and the mill lines
//!
//! Point numbering runs clockwise around each ring starting at the top-left
//! corner: outer ring 0-7, middle ring 8-15, inner ring 16-23.
//!
//! ```text
//!  0-----------1-----------2
//!  |           |           |
//!  |   8-------9------10   |
//!  |   |       |       |   |
//!  |   |  16--17--18   |   |
//!  |   |   |       |   |   |
//!  7--15--23      19--11---3
//!  |   |   |       |   |   |
//!  |   |  22--21--20   |   |
//!  |   |       |       |   |
//!  |  14------13------12   |
//!  |           |           |
//!  6-----------5-----------4
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of intersections on the board
pub const POINT_COUNT: usize = 24;

/// Number of three-in-a-row lines
pub const MILL_LINE_COUNT: usize = 16;

/// A board intersection, always in `0..POINT_COUNT`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Point(u8);

impl Point {
    /// Validate a raw index coming from outside the engine
    pub fn new(index: usize) -> Option<Self> {
        (index < POINT_COUNT).then_some(Self(index as u8))
    }

    /// Const constructor for the static tables; caller guarantees range
    const fn at(index: u8) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// All points in index order
    pub fn all() -> impl Iterator<Item = Point> {
        (0..POINT_COUNT as u8).map(Point)
    }

    /// Directly connected points (board lines only)
    pub fn neighbors(self) -> &'static [Point] {
        ADJACENCY[self.index()]
    }

    pub fn is_adjacent_to(self, other: Point) -> bool {
        self.neighbors().contains(&other)
    }

    /// Mill lines passing through this point (always exactly two)
    pub fn mill_lines(self) -> impl Iterator<Item = &'static MillLine> {
        MILL_LINES.iter().filter(move |line| line.contains(&self))
    }
}

impl TryFrom<u8> for Point {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Point::new(value as usize).ok_or_else(|| format!("point index out of range: {}", value))
    }
}

impl From<Point> for u8 {
    fn from(point: Point) -> u8 {
        point.0
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Three points that form a mill when uniformly occupied
pub type MillLine = [Point; 3];

macro_rules! points {
    ($($i:expr),* $(,)?) => {
        &[$(Point::at($i)),*]
    };
}

macro_rules! line {
    ($a:expr, $b:expr, $c:expr) => {
        [Point::at($a), Point::at($b), Point::at($c)]
    };
}

/// Adjacency list indexed by point
pub static ADJACENCY: [&[Point]; POINT_COUNT] = [
    // Outer ring
    points![1, 7],
    points![0, 2, 9],
    points![1, 3],
    points![2, 4, 11],
    points![3, 5],
    points![4, 6, 13],
    points![5, 7],
    points![0, 6, 15],
    // Middle ring
    points![9, 15],
    points![1, 8, 10, 17],
    points![9, 11],
    points![3, 10, 12, 19],
    points![11, 13],
    points![5, 12, 14, 21],
    points![13, 15],
    points![7, 8, 14, 23],
    // Inner ring
    points![17, 23],
    points![9, 16, 18],
    points![17, 19],
    points![11, 18, 20],
    points![19, 21],
    points![13, 20, 22],
    points![21, 23],
    points![15, 16, 22],
];

/// Every mill line: four sides of each ring plus the four spokes
pub static MILL_LINES: [MillLine; MILL_LINE_COUNT] = [
    // Top sides
    line!(0, 1, 2),
    line!(8, 9, 10),
    line!(16, 17, 18),
    // Bottom sides
    line!(6, 5, 4),
    line!(14, 13, 12),
    line!(22, 21, 20),
    // Left sides
    line!(0, 7, 6),
    line!(8, 15, 14),
    line!(16, 23, 22),
    // Right sides
    line!(2, 3, 4),
    line!(10, 11, 12),
    line!(18, 19, 20),
    // Spokes
    line!(1, 9, 17),
    line!(7, 15, 23),
    line!(3, 11, 19),
    line!(5, 13, 21),
];
