//! ASCII board rendering
//!
//! Each point is a two-character cell on a 7x7 grid; board lines are drawn
//! from the adjacency table so the picture always matches the topology.

use trilha_core::{GameState, Player, Point, POINT_COUNT};

/// Grid (column, row) of each point, 0..=6 on both axes
const GRID: [(usize, usize); POINT_COUNT] = [
    // Outer ring
    (0, 0), (3, 0), (6, 0), (6, 3), (6, 6), (3, 6), (0, 6), (0, 3),
    // Middle ring
    (1, 1), (3, 1), (5, 1), (5, 3), (5, 5), (3, 5), (1, 5), (1, 3),
    // Inner ring
    (2, 2), (3, 2), (4, 2), (4, 3), (4, 4), (3, 4), (2, 4), (2, 3),
];

const CELL_WIDTH: usize = 4;
const ROW_HEIGHT: usize = 2;
const WIDTH: usize = 6 * CELL_WIDTH + 2;
const HEIGHT: usize = 6 * ROW_HEIGHT + 1;

fn origin(point: Point) -> (usize, usize) {
    let (col, row) = GRID[point.index()];
    (col * CELL_WIDTH, row * ROW_HEIGHT)
}

fn cell(state: &GameState, point: Point) -> [char; 2] {
    let glyph = match state.board().get(point) {
        Some(Player::One) => 'X',
        Some(Player::Two) => 'O',
        None => {
            let digits = format!("{:02}", point.index());
            let mut chars = digits.chars();
            return [chars.next().unwrap_or('0'), chars.next().unwrap_or('0')];
        }
    };
    if state.selected() == Some(point) {
        ['*', glyph]
    } else {
        [' ', glyph]
    }
}

/// Board picture: pieces as X / O, empty points by index, `*` marks the selection
pub fn render_board(state: &GameState) -> String {
    let mut canvas = vec![vec![' '; WIDTH]; HEIGHT];

    for a in Point::all() {
        for &b in a.neighbors() {
            if b <= a {
                continue;
            }
            let (ax, ay) = origin(a);
            let (bx, by) = origin(b);
            if ay == by {
                for x in ax.min(bx) + 2..ax.max(bx) {
                    canvas[ay][x] = '-';
                }
            } else {
                for y in ay.min(by) + 1..ay.max(by) {
                    canvas[y][ax + 1] = '|';
                }
            }
        }
    }

    for p in Point::all() {
        let (x, y) = origin(p);
        let [c0, c1] = cell(state, p);
        canvas[y][x] = c0;
        canvas[y][x + 1] = c1;
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
