//! 3x3 playout patterns.
//!
//! The playout policy favours moves that complete one of four local shapes
//! around the opponent's last stone (hane and cut shapes). With `o` the side
//! to move, `x` the opponent, `.` empty, `?` anything and `*` the candidate
//! point, the shapes are:
//!
//! ```text
//! o x o      o x .      o x ?      o x x
//! . * .      . * .      o * .      . * .
//! ? ? ?      ? . ?      ? . ?      ? . ?
//! ```
//!
//! A candidate matches when any of the four templates fits under any of the
//! eight symmetries of the square. Off-board cells read as
//! [`Colour::Neutral`], which matches no template cell except `?`.

use crate::board::Board;
use crate::colour::Colour;

/// The eight symmetries of the square as (swap axes, flip x, flip y).
const TRANSFORMS: [(bool, bool, bool); 8] = [
    (false, false, false),
    (false, false, true),
    (false, true, false),
    (false, true, true),
    (true, false, false),
    (true, false, true),
    (true, true, false),
    (true, true, true),
];

/// Cell of the neighbourhood of `(x, y)` at template offset `(dx, dy)`
/// under the given symmetry. Off-board cells are `Neutral`.
#[inline]
fn cell(
    board: &Board,
    x: usize,
    y: usize,
    dx: i32,
    dy: i32,
    (swap, flip_x, flip_y): (bool, bool, bool),
) -> Colour {
    let (mut dx, mut dy) = if swap { (dy, dx) } else { (dx, dy) };
    if flip_x {
        dx = -dx;
    }
    if flip_y {
        dy = -dy;
    }
    let size = board.size() as i32;
    let nx = x as i32 + dx;
    let ny = y as i32 + dy;
    if nx < 0 || ny < 0 || nx >= size || ny >= size {
        Colour::Neutral
    } else {
        board.value_at(nx as usize, ny as usize)
    }
}

/// Does any of the four templates fit at `(x, y)` under one symmetry?
///
/// The templates share their top edge (`o x` in the corner), so the check
/// is a single decision tree rather than four independent scans.
fn matches_under(board: &Board, x: usize, y: usize, col: Colour, t: (bool, bool, bool)) -> bool {
    let at = |dx: i32, dy: i32| cell(board, x, y, dx, dy, t);
    if at(-1, -1) != col {
        return false;
    }
    if at(0, -1) != col.invert() {
        return false;
    }
    if at(1, 0) != Colour::None {
        return false;
    }
    if at(-1, 0) == col {
        // Third shape: own stone on the left needs the point below free.
        return at(0, 1) == Colour::None;
    }
    if at(-1, 0) != Colour::None {
        return false;
    }
    if at(1, -1) == col {
        // First shape: enclosing hane, bottom row free-form.
        return true;
    }
    at(0, 1) == Colour::None
}

/// True when the empty point `(x, y)` completes one of the playout shapes
/// for `col`, under any symmetry.
pub fn pattern_match(board: &Board, x: usize, y: usize, col: Colour) -> bool {
    debug_assert_eq!(board.value_at(x, y), Colour::None);
    debug_assert!(col.is_player());
    TRANSFORMS
        .iter()
        .any(|&t| matches_under(board, x, y, col, t))
}
