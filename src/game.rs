//! Game state on top of the board: legality, superko, termination.
//!
//! The game does not track whose turn it is; callers supply the colour with
//! every move, which lets the search replay arbitrary lines. Legality is a
//! separate query ([`Game::check_move`]) so the search can filter candidate
//! moves up front; a move that reaches [`Game::play`] illegally forfeits the
//! game for the mover instead of being rejected, which keeps playouts total.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::board::Board;
use crate::colour::Colour;
use crate::zobrist::ZobristTable;

/// A move: an on-board point, or one of the two sentinels below.
pub type Move = usize;

/// The pass move.
pub const PASS: Move = usize::MAX - 1;

/// The resignation move.
pub const RESIGN: Move = usize::MAX;

/// Why a proposed move is not playable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("point is occupied")]
    Occupied,
    #[error("suicide")]
    Suicide,
    #[error("repeats a previous position")]
    Superko,
}

/// One game of Go: a board, the komi, and the set of positions seen so far.
#[derive(Clone)]
pub struct Game {
    board: Board,
    komi: i32,
    /// Hashes of every position reached, including the empty board.
    history: HashSet<u64>,
    winner: Colour,
    last_was_pass: bool,
}

impl Game {
    /// A fresh game on an empty board.
    pub fn new(size: usize, komi: i32, zobrist: Arc<ZobristTable>) -> Self {
        let board = Board::new(size, zobrist);
        let mut history = HashSet::new();
        history.insert(board.hash());
        Game {
            board,
            komi,
            history,
            winner: Colour::None,
            last_was_pass: false,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn komi(&self) -> i32 {
        self.komi
    }

    pub fn set_komi(&mut self, komi: i32) {
        self.komi = komi;
    }

    /// The winner, or `Colour::None` while the game is running.
    #[inline]
    pub fn winner(&self) -> Colour {
        self.winner
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.winner != Colour::None
    }

    /// Why `col` may not play `m`, if anything. Pass and resign are always
    /// allowed. Positional superko: a board move is illegal when the
    /// position it would create has been on the board before.
    pub fn check_move(&self, m: Move, col: Colour) -> Result<(), IllegalMove> {
        if m == PASS || m == RESIGN {
            return Ok(());
        }
        if self.board.value(m) != Colour::None {
            return Err(IllegalMove::Occupied);
        }
        if self.board.is_suicide(m, col) {
            return Err(IllegalMove::Suicide);
        }
        if self.history.contains(&self.board.pre_compute_hash(m, col)) {
            return Err(IllegalMove::Superko);
        }
        Ok(())
    }

    /// Shorthand for `check_move(..).is_err()`.
    #[inline]
    pub fn is_illegal(&self, m: Move, col: Colour) -> bool {
        self.check_move(m, col).is_err()
    }

    /// Apply a move for `col`. Resigning awards the game to the opponent.
    /// The second consecutive pass ends the game by area scoring. A board
    /// move that turns out to be occupied, suicidal or position-repeating
    /// forfeits the game for the mover.
    pub fn play(&mut self, m: Move, col: Colour) {
        debug_assert_eq!(self.winner, Colour::None);
        debug_assert!(col.is_player());
        if m == RESIGN {
            self.winner = col.invert();
            return;
        }
        if m == PASS {
            if self.last_was_pass {
                self.winner = self.score_winner();
            } else {
                self.last_was_pass = true;
            }
            return;
        }
        self.last_was_pass = false;
        if self.board.value(m) != Colour::None || self.board.is_suicide(m, col) {
            self.winner = col.invert();
            return;
        }
        self.board.play(m, col);
        if !self.history.insert(self.board.hash()) {
            self.winner = col.invert();
        }
    }

    /// Area-score the current position. Black wins only when its score
    /// clears White's score plus komi.
    pub fn score_winner(&self) -> Colour {
        let (black, white) = self.board.count_points();
        if black as i64 > white as i64 + self.komi as i64 {
            Colour::Black
        } else {
            Colour::White
        }
    }
}

/// Render a move in letter-digit notation: column letter (skipping `I`, as
/// Go convention has it) and 1-based row counted from the bottom. The two
/// sentinels render as words.
pub fn format_move(m: Move, size: usize) -> String {
    if m == PASS {
        return "pass".into();
    }
    if m == RESIGN {
        return "resign".into();
    }
    assert!(m < size * size);
    let x = m % size;
    let y = m / size;
    let mut letter = b'A' + x as u8;
    if letter >= b'I' {
        letter += 1;
    }
    format!("{}{}", letter as char, size - y)
}

/// Parse letter-digit notation (or the word `pass`) back into a move.
/// Case-insensitive. Returns `None` for anything out of range or malformed.
pub fn parse_move(s: &str, size: usize) -> Option<Move> {
    if s.eq_ignore_ascii_case("pass") {
        return Some(PASS);
    }
    let s = s.to_ascii_lowercase();
    let mut bytes = s.bytes();
    let letter = bytes.next()?;
    if !letter.is_ascii_lowercase() {
        return None;
    }
    let mut x = (letter - b'a') as usize;
    if x >= 9 {
        x -= 1;
    }
    let rest = &s[1..];
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let row: usize = rest.parse().ok()?;
    if x >= size || row == 0 || row > size {
        return None;
    }
    let y = size - row;
    Some(y * size + x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(size: usize, komi: i32) -> Game {
        let zobrist = Arc::new(ZobristTable::with_size(0xBADA55, size * size));
        Game::new(size, komi, zobrist)
    }

    fn at(size: usize, x: usize, y: usize) -> Move {
        y * size + x
    }

    #[test]
    fn pass_and_resign_are_always_legal() {
        let g = game(5, 7);
        assert!(!g.is_illegal(PASS, Colour::Black));
        assert!(!g.is_illegal(RESIGN, Colour::White));
    }

    #[test]
    fn two_passes_end_by_komi() {
        let mut g = game(5, 6);
        g.play(PASS, Colour::Black);
        assert_eq!(g.winner(), Colour::None);
        g.play(PASS, Colour::White);
        // Empty board: 0 vs 0 + komi, White wins.
        assert_eq!(g.winner(), Colour::White);
    }

    #[test]
    fn a_board_move_resets_the_pass_flag() {
        let mut g = game(5, 6);
        g.play(PASS, Colour::Black);
        g.play(at(5, 2, 2), Colour::White);
        g.play(PASS, Colour::Black);
        assert_eq!(g.winner(), Colour::None);
        g.play(PASS, Colour::White);
        assert_eq!(g.winner(), Colour::White);
    }

    #[test]
    fn resignation_awards_the_opponent() {
        let mut g = game(5, 7);
        g.play(at(5, 2, 2), Colour::Black);
        g.play(RESIGN, Colour::White);
        assert_eq!(g.winner(), Colour::Black);
    }

    #[test]
    fn nine_stones_beat_komi_seven() {
        // Nine black stones on the right, one white stone in the corner.
        // The open region touches both colours and counts for nobody.
        let mut g = game(5, 7);
        g.play(at(5, 0, 0), Colour::White);
        for &(x, y) in &[
            (4, 0),
            (3, 1),
            (4, 1),
            (3, 2),
            (4, 2),
            (3, 3),
            (4, 3),
            (3, 4),
            (4, 4),
        ] {
            g.play(at(5, x, y), Colour::Black);
        }
        g.play(PASS, Colour::Black);
        g.play(PASS, Colour::White);
        // 9 black points against 1 + 7.
        assert_eq!(g.winner(), Colour::Black);
    }

    #[test]
    fn eight_stones_lose_to_komi_seven() {
        let mut g = game(5, 7);
        g.play(at(5, 0, 0), Colour::White);
        for &(x, y) in &[
            (4, 0),
            (4, 1),
            (3, 2),
            (4, 2),
            (3, 3),
            (4, 3),
            (3, 4),
            (4, 4),
        ] {
            g.play(at(5, x, y), Colour::Black);
        }
        g.play(PASS, Colour::Black);
        g.play(PASS, Colour::White);
        assert_eq!(g.winner(), Colour::White);
    }

    #[test]
    fn occupied_point_is_illegal_and_forfeits() {
        let mut g = game(5, 7);
        g.play(at(5, 2, 2), Colour::Black);
        assert_eq!(
            g.check_move(at(5, 2, 2), Colour::White),
            Err(IllegalMove::Occupied)
        );
        g.play(at(5, 2, 2), Colour::White);
        assert_eq!(g.winner(), Colour::Black);
    }

    #[test]
    fn suicide_is_illegal() {
        let mut g = game(5, 7);
        g.play(at(5, 1, 0), Colour::Black);
        g.play(at(5, 0, 1), Colour::Black);
        assert_eq!(
            g.check_move(at(5, 0, 0), Colour::White),
            Err(IllegalMove::Suicide)
        );
    }

    #[test]
    fn ko_recapture_is_superko() {
        // Classic ko shape in the middle of a 5x5 board:
        //   . B W . .
        //   B W . W .
        //   . B W . .
        // Black takes the ko, then White may not take straight back.
        let mut g = game(5, 7);
        for &(x, y) in &[(1, 1), (0, 2), (1, 3)] {
            g.play(at(5, x, y), Colour::Black);
        }
        for &(x, y) in &[(2, 1), (1, 2), (3, 2), (2, 3)] {
            g.play(at(5, x, y), Colour::White);
        }
        // Black captures the white stone at (1,2).
        g.play(at(5, 2, 2), Colour::Black);
        assert_eq!(g.board().value(at(5, 1, 2)), Colour::None);
        assert_eq!(g.winner(), Colour::None);
        // Retaking at (1,2) would recreate the previous position.
        assert_eq!(
            g.check_move(at(5, 1, 2), Colour::White),
            Err(IllegalMove::Superko)
        );
        // Pushing it through anyway forfeits.
        g.play(at(5, 1, 2), Colour::White);
        assert_eq!(g.winner(), Colour::Black);
    }

    #[test]
    fn filled_eye_suicide_is_rejected() {
        // White surrounds (2,2); no white group is capturable, so Black
        // playing inside is suicide.
        let mut g = game(5, 7);
        for &(x, y) in &[(2, 1), (1, 2), (3, 2), (2, 3)] {
            g.play(at(5, x, y), Colour::White);
        }
        assert_eq!(
            g.check_move(at(5, 2, 2), Colour::Black),
            Err(IllegalMove::Suicide)
        );
        assert!(g.is_illegal(at(5, 2, 2), Colour::Black));
    }

    #[test]
    fn move_notation_round_trip() {
        for size in [5usize, 9, 13, 19] {
            for m in 0..size * size {
                let s = format_move(m, size);
                assert_eq!(parse_move(&s, size), Some(m), "round trip for {s}");
            }
        }
        assert_eq!(parse_move("pass", 9), Some(PASS));
        assert_eq!(format_move(PASS, 9), "pass");
        assert_eq!(format_move(RESIGN, 9), "resign");
    }

    #[test]
    fn move_notation_skips_column_i() {
        // Column 8 renders as J, never I.
        assert_eq!(format_move(8, 9), "J9");
        assert_eq!(parse_move("j9", 9), Some(8));
        // The bottom-left corner is A1.
        assert_eq!(format_move(8 * 9, 9), "A1");
        assert_eq!(parse_move("A1", 9), Some(72));
    }

    #[test]
    fn malformed_vertices_are_rejected() {
        assert_eq!(parse_move("", 9), None);
        assert_eq!(parse_move("5d", 9), None);
        assert_eq!(parse_move("d0", 9), None);
        assert_eq!(parse_move("d10", 9), None);
        assert_eq!(parse_move("z3", 9), None);
        assert_eq!(parse_move("d4x", 9), None);
    }

    #[test]
    fn clones_are_independent() {
        let mut g = game(5, 7);
        g.play(at(5, 2, 2), Colour::Black);
        let snapshot = g.clone();
        g.play(at(5, 3, 3), Colour::White);
        assert_eq!(snapshot.board().value(at(5, 3, 3)), Colour::None);
        assert_eq!(snapshot.board().stones(), 1);
        assert_eq!(g.board().stones(), 2);
    }
}
