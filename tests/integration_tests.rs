//! End-to-end scenarios driven through the public API: whole games, capture
//! and ko sequences, scoring, and a small search.

use std::sync::Arc;

use tenuki::board::Board;
use tenuki::colour::Colour;
use tenuki::config::EngineConfig;
use tenuki::game::{format_move, Game, IllegalMove, Move, PASS, RESIGN};
use tenuki::mcts::find_move;
use tenuki::zobrist::ZobristTable;

// =============================================================================
// Helpers
// =============================================================================

fn new_game(size: usize, komi: i32) -> Game {
    let zobrist = Arc::new(ZobristTable::with_size(0x7E57, size * size));
    Game::new(size, komi, zobrist)
}

/// Play `(x, y, colour)` scripts; every move must stay legal.
fn script(game: &mut Game, moves: &[(usize, usize, Colour)]) {
    let size = game.board().size();
    for &(x, y, col) in moves {
        let mv = y * size + x;
        assert!(
            !game.is_illegal(mv, col),
            "scripted move {} for {col} is illegal",
            format_move(mv, size)
        );
        game.play(mv, col);
        assert_eq!(game.winner(), Colour::None);
    }
}

fn at(size: usize, x: usize, y: usize) -> Move {
    y * size + x
}

// =============================================================================
// Captures and board bookkeeping
// =============================================================================

#[test]
fn corner_capture_leaves_one_group() {
    use Colour::{Black, White};
    let mut g = new_game(5, 7);
    script(
        &mut g,
        &[(0, 0, White), (1, 0, Black), (1, 1, Black), (0, 1, Black)],
    );
    let b = g.board();
    assert_eq!(b.value(at(5, 0, 0)), Colour::None);
    assert_eq!(b.stones(), 3);
    let root = b.group_location(at(5, 0, 1));
    assert_eq!(b.group_stones(root), 3);
    assert_eq!(b.group_edges(root), 6);
    assert!(b.bookkeeping_ok());
}

#[test]
fn hash_preview_matches_through_a_whole_game() {
    use Colour::{Black, White};
    let mut g = new_game(5, 7);
    let moves = [
        (2usize, 2usize, Black),
        (2, 1, White),
        (1, 1, Black),
        (3, 2, White),
        (2, 3, Black),
        (3, 3, White),
        (3, 1, Black),
    ];
    let size = g.board().size();
    for &(x, y, col) in &moves {
        let mv = at(size, x, y);
        assert!(!g.is_illegal(mv, col));
        let preview = g.board().pre_compute_hash(mv, col);
        g.play(mv, col);
        assert_eq!(g.board().hash(), preview, "preview diverged at {x},{y}");
        assert!(g.board().bookkeeping_ok());
    }
}

#[test]
fn boards_reaching_the_same_position_agree() {
    let zobrist = Arc::new(ZobristTable::with_size(0x7E57, 25));
    let mut a = Board::new(5, zobrist.clone());
    let mut b = Board::new(5, zobrist);
    a.play(3, Colour::Black);
    a.play(17, Colour::White);
    b.play(17, Colour::White);
    b.play(3, Colour::Black);
    assert_eq!(a, b);
    assert_eq!(a.hash(), b.hash());
}

// =============================================================================
// Termination and scoring
// =============================================================================

#[test]
fn two_passes_on_an_empty_board_go_to_white() {
    let mut g = new_game(5, 6);
    g.play(PASS, Colour::Black);
    g.play(PASS, Colour::White);
    assert_eq!(g.winner(), Colour::White);
}

#[test]
fn resignation_ends_the_game_immediately() {
    let mut g = new_game(5, 7);
    g.play(at(5, 2, 2), Colour::Black);
    g.play(RESIGN, Colour::White);
    assert_eq!(g.winner(), Colour::Black);
}

#[test]
fn territory_plus_stones_decide_the_scored_game() {
    use Colour::{Black, White};
    // Black owns the two right columns; White one corner stone; komi 7.
    let mut g = new_game(5, 7);
    script(
        &mut g,
        &[
            (0, 0, White),
            (3, 0, Black),
            (3, 1, Black),
            (3, 2, Black),
            (3, 3, Black),
            (3, 4, Black),
        ],
    );
    g.play(PASS, Colour::Black);
    g.play(PASS, Colour::White);
    // 5 stones + 5 territory beat 1 + 7.
    assert_eq!(g.winner(), Colour::Black);
}

// =============================================================================
// Superko
// =============================================================================

#[test]
fn ko_recapture_is_rejected_then_forfeited() {
    use Colour::{Black, White};
    let mut g = new_game(5, 7);
    script(
        &mut g,
        &[
            (1, 1, Black),
            (2, 1, White),
            (0, 2, Black),
            (1, 2, White),
            (1, 3, Black),
            (3, 2, White),
            (2, 3, White),
        ],
    );
    // Black takes the ko.
    let take = at(5, 2, 2);
    assert!(!g.is_illegal(take, Colour::Black));
    g.play(take, Colour::Black);
    assert_eq!(g.board().value(at(5, 1, 2)), Colour::None);

    // The immediate recapture would repeat the position.
    let retake = at(5, 1, 2);
    assert_eq!(g.check_move(retake, Colour::White), Err(IllegalMove::Superko));

    // White can play a ko threat elsewhere instead.
    assert!(!g.is_illegal(at(5, 4, 4), Colour::White));

    // Forcing the recapture through forfeits for White.
    g.play(retake, Colour::White);
    assert_eq!(g.winner(), Colour::Black);
}

// =============================================================================
// Suicide
// =============================================================================

#[test]
fn filled_eye_is_suicide_for_the_opponent() {
    use Colour::White;
    let mut g = new_game(5, 7);
    script(
        &mut g,
        &[(2, 1, White), (1, 2, White), (3, 2, White), (2, 3, White)],
    );
    let eye = at(5, 2, 2);
    assert!(g.board().is_suicide(eye, Colour::Black));
    assert_eq!(g.check_move(eye, Colour::Black), Err(IllegalMove::Suicide));
    // White itself may fill.
    assert!(!g.board().is_suicide(eye, Colour::White));
}

#[test]
fn the_only_point_of_a_1x1_board_is_dead() {
    let g = new_game(1, 0);
    assert!(g.board().is_suicide(0, Colour::Black));
    assert_eq!(g.check_move(0, Colour::Black), Err(IllegalMove::Suicide));
    // Passing still works and ends the game.
    let mut g = g;
    g.play(PASS, Colour::Black);
    g.play(PASS, Colour::White);
    assert_eq!(g.winner(), Colour::White);
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn search_produces_a_playable_move() {
    let config = EngineConfig {
        board_size: 5,
        komi: 7,
        playouts: 400,
        ..EngineConfig::default()
    };
    let g = new_game(5, 7);
    let mv = find_move(&g, Colour::Black, 1234, &config);
    assert!(mv == PASS || mv == RESIGN || !g.is_illegal(mv, Colour::Black));
}

#[test]
fn engine_against_itself_keeps_the_board_sound() {
    let config = EngineConfig {
        board_size: 3,
        komi: 1,
        playouts: 80,
        ..EngineConfig::default()
    };
    let mut g = new_game(3, 1);
    let mut col = Colour::Black;
    for turn in 0..12 {
        if g.is_over() {
            break;
        }
        let mv = find_move(&g, col, 100 + turn, &config);
        g.play(mv, col);
        assert!(g.board().bookkeeping_ok(), "bookkeeping broke at turn {turn}");
        col = col.invert();
    }
}
