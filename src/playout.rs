//! Random playouts.
//!
//! A playout finishes the game from a given position with cheap, biased
//! random moves and reports the winner. Half the time the policy first
//! probes the 3x3 patterns around the opponent's last stone; otherwise it
//! draws uniformly from the remaining candidate moves, skipping illegal
//! moves and own eyes, and passes only from a winning position. When no
//! candidate survives, the side to move resigns.

use rand::rngs::StdRng;
use rand::Rng;

use crate::colour::Colour;
use crate::config::EngineConfig;
use crate::game::{Game, Move, PASS, RESIGN};
use crate::pattern::pattern_match;

/// Per-worker scratch: the PRNG, the reusable candidate array and counters.
/// Never shared between threads.
pub struct WorkerState {
    pub rng: StdRng,
    /// All board points plus `PASS`. Rejected candidates are swapped to the
    /// end of the live prefix, so rejection costs O(1) and the array never
    /// shrinks; each ply restarts with the full prefix.
    moves: Vec<Move>,
    /// Playouts that ran while another worker held the expansion ticket.
    pub burned: usize,
    pattern_probe: f64,
}

impl WorkerState {
    pub fn new(rng: StdRng, board_points: usize, config: &EngineConfig) -> Self {
        let mut moves: Vec<Move> = (0..board_points).collect();
        moves.push(PASS);
        WorkerState {
            rng,
            moves,
            burned: 0,
            pattern_probe: config.pattern_probe,
        }
    }
}

/// Play random moves until the game is decided; returns the winner.
///
/// `last_move` is the move that led to this position, feeding the pattern
/// probe. Pattern moves skip the legality filter on purpose: an illegal one
/// forfeits through [`Game::play`], which is rare and costs one playout.
pub fn playout(
    game: &mut Game,
    to_move: Colour,
    state: &mut WorkerState,
    last_move: Move,
) -> Colour {
    let mut col = to_move;
    let mut last_move = last_move;
    while game.winner() == Colour::None {
        let mut mv = RESIGN;

        if last_move != PASS && last_move != RESIGN && state.rng.random_bool(state.pattern_probe) {
            mv = probe_patterns(game, col, last_move, &mut state.rng);
        }

        if mv == RESIGN {
            let mut live = state.moves.len();
            loop {
                if live == 0 {
                    mv = RESIGN;
                    break;
                }
                let idx = state.rng.random_range(0..live);
                let candidate = state.moves[idx];
                let accept = if candidate == PASS {
                    // Pass only from a position that already wins on area.
                    game.score_winner() == col
                } else {
                    !game.is_illegal(candidate, col)
                        && !game.board().is_eye_like(candidate, col)
                };
                if accept {
                    mv = candidate;
                    break;
                }
                live -= 1;
                state.moves.swap(idx, live);
            }
        }

        game.play(mv, col);
        last_move = mv;
        col = col.invert();
    }
    game.winner()
}

/// Pattern-matching empty neighbours of the last move; picks one uniformly,
/// or returns `RESIGN` when none match.
fn probe_patterns(game: &Game, col: Colour, last_move: Move, rng: &mut StdRng) -> Move {
    let size = game.board().size();
    let x = last_move % size;
    let y = last_move / size;
    let mut candidates = [0 as Move; 4];
    let mut len = 0;
    let mut consider = |nx: usize, ny: usize| {
        let p = ny * size + nx;
        if game.board().value(p) == Colour::None && pattern_match(game.board(), nx, ny, col) {
            candidates[len] = p;
            len += 1;
        }
    };
    if y > 0 {
        consider(x, y - 1);
    }
    if x > 0 {
        consider(x - 1, y);
    }
    if y + 1 < size {
        consider(x, y + 1);
    }
    if x + 1 < size {
        consider(x + 1, y);
    }
    if len == 0 {
        RESIGN
    } else {
        candidates[rng.random_range(0..len)]
    }
}
