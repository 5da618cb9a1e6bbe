//! Parallel Monte-Carlo tree search.
//!
//! One worker thread per hardware thread grows a single shared tree. Each
//! simulation clones the root game, descends the tree by UCT, lazily
//! expands the frontier node it reaches, finishes the game with a random
//! playout and counts the result back up the path.
//!
//! Nothing in the tree is locked. Visit and win counters are relaxed
//! atomics; their transient drift only blurs selection for a moment. The
//! child vector of a node is built exactly once: workers race for the
//! `expanding` ticket, the winner constructs every child and publishes them
//! with a release store of `expanded`, and readers check `expanded` with an
//! acquire load before touching the vector. A worker that loses the race
//! falls back to a playout from the unexpanded node; those playouts are
//! counted as "burned" and reported after the search.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::colour::Colour;
use crate::config::EngineConfig;
use crate::game::{format_move, Game, Move, PASS, RESIGN};
use crate::playout::{playout, WorkerState};

/// Base value of an unvisited child. A random perturbation is added on top,
/// so unvisited children are tried in random order but always before any
/// visited sibling.
const UNVISITED_BONUS: f64 = 100.0;

/// Children below this many visits are not worth printing in the best line.
const LINE_MIN_VISITS: u32 = 100;

/// One node of the search tree.
pub struct Node {
    /// Set exactly once by the worker that wins the expansion ticket.
    children: OnceLock<Vec<Node>>,
    visits: AtomicU32,
    wins: AtomicU32,
    /// First visitor sets this and goes straight to a playout.
    explored: AtomicBool,
    /// Expansion ticket; only its winner builds the child vector.
    expanding: AtomicBool,
    /// Published (release) after the child vector is complete.
    expanded: AtomicBool,
    /// Move that led from the parent to this node; `RESIGN` at the root,
    /// which has no incoming move.
    mv: Move,
}

impl Node {
    pub fn new(mv: Move) -> Self {
        Node {
            children: OnceLock::new(),
            visits: AtomicU32::new(0),
            wins: AtomicU32::new(0),
            explored: AtomicBool::new(false),
            expanding: AtomicBool::new(false),
            expanded: AtomicBool::new(false),
            mv,
        }
    }

    /// The move this node represents.
    #[inline]
    pub fn last_move(&self) -> Move {
        self.mv
    }

    #[inline]
    pub fn visits(&self) -> u32 {
        self.visits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn wins(&self) -> u32 {
        self.wins.load(Ordering::Relaxed)
    }

    /// The children, once their publication has been observed.
    #[inline]
    pub fn children(&self) -> Option<&[Node]> {
        if self.expanded.load(Ordering::Acquire) {
            self.children.get().map(Vec::as_slice)
        } else {
            None
        }
    }
}

/// One child per legal move from this position, board points first, pass
/// last, then publish.
fn expand(node: &Node, game: &Game, col: Colour) {
    let points = game.board().size() * game.board().size();
    let mut children = Vec::new();
    for mv in 0..points {
        if !game.is_illegal(mv, col) {
            children.push(Node::new(mv));
        }
    }
    children.push(Node::new(PASS));
    let published = node.children.set(children).is_ok();
    debug_assert!(published, "expansion has a single writer");
    node.expanded.store(true, Ordering::Release);
}

/// UCT choice among the children of `node`, whose statistics are recorded
/// from the opponent's perspective; hence the `1 - win rate` term.
fn select_uct<'a>(node: &Node, children: &'a [Node], rng: &mut StdRng) -> &'a Node {
    let parent_visits = node.visits.load(Ordering::Relaxed) as f64;
    let mut best = &children[0];
    let mut best_value = 0.0_f64;
    for child in children {
        let visits = child.visits.load(Ordering::Relaxed);
        let value = if visits == 0 {
            UNVISITED_BONUS + rng.random::<u32>() as f64
        } else {
            let wins = child.wins.load(Ordering::Relaxed) as f64;
            1.0 - wins / visits as f64 + (parent_visits.ln() / visits as f64 / 2.0).sqrt()
        };
        if value > best_value {
            best = child;
            best_value = value;
        }
    }
    best
}

/// One simulation from `node`, with `col` to move on the cloned `game`.
///
/// The node's counters are updated after the game is decided: visits
/// always, wins when the winner is the colour that is to move at this node.
fn simulate(game: &mut Game, node: &Node, col: Colour, state: &mut WorkerState, last_move: Move) {
    if game.winner() == Colour::None {
        let mut burn = false;
        if node.explored.swap(true, Ordering::AcqRel) && !node.expanded.load(Ordering::Acquire) {
            if !node.expanding.swap(true, Ordering::AcqRel) {
                expand(node, game, col);
            } else {
                burn = true;
            }
        }
        if let Some(children) = node.children() {
            let child = select_uct(node, children, &mut state.rng);
            game.play(child.mv, col);
            simulate(game, child, col.invert(), state, child.mv);
        } else {
            if burn {
                state.burned += 1;
            }
            playout(game, col, state, last_move);
        }
    }
    node.visits.fetch_add(1, Ordering::Relaxed);
    if game.winner() == col {
        node.wins.fetch_add(1, Ordering::Relaxed);
    }
}

/// Run the full search for `col` and pick a move.
///
/// Spawns one worker per hardware thread; the workers share the tree and an
/// atomic simulation counter and stop once the budget is spent. Each worker
/// derives its own PRNG seed from `seed` so no generator is ever shared.
pub fn find_move(game: &Game, col: Colour, seed: u64, config: &EngineConfig) -> Move {
    debug_assert!(!game.is_over());
    debug_assert!(col.is_player());
    let start = Instant::now();
    let root = Node::new(RESIGN);
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let mut master = StdRng::seed_from_u64(seed);
    let worker_seeds: Vec<u64> = (0..threads).map(|_| master.random()).collect();
    let counter = AtomicU32::new(0);
    let burned = AtomicUsize::new(0);
    let board_points = game.board().size() * game.board().size();

    std::thread::scope(|scope| {
        for &worker_seed in &worker_seeds {
            let root = &root;
            let counter = &counter;
            let burned = &burned;
            scope.spawn(move || {
                let mut state =
                    WorkerState::new(StdRng::seed_from_u64(worker_seed), board_points, config);
                while counter.fetch_add(1, Ordering::Relaxed) < config.playouts {
                    let mut sim = game.clone();
                    simulate(&mut sim, root, col, &mut state, PASS);
                    std::thread::yield_now();
                }
                burned.fetch_add(state.burned, Ordering::Relaxed);
            });
        }
    });

    log_statistics(&root, game.board().size(), burned.load(Ordering::Relaxed), start);
    best_move(&root, config.resign_threshold)
}

/// Pick from the finished root: resign when the overall win rate is below
/// the threshold, otherwise the most visited child. The first child in
/// iteration order wins ties.
pub fn best_move(root: &Node, resign_threshold: f64) -> Move {
    let visits = root.visits();
    if visits > 0 && (root.wins() as f64) / (visits as f64) < resign_threshold {
        return RESIGN;
    }
    let mut best = RESIGN;
    let mut max_visits = 0;
    if let Some(children) = root.children() {
        for child in children {
            let v = child.visits();
            if v > max_visits {
                max_visits = v;
                best = child.mv;
            }
        }
    }
    best
}

/// Post-search report: win rate, playouts, per-point win and effort maps,
/// the principal line, burned playouts and elapsed time.
fn log_statistics(root: &Node, size: usize, burned: usize, start: Instant) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    let total = root.visits().max(1);
    debug!(
        "win rate {:.3} over {} playouts",
        root.wins() as f64 / total as f64,
        root.visits()
    );

    let points = size * size;
    let mut win_pct = vec![0i64; points];
    let mut effort = vec![0i64; points];
    let mut pass_win = 0i64;
    let mut pass_effort = 0i64;
    if let Some(children) = root.children() {
        for child in children {
            let v = child.visits();
            let wp = if v == 0 {
                0
            } else {
                (100.0 - 100.0 * child.wins() as f64 / v as f64 + 0.5) as i64
            };
            let ep = (100.0 * v as f64 / total as f64 + 0.5) as i64;
            if child.mv == PASS {
                pass_win = wp;
                pass_effort = ep;
            } else {
                win_pct[child.mv] = wp;
                effort[child.mv] = ep;
            }
        }
    }
    debug!("win % map:\n{}", render_map(&win_pct, size));
    debug!("win % PASS = {pass_win}");
    debug!("effort map:\n{}", render_map(&effort, size));
    debug!("effort PASS = {pass_effort}");

    let mut line = String::new();
    let mut current = root;
    for _ in 0..5 {
        let Some(children) = current.children() else {
            break;
        };
        let mut next: Option<&Node> = None;
        let mut max_visits = 0;
        for child in children {
            if child.visits() > max_visits {
                max_visits = child.visits();
                next = Some(child);
            }
        }
        let Some(next) = next else { break };
        if next.visits() < LINE_MIN_VISITS {
            break;
        }
        write!(line, "{} ({}) ", format_move(next.mv, size), next.visits()).unwrap();
        current = next;
    }
    debug!("best line: {line}");
    debug!("burned playouts: {burned}");
    debug!("search time: {:.3}s", start.elapsed().as_secs_f64());
}

fn render_map(values: &[i64], size: usize) -> String {
    let mut out = String::with_capacity(values.len() * 3 + size);
    for y in 0..size {
        for x in 0..size {
            if x != 0 {
                out.push(' ');
            }
            write!(out, "{:2}", values[y * size + x]).unwrap();
        }
        out.push('\n');
    }
    out
}
