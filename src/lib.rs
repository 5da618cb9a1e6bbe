//! Tenuki: a minimalistic Go engine.
//!
//! The engine picks moves by parallel Monte-Carlo tree search: UCT descent
//! over a shared tree, lazily expanded, evaluated by uniform random
//! playouts biased with 3x3 local patterns. Board state is maintained
//! incrementally (union-find groups, incidence-counted liberties, Zobrist
//! hashing) under positional superko. A GTP front end lets controllers
//! drive a game.
//!
//! ## Modules
//!
//! - [`colour`] - Point and player colours
//! - [`zobrist`] - Position hash keys
//! - [`board`] - Incremental board: groups, captures, scoring
//! - [`game`] - Legality, superko, termination
//! - [`pattern`] - 3x3 playout patterns
//! - [`playout`] - Random game simulation
//! - [`mcts`] - The parallel search
//! - [`config`] - Engine tunables
//! - [`gtp`] - The protocol front end
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tenuki::colour::Colour;
//! use tenuki::config::EngineConfig;
//! use tenuki::game::Game;
//! use tenuki::mcts::find_move;
//! use tenuki::zobrist::ZobristTable;
//!
//! let config = EngineConfig {
//!     board_size: 5,
//!     komi: 7,
//!     playouts: 1_000,
//!     ..EngineConfig::default()
//! };
//! let zobrist = Arc::new(ZobristTable::with_size(42, 5 * 5));
//! let mut game = Game::new(5, config.komi, zobrist);
//!
//! let mv = find_move(&game, Colour::Black, 42, &config);
//! game.play(mv, Colour::Black);
//! ```

pub mod board;
pub mod colour;
pub mod config;
pub mod game;
pub mod gtp;
pub mod mcts;
pub mod pattern;
pub mod playout;
pub mod zobrist;
