//! Go Text Protocol (GTP) front end.
//!
//! A thin line-oriented dispatcher over the engine: it parses controller
//! commands from stdin, drives the [`Game`] and the search, and prints
//! `=`/`?` framed responses on stdout. Engine state never changes on a
//! failed command.
//!
//! ## Supported commands
//!
//! `protocol_version`, `name`, `version`, `known_command`, `list_commands`,
//! `quit`, `boardsize`, `clear_board`, `komi`, `play`, `genmove`.
//!
//! Vertices use the usual letter-digit notation with the `I` column
//! skipped; see [`crate::game::format_move`].

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::colour::Colour;
use crate::config::{EngineConfig, MAX_BOARD_SIZE};
use crate::game::{format_move, parse_move, Game, Move};
use crate::mcts::find_move;
use crate::zobrist::ZobristTable;

/// Commands the dispatcher understands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "version",
];

/// Dispatcher-level failures, reported on the `?` channel. None of these
/// touch the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GtpError {
    #[error("syntax error")]
    Syntax,
    #[error("unknown command")]
    UnknownCommand,
    #[error("unacceptable size")]
    UnacceptableSize,
    #[error("illegal move")]
    IllegalMove,
    #[error("game is already decided")]
    GameOver,
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Request {
    id: Option<u32>,
    name: String,
    args: Vec<String>,
}

/// Strip comments and control characters, split off the optional numeric
/// id, the command name and its arguments. Lines with nothing left are
/// dropped.
fn parse_line(line: &str) -> Option<Request> {
    let mut cleaned = String::with_capacity(line.len());
    for c in line.chars() {
        if c == '#' {
            break;
        }
        if c == '\t' {
            cleaned.push(' ');
        } else if c >= ' ' && c != '\u{7f}' {
            cleaned.push(c);
        }
    }
    let mut tokens = cleaned.split_whitespace();
    let first = tokens.next()?;
    let (id, name) = match first.parse::<u32>() {
        Ok(id) => (Some(id), tokens.next().unwrap_or("").to_string()),
        Err(_) => (None, first.to_string()),
    };
    let args = tokens.map(str::to_string).collect();
    Some(Request { id, name, args })
}

fn parse_colour(s: &str) -> Option<Colour> {
    match s.to_ascii_lowercase().as_str() {
        "b" | "black" => Some(Colour::Black),
        "w" | "white" => Some(Colour::White),
        _ => None,
    }
}

/// The GTP engine: one game, its hash table, and a seed source for
/// searches.
pub struct GtpEngine {
    game: Game,
    zobrist: Arc<ZobristTable>,
    config: EngineConfig,
    rng: StdRng,
}

impl GtpEngine {
    /// A fresh engine. `seed` drives both the Zobrist table and every
    /// subsequent search, so a fixed seed gives a reproducible session.
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let table = ZobristTable::with_size(rng.random(), config.board_size * config.board_size);
        let zobrist = Arc::new(table);
        let game = Game::new(config.board_size, config.komi, zobrist.clone());
        GtpEngine {
            game,
            zobrist,
            config,
            rng,
        }
    }

    #[inline]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Discard the current game and start over, possibly on a new board
    /// size. Must not be called while a search is in flight; the command
    /// loop guarantees that.
    fn reset_game(&mut self, size: usize) {
        if size != self.config.board_size {
            self.config.board_size = size;
            let mut table = (*self.zobrist).clone();
            table.init(size * size);
            self.zobrist = Arc::new(table);
        }
        self.game = Game::new(size, self.config.komi, self.zobrist.clone());
    }

    /// Read commands from stdin until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        for line in stdin.lock().lines() {
            let line = line?;
            let Some(request) = parse_line(&line) else {
                continue;
            };
            if request.name == "quit" {
                break;
            }
            let result = self.execute(&request);
            respond(&mut stdout, &request, &result)?;
        }
        Ok(())
    }

    /// Dispatch one request.
    fn execute(&mut self, request: &Request) -> Result<String, GtpError> {
        match request.name.as_str() {
            "protocol_version" => Ok("2".to_string()),
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),
            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "known_command" => {
                let known = request
                    .args
                    .first()
                    .is_some_and(|c| KNOWN_COMMANDS.contains(&c.to_ascii_lowercase().as_str()));
                Ok(if known { "true" } else { "false" }.to_string())
            }

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "boardsize" => {
                let size: usize = single_arg(request)?.parse().map_err(|_| GtpError::Syntax)?;
                if size < 2 || size > MAX_BOARD_SIZE {
                    return Err(GtpError::UnacceptableSize);
                }
                self.reset_game(size);
                Ok(String::new())
            }

            "clear_board" => {
                self.reset_game(self.config.board_size);
                Ok(String::new())
            }

            "komi" => {
                let komi: f32 = single_arg(request)?.parse().map_err(|_| GtpError::Syntax)?;
                self.config.komi = komi as i32;
                self.game.set_komi(self.config.komi);
                Ok(String::new())
            }

            "play" => {
                if request.args.len() != 2 {
                    return Err(GtpError::Syntax);
                }
                let col = parse_colour(&request.args[0]).ok_or(GtpError::Syntax)?;
                let mv = parse_move(&request.args[1], self.game.board().size())
                    .ok_or(GtpError::Syntax)?;
                self.apply_external(mv, col)?;
                Ok(String::new())
            }

            "genmove" => {
                let col = parse_colour(single_arg(request)?).ok_or(GtpError::Syntax)?;
                if self.game.is_over() {
                    return Err(GtpError::GameOver);
                }
                let seed = self.rng.random();
                let mv = find_move(&self.game, col, seed, &self.config);
                self.game.play(mv, col);
                info!("board after {}:\n{}", format_move(mv, self.game.board().size()),
                    render_board(&self.game));
                Ok(format_move(mv, self.game.board().size()))
            }

            _ => Err(GtpError::UnknownCommand),
        }
    }

    /// Apply a controller-side move, rejecting illegal ones without
    /// touching the game.
    fn apply_external(&mut self, mv: Move, col: Colour) -> Result<(), GtpError> {
        if self.game.is_over() {
            return Err(GtpError::GameOver);
        }
        if self.game.is_illegal(mv, col) {
            return Err(GtpError::IllegalMove);
        }
        self.game.play(mv, col);
        info!("board after {}:\n{}", format_move(mv, self.game.board().size()),
            render_board(&self.game));
        Ok(())
    }
}

/// `=`/`?` framing: marker, optional id, optional message, blank line.
fn respond<W: Write>(out: &mut W, request: &Request, result: &Result<String, GtpError>) -> io::Result<()> {
    let (marker, message) = match result {
        Ok(message) => ('=', message.clone()),
        Err(e) => ('?', e.to_string()),
    };
    write!(out, "{marker}")?;
    if let Some(id) = request.id {
        write!(out, "{id}")?;
    }
    if !message.is_empty() {
        write!(out, " {message}")?;
    }
    writeln!(out)?;
    writeln!(out)?;
    out.flush()
}

fn single_arg(request: &Request) -> Result<&str, GtpError> {
    if request.args.len() != 1 {
        return Err(GtpError::Syntax);
    }
    Ok(&request.args[0])
}

/// Plain text board dump for the log.
fn render_board(game: &Game) -> String {
    let size = game.board().size();
    let mut out = String::with_capacity(size * (size * 3 + 1));
    for y in 0..size {
        for x in 0..size {
            out.push_str(match game.board().value_at(x, y) {
                Colour::Black => " B ",
                Colour::White => " W ",
                _ => " - ",
            });
        }
        out.push('\n');
    }
    out
}
