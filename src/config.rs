//! Engine parameters.
//!
//! The search behaviour is governed by a handful of constants. They are
//! collected in [`EngineConfig`] so callers can tune them; the defaults are
//! the values the engine was calibrated with.

/// Default board side length.
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Default komi, added to White's area score.
pub const DEFAULT_KOMI: i32 = 7;

/// Default number of simulations per generated move.
pub const DEFAULT_PLAYOUTS: u32 = 500_000;

/// Root win rate below which the engine resigns.
pub const DEFAULT_RESIGN_THRESHOLD: f64 = 0.1;

/// Chance of probing the 3x3 patterns around the opponent's last stone
/// before falling back to a uniform random move.
pub const DEFAULT_PATTERN_PROBE: f64 = 0.5;

/// Largest board side the engine accepts.
pub const MAX_BOARD_SIZE: usize = 19;

/// Tunable engine parameters.
#[derive(Copy, Clone, Debug)]
pub struct EngineConfig {
    /// Board side length, fixed for the whole match.
    pub board_size: usize,
    /// Integer komi.
    pub komi: i32,
    /// Simulation budget per move.
    pub playouts: u32,
    /// Resign when the root win rate drops below this.
    pub resign_threshold: f64,
    /// Probability of the local pattern probe in playouts.
    pub pattern_probe: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            board_size: DEFAULT_BOARD_SIZE,
            komi: DEFAULT_KOMI,
            playouts: DEFAULT_PLAYOUTS,
            resign_threshold: DEFAULT_RESIGN_THRESHOLD,
            pattern_probe: DEFAULT_PATTERN_PROBE,
        }
    }
}
