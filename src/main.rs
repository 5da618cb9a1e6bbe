use clap::Parser;
use rand::Rng;

use tenuki::config::{EngineConfig, DEFAULT_BOARD_SIZE, DEFAULT_KOMI, DEFAULT_PLAYOUTS};
use tenuki::gtp::GtpEngine;

/// A minimalistic Go engine speaking GTP on stdin/stdout.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Board side length.
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    size: usize,

    /// Integer komi added to White's area score.
    #[arg(long, default_value_t = DEFAULT_KOMI)]
    komi: i32,

    /// Simulation budget per generated move.
    #[arg(long, default_value_t = DEFAULT_PLAYOUTS)]
    playouts: u32,

    /// Seed for the hash table and the searches; random when absent.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = EngineConfig {
        board_size: args.size,
        komi: args.komi,
        playouts: args.playouts,
        ..EngineConfig::default()
    };
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    GtpEngine::new(config, seed).run()
}
