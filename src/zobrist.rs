//! Zobrist hash keys.
//!
//! Every (point, colour) pair gets an independent 64-bit key, plus one
//! initial key for the empty board. A position hash is the initial key XORed
//! with the keys of all stones on the board, so placing or removing a stone
//! is a single XOR.
//!
//! The table is a pure function of its seed. It is built once per match and
//! shared read-only (via `Arc`) by every board clone; `seed` and `init` must
//! not be called while a search is running.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::colour::Colour;

/// Per-(point, colour) hash keys and the empty-board key.
#[derive(Clone, Debug)]
pub struct ZobristTable {
    /// Two keys per point: black at `2p`, white at `2p + 1`.
    values: Vec<u64>,
    initial: u64,
    rng: StdRng,
}

impl ZobristTable {
    /// An empty table covering zero points. Call [`init`](Self::init) to
    /// grow it before constructing boards.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let initial = rng.random();
        ZobristTable {
            values: Vec::new(),
            initial,
            rng,
        }
    }

    /// A table already covering `size` points.
    pub fn with_size(seed: u64, size: usize) -> Self {
        let mut table = Self::new(seed);
        table.init(size);
        table
    }

    /// Ensure keys exist for `size` points. Growing the table preserves
    /// every existing key; shrinking never happens.
    pub fn init(&mut self, size: usize) {
        while self.values.len() < size * 2 {
            let v = self.rng.random();
            self.values.push(v);
            let v = self.rng.random();
            self.values.push(v);
        }
    }

    /// Reseed and regenerate the initial key and all existing keys.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.initial = self.rng.random();
        for v in &mut self.values {
            *v = self.rng.random();
        }
    }

    /// Key for a stone of `colour` at `point`. For a non-player colour this
    /// returns the initial key; callers must not attach meaning to that.
    #[inline]
    pub fn value(&self, point: usize, colour: Colour) -> u64 {
        match colour {
            Colour::Black => self.values[point * 2],
            Colour::White => self.values[point * 2 + 1],
            _ => self.initial,
        }
    }

    /// The empty-board key.
    #[inline]
    pub fn initial(&self) -> u64 {
        self.initial
    }

    /// Number of points the table covers.
    pub fn points(&self) -> usize {
        self.values.len() / 2
    }
}
