//! Bounded transposition cache.
//!
//! Entries are keyed by position signature and evicted oldest-inserted first
//! once the table is full. Overwriting an existing key keeps its original
//! insertion slot. Contents are only ever a hint: a miss or a colliding hit
//! costs speed, never correctness beyond the bound semantics in [`probe`].
//!
//! [`probe`]: TranspositionTable::probe

use std::collections::{HashMap, VecDeque};

use tempo_core::Move;

/// How a stored score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Exact,
    /// The true score is at least this (a beta cutoff happened).
    Lower,
    /// The true score is at most this (no move raised alpha).
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub depth: u8,
    pub score: i32,
    pub best_move: Option<Move>,
    pub bound: Bound,
}

/// Outcome of [`TranspositionTable::probe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Nothing usable: no entry, or one searched shallower than requested.
    Miss,
    /// Deep enough, but the bound does not settle the window. Only the
    /// stored move is offered, for ordering.
    Hint(Option<Move>),
    /// The stored score can be returned as the node's value.
    Hit { score: i32, best_move: Option<Move> },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TtStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

impl TtStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: HashMap<u64, TtEntry>,
    order: VecDeque<u64>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(1 << 16)),
            order: VecDeque::with_capacity(capacity.min(1 << 16)),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Records a search result, evicting the oldest entry when full.
    /// A zero-capacity table stores nothing.
    pub fn store(
        &mut self,
        signature: u64,
        depth: u8,
        score: i32,
        best_move: Option<Move>,
        bound: Bound,
    ) {
        if self.capacity == 0 {
            return;
        }
        let entry = TtEntry {
            depth,
            score,
            best_move,
            bound,
        };
        if let Some(slot) = self.entries.get_mut(&signature) {
            *slot = entry;
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.entries.insert(signature, entry);
        self.order.push_back(signature);
    }

    /// Looks up `signature` for a node searched to `depth` with window
    /// (`alpha`, `beta`).
    ///
    /// Entries shallower than `depth` are ignored and count as misses. An
    /// exact entry always hits; a lower bound hits only when its score is
    /// `>= beta`, an upper bound only when its score is `<= alpha`. Any
    /// other deep-enough entry yields a [`Probe::Hint`].
    pub fn probe(&mut self, signature: u64, depth: u8, alpha: i32, beta: i32) -> Probe {
        let Some(entry) = self.entries.get(&signature) else {
            self.misses += 1;
            return Probe::Miss;
        };
        if entry.depth < depth {
            self.misses += 1;
            return Probe::Miss;
        }
        self.hits += 1;

        let settled = match entry.bound {
            Bound::Exact => true,
            Bound::Lower => entry.score >= beta,
            Bound::Upper => entry.score <= alpha,
        };
        if settled {
            Probe::Hit {
                score: entry.score,
                best_move: entry.best_move,
            }
        } else {
            Probe::Hint(entry.best_move)
        }
    }

    /// Raw entry access, without touching the statistics.
    #[cfg(test)]
    fn get(&self, signature: u64) -> Option<&TtEntry> {
        self.entries.get(&signature)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry and resets the statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> TtStats {
        TtStats {
            size: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
        }
    }
}

#[cfg(test)]
#[path = "tt_tests.rs"]
mod tt_tests;
