//! Move-preference database ("book").
//!
//! A read-only mapping, per game phase, from a key made of the last few
//! played moves to a weighted list of candidate replies. It is loaded once and
//! shared between engines through an `Arc`.
//!
//! File format (JSON):
//!
//! ```json
//! {
//!   "openings": {
//!     "start": [{ "move": "e2e4", "weight": 0.6 }, { "move": "d2d4", "weight": 0.4 }],
//!     "e2e4 e7e5": [["g1f3", 3], ["f1c4", 1]]
//!   },
//!   "middlegames": {},
//!   "endgames": { "e1e2 e8e7 e2e3 e7e6": ["e3e4"] }
//! }
//! ```
//!
//! A candidate may be an object, a `[move, weight]` pair or a bare move
//! (weight 1). Weights are normalised per key. Entries that cannot be read
//! are skipped with a warning; they never fail the load.

use std::collections::HashMap;
use std::path::Path;

use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::BookError;
use crate::phase::GamePhase;

/// Key used when no move has been played yet.
pub const START_KEY: &str = "start";

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Compact move notation, e.g. `e2e4`.
    pub notation: String,
    /// Probability weight. The weights of one key sum to 1.
    pub weight: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCandidate {
    Object {
        #[serde(rename = "move")]
        notation: String,
        #[serde(default = "unit_weight")]
        weight: f64,
    },
    Pair(String, f64),
    Bare(String),
}

fn unit_weight() -> f64 {
    1.0
}

impl RawCandidate {
    fn into_parts(self) -> (String, f64) {
        match self {
            RawCandidate::Object { notation, weight } => (notation, weight),
            RawCandidate::Pair(notation, weight) => (notation, weight),
            RawCandidate::Bare(notation) => (notation, 1.0),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PreferenceDatabase {
    buckets: HashMap<GamePhase, HashMap<String, Vec<Candidate>>>,
}

impl PreferenceDatabase {
    /// A database with no entries. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json_str(s: &str) -> Result<Self, BookError> {
        let root: Value = serde_json::from_str(s)?;
        let Value::Object(root) = root else {
            return Err(BookError::NotAnObject);
        };

        let mut db = Self::empty();
        for (bucket, entries) in root {
            let Some(phase) = phase_for_bucket(&bucket) else {
                debug!(bucket = %bucket, "ignoring unknown preference bucket");
                continue;
            };
            let Value::Object(entries) = entries else {
                warn!(bucket = %bucket, "preference bucket is not an object, skipped");
                continue;
            };
            for (key, list) in entries {
                let Value::Array(list) = list else {
                    warn!(bucket = %bucket, key = %key, "candidate list is not an array, skipped");
                    continue;
                };
                let mut pairs = Vec::with_capacity(list.len());
                for item in list {
                    match serde_json::from_value::<RawCandidate>(item) {
                        Ok(raw) => pairs.push(raw.into_parts()),
                        Err(e) => {
                            warn!(bucket = %bucket, key = %key, error = %e, "malformed candidate, skipped")
                        }
                    }
                }
                db.insert(phase, key, pairs);
            }
        }
        debug!(keys = db.len(), "preference database parsed");
        Ok(db)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| BookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Loads `path`, or returns an empty database (with a warning) when the
    /// file is missing or unreadable.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(db) => db,
            Err(e) => {
                warn!(path = %path.as_ref().display(), error = %e, "continuing without a preference database");
                Self::empty()
            }
        }
    }

    /// Adds or replaces the candidates for `key`. Weights that are not
    /// finite and positive are dropped, the rest normalised to sum to 1.
    pub fn insert<S: Into<String>>(&mut self, phase: GamePhase, key: impl Into<String>, pairs: Vec<(S, f64)>) {
        let key = key.into();
        let mut candidates: Vec<Candidate> = Vec::with_capacity(pairs.len());
        for (notation, weight) in pairs {
            let notation = notation.into();
            if !weight.is_finite() || weight <= 0.0 {
                warn!(key = %key, notation = %notation, weight, "unusable weight, candidate skipped");
                continue;
            }
            candidates.push(Candidate { notation, weight });
        }
        if candidates.is_empty() {
            return;
        }
        let total: f64 = candidates.iter().map(|c| c.weight).sum();
        for c in &mut candidates {
            c.weight /= total;
        }
        self.buckets.entry(phase).or_default().insert(key, candidates);
    }

    /// Candidates stored for `key`, best listed first as in the source file.
    /// Empty when the key is unknown.
    pub fn candidates(&self, phase: GamePhase, key: &str) -> &[Candidate] {
        self.buckets
            .get(&phase)
            .and_then(|b| b.get(key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Weighted random pick among the candidates for `key`.
    ///
    /// Draws a fraction in `[0, 1)` and returns the first candidate whose
    /// cumulative weight reaches it. Rounding leftovers fall back to the
    /// first candidate.
    pub fn select<R: Rng + ?Sized>(&self, phase: GamePhase, key: &str, rng: &mut R) -> Option<&Candidate> {
        let candidates = self.candidates(phase, key);
        let first = candidates.first()?;
        let draw: f64 = rng.gen();
        let mut cumulative = 0.0;
        for c in candidates {
            cumulative += c.weight;
            if cumulative >= draw {
                return Some(c);
            }
        }
        Some(first)
    }

    /// Number of keys across all phases.
    pub fn len(&self) -> usize {
        self.buckets.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Book key for a game whose moves so far are `history`: the last `window`
/// moves joined by spaces, or [`START_KEY`] before the first move.
pub fn position_key<S: AsRef<str>>(history: &[S], window: usize) -> String {
    if history.is_empty() {
        return START_KEY.to_string();
    }
    let from = history.len().saturating_sub(window);
    history[from..]
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

fn phase_for_bucket(name: &str) -> Option<GamePhase> {
    match name {
        "openings" | "opening" => Some(GamePhase::Opening),
        "middlegames" | "middlegame" => Some(GamePhase::Middlegame),
        "endgames" | "endgame" => Some(GamePhase::Endgame),
        _ => None,
    }
}

#[cfg(test)]
#[path = "book_tests.rs"]
mod book_tests;
