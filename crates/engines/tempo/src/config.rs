//! Engine configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it wants to
//! change:
//!
//! ```toml
//! max_depth = 8
//!
//! [search]
//! use_quiescence = false
//!
//! [book.windows]
//! opening = 6
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::phase::GamePhase;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Iterative-deepening ceiling before complexity and endgame adjustments.
    pub max_depth: u8,
    /// Transposition table capacity in entries.
    pub tt_capacity: usize,
    /// Budget used by front ends when no clock information is given.
    pub default_movetime_ms: u64,
    /// Seed for the book's random source. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub phase: PhaseConfig,
    pub book: BookConfig,
    pub ordering: OrderingConfig,
    pub eval: EvalConfig,
    pub search: SearchConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            tt_capacity: 100_000,
            default_movetime_ms: 2000,
            seed: None,
            phase: PhaseConfig::default(),
            book: BookConfig::default(),
            ordering: OrderingConfig::default(),
            eval: EvalConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads `path`, falling back to defaults (with a warning) when the file
    /// is missing or malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.as_ref().display(), error = %e, "using default engine config");
                Self::default()
            }
        }
    }
}

/// Ply thresholds separating the three game phases. A ply count up to and
/// including `opening_until_ply` is the opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    pub opening_until_ply: usize,
    pub middlegame_until_ply: usize,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            opening_until_ply: 15,
            middlegame_until_ply: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// The book is not consulted once this many plies have been played.
    pub max_ply: usize,
    pub windows: BookWindows,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            max_ply: 35,
            windows: BookWindows::default(),
        }
    }
}

/// Number of trailing moves forming a book key, per phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookWindows {
    pub opening: usize,
    pub middlegame: usize,
    pub endgame: usize,
}

impl Default for BookWindows {
    fn default() -> Self {
        Self {
            opening: 8,
            middlegame: 6,
            endgame: 4,
        }
    }
}

impl BookWindows {
    pub fn for_phase(&self, phase: GamePhase) -> usize {
        match phase {
            GamePhase::Opening => self.opening,
            GamePhase::Middlegame => self.middlegame,
            GamePhase::Endgame => self.endgame,
        }
    }
}

/// Additive move-ordering bonuses. Captures add the victim's material value
/// on top of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingConfig {
    pub preference: i32,
    pub promotion: i32,
    pub check: i32,
    pub center: i32,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            preference: 10_000,
            promotion: 800,
            check: 300,
            center: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Pawn structure, rook coordination, king shield and outpost terms.
    pub pattern_terms: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            pattern_terms: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Cut off siblings once alpha >= beta. Off gives plain minimax.
    pub pruning: bool,
    pub use_tt: bool,
    pub use_quiescence: bool,
    /// Quiescence plies (from its entry) in which quiet checks are searched.
    pub quiescence_check_plies: u8,
    /// Hard cap on quiescence recursion.
    pub quiescence_max_plies: u8,
    /// Deepen or shorten the search by position complexity.
    pub adaptive_depth: bool,
    /// Stretch or shrink the time budget by position complexity.
    pub adaptive_time: bool,
    pub endgame_extra_depth: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pruning: true,
            use_tt: true,
            use_quiescence: true,
            quiescence_check_plies: 1,
            quiescence_max_plies: 32,
            adaptive_depth: true,
            adaptive_time: true,
            endgame_extra_depth: 1,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
