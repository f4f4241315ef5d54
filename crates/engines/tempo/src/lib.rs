//! Tempo search engine.
//!
//! Iterative-deepening negamax with alpha-beta pruning, quiescence search, a
//! bounded transposition cache and a move-preference book, on top of the
//! board and move generator in `tempo_core`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tempo_engine::{EngineConfig, PreferenceDatabase, SearchEngine, SearchRequest};
//!
//! let book = Arc::new(PreferenceDatabase::load_or_empty("book.json"));
//! let mut engine = SearchEngine::new(EngineConfig::default(), book);
//! let response = engine.respond(&SearchRequest {
//!     fen: tempo_core::START_FEN.to_string(),
//!     history: Vec::new(),
//!     budget_ms: 500,
//! });
//! ```

pub mod book;
pub mod config;
pub mod error;
pub mod eval;
pub mod ordering;
pub mod patterns;
pub mod phase;
mod quiescence;
pub mod search;
pub mod tt;

pub use book::{position_key, Candidate, PreferenceDatabase, START_KEY};
pub use config::{
    BookConfig, BookWindows, EngineConfig, EvalConfig, OrderingConfig, PhaseConfig, SearchConfig,
};
pub use error::{BookError, ConfigError, EngineError};
pub use eval::Evaluator;
pub use ordering::{order_moves, ordered_moves};
pub use phase::GamePhase;
pub use search::{
    is_mate_score, SearchEngine, SearchLimits, SearchRequest, SearchResponse, SearchStats, Terminal, Verdict,
    INFINITY, MATE, MAX_DEPTH,
};
pub use tt::{Bound, Probe, TranspositionTable, TtStats};
