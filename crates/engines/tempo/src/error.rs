//! Error types for the search engine crate.

use std::path::PathBuf;

use tempo_core::FenError;
use thiserror::Error;

/// Failures loading a move-preference file. A missing or broken book never
/// stops the engine; callers normally go through
/// [`PreferenceDatabase::load_or_empty`](crate::PreferenceDatabase::load_or_empty).
#[derive(Error, Debug)]
pub enum BookError {
    #[error("failed to read preference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse preference data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("preference data must be a JSON object of phase buckets")]
    NotAnObject,
}

/// Failures loading an engine configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors surfaced by [`SearchEngine::respond`](crate::SearchEngine::respond).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid position: {0}")]
    Position(#[from] FenError),
}
