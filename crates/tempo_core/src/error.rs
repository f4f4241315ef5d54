//! Error types for position parsing and move notation.

use thiserror::Error;

use crate::types::Color;

/// Reasons a position-description (FEN) string is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected at least 4 fields, found {0}")]
    FieldCount(usize),

    #[error("expected 8 ranks in piece placement, found {0}")]
    RankCount(usize),

    #[error("rank {rank} describes {files} files")]
    FileCount { rank: usize, files: usize },

    #[error("invalid piece character '{0}'")]
    PieceChar(char),

    #[error("invalid side to move '{0}'")]
    SideToMove(String),

    #[error("invalid castling character '{0}'")]
    CastlingChar(char),

    #[error("invalid en-passant square '{0}'")]
    EnPassant(String),

    #[error("invalid move counter '{0}'")]
    Counter(String),

    #[error("{color:?} has {count} kings, expected exactly one")]
    KingCount { color: Color, count: usize },
}

/// Reasons a compact move string cannot be turned into a legal move.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("malformed move notation '{0}'")]
    Malformed(String),

    #[error("move '{0}' is not legal in this position")]
    Illegal(String),
}
