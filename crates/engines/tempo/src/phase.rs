//! Game phase inferred from the number of plies played.

use serde::{Deserialize, Serialize};

use crate::config::PhaseConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    Opening,
    Middlegame,
    Endgame,
}

impl GamePhase {
    pub fn from_ply(ply: usize, cfg: &PhaseConfig) -> Self {
        if ply <= cfg.opening_until_ply {
            GamePhase::Opening
        } else if ply <= cfg.middlegame_until_ply {
            GamePhase::Middlegame
        } else {
            GamePhase::Endgame
        }
    }
}
