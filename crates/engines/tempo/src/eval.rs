//! Static evaluation.
//!
//! Material plus piece-square tables, scaled per game phase, with center
//! occupation, attacker presence, king pressure and mobility on top. The
//! optional structural terms live in [`crate::patterns`].

use tempo_core::{legal_moves, manhattan, Board, Color, PieceKind, file_of, rank_of};

use crate::config::{EngineConfig, EvalConfig, PhaseConfig};
use crate::patterns;
use crate::phase::GamePhase;

// Piece-square tables from White's point of view, listed rank 8 first
// (index 0 = a8). A white piece on `sq` reads `sq ^ 56`; a black piece
// reads `sq` directly, which mirrors the table vertically.
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

const INNER_CENTER_BONUS: i32 = 20;
const CENTER_BONUS: i32 = 10;
const KING_PRESSURE_RADIUS: i32 = 3;
const KING_PRESSURE_STEP: i32 = 15;

fn table(kind: PieceKind) -> &'static [i32; 64] {
    match kind {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King => &KING_TABLE,
    }
}

/// Positional bonus of `kind` for `color` standing on `sq`, before phase
/// scaling.
pub fn piece_square(kind: PieceKind, color: Color, sq: u8) -> i32 {
    let idx = match color {
        Color::White => sq ^ 56,
        Color::Black => sq,
    };
    table(kind)[idx as usize]
}

/// Phase multiplier on the positional bonus, in percent.
fn phase_scale(phase: GamePhase, kind: PieceKind) -> i32 {
    use PieceKind::*;
    match (phase, kind) {
        (GamePhase::Opening, Knight | Bishop) => 140,
        (GamePhase::Opening, Queen) => 120,
        (GamePhase::Middlegame, Rook | Queen) => 130,
        (GamePhase::Middlegame, Knight) => 120,
        (GamePhase::Endgame, King) => 160,
        (GamePhase::Endgame, Pawn) => 150,
        _ => 100,
    }
}

fn mobility_weight(phase: GamePhase) -> i32 {
    match phase {
        GamePhase::Opening => 18,
        GamePhase::Middlegame => 14,
        GamePhase::Endgame => 10,
    }
}

fn attacker_weight(phase: GamePhase) -> i32 {
    match phase {
        GamePhase::Middlegame => 25,
        _ => 15,
    }
}

fn center_bonus(sq: u8) -> i32 {
    let (f, r) = (file_of(sq), rank_of(sq));
    let mut bonus = 0;
    if (3..=4).contains(&f) && (3..=4).contains(&r) {
        bonus += INNER_CENTER_BONUS;
    }
    if (2..=5).contains(&f) && (2..=5).contains(&r) {
        bonus += CENTER_BONUS;
    }
    bonus
}

/// Phase-aware position scorer. Stateless apart from its settings, so one
/// instance can be shared by every node of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluator {
    phase: PhaseConfig,
    settings: EvalConfig,
}

impl Evaluator {
    pub fn new(phase: PhaseConfig, settings: EvalConfig) -> Self {
        Self { phase, settings }
    }

    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self::new(cfg.phase, cfg.eval)
    }

    pub fn phase_of(&self, ply: usize) -> GamePhase {
        GamePhase::from_ply(ply, &self.phase)
    }

    /// Score of `board` in centipawns from the side to move's point of view.
    /// `ply` is the number of plies played in the game and only selects the
    /// phase.
    pub fn evaluate(&self, board: &Board, ply: usize) -> i32 {
        let phase = self.phase_of(ply);
        let mut score = self.side_independent(board, phase);

        let mobility = legal_moves(board).len() as i32;
        score += board.side_to_move.sign() * mobility * mobility_weight(phase);

        match board.side_to_move {
            Color::White => score,
            Color::Black => -score,
        }
    }

    /// Everything except mobility, positive when White is better.
    fn side_independent(&self, board: &Board, phase: GamePhase) -> i32 {
        let mut score = 0;
        let mut center = 0;
        let mut attackers = 0;

        for (sq, pc) in board.pieces() {
            let sign = pc.color.sign();
            score += sign * pc.kind.value();
            score += sign * piece_square(pc.kind, pc.color, sq) * phase_scale(phase, pc.kind) / 100;
            center += sign * center_bonus(sq);

            if matches!(pc.kind, PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen) {
                attackers += sign;
            }
            if pc.kind != PieceKind::Pawn && pc.kind != PieceKind::King {
                if let Some(ksq) = board.king_sq(pc.color.other()) {
                    let dist = manhattan(sq, ksq);
                    if dist <= KING_PRESSURE_RADIUS {
                        score += sign * (KING_PRESSURE_RADIUS + 1 - dist) * KING_PRESSURE_STEP;
                    }
                }
            }
        }

        score += center * 12 / 10;
        score += attackers * attacker_weight(phase);
        if self.settings.pattern_terms {
            score += patterns::structure(board);
        }
        score
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
