//! Heuristic move ordering.
//!
//! Each move gets an additive score: a book preference dominates, then the
//! captured piece's value, promotion, check and central destination bonuses.
//! Sorting is stable, so equal scores keep generation order.

use std::cmp::Reverse;

use tempo_core::{file_of, gives_check, legal_moves, move_to_notation, rank_of, Board, Move};

use crate::config::OrderingConfig;

/// Ordering score of `mv` on `board`. `preferred` holds compact notations the
/// book lists for the current line.
pub fn score_move(board: &Board, mv: Move, preferred: &[&str], cfg: &OrderingConfig) -> i32 {
    let mut score = 0;
    if !preferred.is_empty() {
        let txt = move_to_notation(mv);
        if preferred.iter().any(|p| *p == txt) {
            score += cfg.preference;
        }
    }
    if let Some(victim) = mv.captured {
        score += victim.kind.value();
    }
    if mv.promo.is_some() {
        score += cfg.promotion;
    }
    if gives_check(board, mv) {
        score += cfg.check;
    }
    if is_central(mv.to) {
        score += cfg.center;
    }
    score
}

/// Sorts `moves` best-first. A `hint` (usually the transposition table's
/// stored move) is then lifted to the front if present.
pub fn order_moves(
    board: &Board,
    moves: &mut [Move],
    preferred: &[&str],
    hint: Option<Move>,
    cfg: &OrderingConfig,
) {
    moves.sort_by_cached_key(|&mv| Reverse(score_move(board, mv, preferred, cfg)));
    if let Some(hint) = hint {
        if let Some(i) = moves.iter().position(|m| m.same_path(&hint)) {
            moves[..=i].rotate_right(1);
        }
    }
}

/// Legal moves of `board` in heuristic order.
pub fn ordered_moves(board: &Board, preferred: &[&str], cfg: &OrderingConfig) -> Vec<Move> {
    let mut moves = legal_moves(board);
    order_moves(board, &mut moves, preferred, None, cfg);
    moves
}

// c3..f6
fn is_central(sq: u8) -> bool {
    (2..=5).contains(&file_of(sq)) && (2..=5).contains(&rank_of(sq))
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod ordering_tests;
