//! Quiescence search: resolve captures and promotions before trusting the
//! static evaluation, so a hanging piece at the horizon is not misjudged.

use std::cmp::Reverse;

use tempo_core::{gives_check, legal_moves_into, Move};

use crate::search::{Cancelled, Searcher};

/// Ordering key for forcing moves: most valuable victim first, promotions
/// counted by the piece gained.
fn forcing_value(mv: &Move) -> i32 {
    let victim = mv.captured.map_or(0, |p| p.kind.value());
    let promo = mv.promo.map_or(0, |k| k.value());
    victim + promo
}

impl Searcher<'_> {
    /// Fail-hard quiescence from the mover's view. `qdepth` counts plies
    /// since the main search handed over.
    pub(crate) fn quiesce(
        &mut self,
        ply: usize,
        qdepth: u8,
        mut alpha: i32,
        beta: i32,
    ) -> Result<i32, Cancelled> {
        if self.deadline.is_expired() {
            return Err(Cancelled);
        }
        self.qnodes += 1;

        let mut moves = Vec::with_capacity(64);
        legal_moves_into(&mut self.board, &mut moves);
        if moves.is_empty() {
            return Ok(self.terminal_score(ply));
        }

        let stand_pat = self.evaluator.evaluate(&self.board, self.eval_ply);
        if stand_pat >= beta {
            return Ok(beta);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }
        if qdepth >= self.config.search.quiescence_max_plies {
            return Ok(alpha);
        }

        let with_checks = qdepth < self.config.search.quiescence_check_plies;
        let board = &self.board;
        moves.retain(|&mv| {
            mv.is_capture() || mv.promo.is_some() || (with_checks && gives_check(board, mv))
        });
        moves.sort_by_key(|mv| Reverse(forcing_value(mv)));

        for mv in moves {
            let score = -self.visit(mv, |s| s.quiesce(ply + 1, qdepth + 1, -beta, -alpha))?;
            if score >= beta {
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }
        Ok(alpha)
    }
}

#[cfg(test)]
#[path = "quiescence_tests.rs"]
mod quiescence_tests;
