//! Iterative-deepening negamax with alpha-beta pruning.
//!
//! A search first tries the preference database, then deepens one ply at a
//! time until the deadline passes or the depth ceiling is reached. Every node
//! checks the deadline on entry; once it has passed the whole stack unwinds
//! through [`Cancelled`] and the unfinished iteration is discarded.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tempo_core::{gives_check, legal_moves_into, move_to_notation, Board, Deadline, Move};
use tracing::{debug, info};

use crate::book::{position_key, PreferenceDatabase};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::eval::Evaluator;
use crate::ordering::order_moves;
use crate::phase::GamePhase;
use crate::tt::{Bound, Probe, TranspositionTable, TtStats};

/// Score of being checkmated at the root. Mates further away score closer
/// to zero.
pub const MATE: i32 = 50_000;
/// Larger than any reachable score.
pub const INFINITY: i32 = 100_000;
/// Hard ceiling on iterative deepening.
pub const MAX_DEPTH: u8 = 64;

const MATE_BOUND: i32 = MATE - 1000;

/// Raised when the deadline passes mid-search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cancelled;

pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_BOUND
}

// Mate scores are stored relative to the node so they stay valid when the
// same position is reached at another ply.
fn to_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_BOUND {
        score + ply
    } else if score <= -MATE_BOUND {
        score - ply
    } else {
        score
    }
}

fn from_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_BOUND {
        score - ply
    } else if score <= -MATE_BOUND {
        score + ply
    } else {
        score
    }
}

/// When to stop searching.
///
/// The clock starts when the limits are built, so construct them right
/// before calling [`SearchEngine::search`].
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub deadline: Deadline,
    /// Fixed depth. `None` lets the engine pick one from its config and the
    /// position.
    pub max_depth: Option<u8>,
    /// The budget is a share of a game clock, so complex positions may run
    /// past it. Otherwise adaptive time can only shorten the search.
    pub stretch: bool,
}

impl SearchLimits {
    pub fn time(budget: Duration) -> Self {
        Self {
            deadline: Deadline::after(budget),
            max_depth: None,
            stretch: false,
        }
    }

    /// A share of the remaining game clock. See [`SearchLimits::stretch`].
    pub fn clock_share(budget: Duration) -> Self {
        Self {
            stretch: true,
            ..Self::time(budget)
        }
    }

    pub fn millis(ms: u64) -> Self {
        Self::time(Duration::from_millis(ms))
    }

    /// Depth only, no time limit.
    pub fn depth(depth: u8) -> Self {
        Self {
            deadline: Deadline::unbounded(),
            max_depth: Some(depth),
            stretch: false,
        }
    }

    pub fn depth_and_time(depth: u8, budget: Duration) -> Self {
        Self {
            deadline: Deadline::after(budget),
            max_depth: Some(depth),
            stretch: false,
        }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Checkmate,
    Stalemate,
}

/// How the engine arrived at its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Drawn from the preference database without searching.
    Book(Move),
    /// Result of the deepest fully completed iteration.
    Searched { best: Move, score: i32, depth: u8 },
    /// The side to move has no legal move.
    NoLegalMove(Terminal),
    /// Not even the first iteration finished. `fallback` is the first move
    /// in heuristic order, so captures and promotions come before quiet
    /// moves. The deadline is never extended to finish depth 1.
    TimedOut { fallback: Move },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub qnodes: u64,
    /// Depth of the last completed iteration.
    pub depth: u8,
    /// Table probes answered during this call.
    pub tt_hits: u64,
    /// Table probes that found nothing usable during this call.
    pub tt_misses: u64,
    /// Table counters accumulated since the last [`SearchEngine::new_game`].
    pub tt: TtStats,
    pub elapsed: Duration,
}

/// One search request in wire-friendly form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Current position.
    pub fen: String,
    /// Moves played so far, in compact notation. Used for book keys and the
    /// game phase.
    #[serde(default)]
    pub history: Vec<String>,
    pub budget_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub verdict: Verdict,
    pub stats: SearchStats,
}

impl SearchResponse {
    pub fn best_move(&self) -> Option<Move> {
        match self.verdict {
            Verdict::Book(mv) => Some(mv),
            Verdict::Searched { best, .. } => Some(best),
            Verdict::TimedOut { fallback } => Some(fallback),
            Verdict::NoLegalMove(_) => None,
        }
    }

    /// Compact notation of the chosen move, `None` when there is no legal
    /// move.
    pub fn notation(&self) -> Option<String> {
        self.best_move().map(move_to_notation)
    }
}

/// Position complexity: captures and checks available, plus a bonus for
/// crowded move lists.
pub fn complexity(board: &Board, moves: &[Move]) -> i32 {
    let captures = moves.iter().filter(|m| m.is_capture()).count() as i32;
    let checks = moves.iter().filter(|&&m| gives_check(board, m)).count() as i32;
    let crowded = if moves.len() > 35 { 2 } else { 0 };
    captures * 2 + checks * 3 + crowded
}

/// Plies to add to (or remove from) the configured depth.
pub fn depth_adjustment(complexity: i32) -> i32 {
    match complexity {
        c if c >= 15 => 2,
        c if c >= 8 => 1,
        c if c <= 3 => -1,
        _ => 0,
    }
}

fn time_factor(adjustment: i32) -> f64 {
    match adjustment {
        2 => 1.5,
        1 => 1.2,
        -1 => 0.7,
        _ => 1.0,
    }
}

/// Search state for a single `search` call.
pub(crate) struct Searcher<'a> {
    pub(crate) board: Board,
    pub(crate) tt: &'a mut TranspositionTable,
    pub(crate) evaluator: &'a Evaluator,
    pub(crate) book: &'a PreferenceDatabase,
    pub(crate) config: &'a EngineConfig,
    pub(crate) deadline: Deadline,
    /// Plies played before the root; fixes the evaluation phase.
    pub(crate) eval_ply: usize,
    /// Game history followed by the moves on the current path.
    pub(crate) line: Vec<String>,
    pub(crate) nodes: u64,
    pub(crate) qnodes: u64,
    pub(crate) root_best: Option<Move>,
}

impl Searcher<'_> {
    pub(crate) fn negamax(
        &mut self,
        depth: u8,
        ply: usize,
        mut alpha: i32,
        beta: i32,
    ) -> Result<i32, Cancelled> {
        if self.deadline.is_expired() {
            return Err(Cancelled);
        }
        self.nodes += 1;

        let use_tt = self.config.search.use_tt;
        let signature = self.board.signature();
        let mut hint = None;
        if use_tt {
            match self.tt.probe(signature, depth, to_tt(alpha, ply), to_tt(beta, ply)) {
                // The root always searches so that it has a move to report.
                Probe::Hit { score, .. } if ply > 0 => return Ok(from_tt(score, ply)),
                Probe::Hit { best_move, .. } | Probe::Hint(best_move) => hint = best_move,
                Probe::Miss => {}
            }
        }

        let mut moves = Vec::with_capacity(64);
        legal_moves_into(&mut self.board, &mut moves);
        if moves.is_empty() {
            return Ok(self.terminal_score(ply));
        }

        if depth == 0 {
            if self.config.search.use_quiescence {
                return self.quiesce(ply, 0, alpha, beta);
            }
            return Ok(self.evaluator.evaluate(&self.board, self.eval_ply));
        }

        self.order(&mut moves, hint);

        let alpha_orig = alpha;
        let mut best = -INFINITY;
        let mut best_move = None;
        for mv in moves {
            let score = -self.visit(mv, |s| s.negamax(depth - 1, ply + 1, -beta, -alpha))?;

            if score > best {
                best = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
                if ply == 0 {
                    self.root_best = Some(mv);
                }
            }
            if self.config.search.pruning && alpha >= beta {
                break;
            }
        }

        if use_tt {
            let bound = if best <= alpha_orig {
                Bound::Upper
            } else if best >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.tt.store(signature, depth, to_tt(best, ply), best_move, bound);
        }
        Ok(best)
    }

    /// Plays `mv`, runs `f` on the child position and takes the move back,
    /// whether or not `f` was cancelled.
    pub(crate) fn visit<F>(&mut self, mv: Move, f: F) -> Result<i32, Cancelled>
    where
        F: FnOnce(&mut Self) -> Result<i32, Cancelled>,
    {
        let undo = self.board.make_move(mv);
        self.line.push(move_to_notation(mv));
        let result = f(self);
        self.line.pop();
        self.board.unmake_move(mv, undo);
        result
    }

    /// Score of a node without legal moves, from the mover's view.
    pub(crate) fn terminal_score(&self, ply: usize) -> i32 {
        if self.board.in_check(self.board.side_to_move) {
            -MATE + ply as i32
        } else {
            0
        }
    }

    fn order(&self, moves: &mut [Move], hint: Option<Move>) {
        let book = &self.config.book;
        let preferred: Vec<&str> = if !self.book.is_empty() && self.line.len() < book.max_ply {
            let phase = self.evaluator.phase_of(self.line.len());
            let key = position_key(&self.line, book.windows.for_phase(phase));
            self.book
                .candidates(phase, &key)
                .iter()
                .map(|c| c.notation.as_str())
                .collect()
        } else {
            Vec::new()
        };
        order_moves(&self.board, moves, &preferred, hint, &self.config.ordering);
    }
}

/// A game-playing engine: configuration, evaluator, a transposition table
/// that persists between moves of one game, and a shared read-only book.
///
/// Each concurrent game needs its own engine; only the book may be shared.
#[derive(Debug)]
pub struct SearchEngine<R = StdRng> {
    config: EngineConfig,
    evaluator: Evaluator,
    book: Arc<PreferenceDatabase>,
    tt: TranspositionTable,
    rng: R,
}

impl SearchEngine<StdRng> {
    /// Builds an engine whose book draws come from `config.seed`, or from
    /// entropy when no seed is set.
    pub fn new(config: EngineConfig, book: Arc<PreferenceDatabase>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, book, rng)
    }
}

impl<R: Rng> SearchEngine<R> {
    pub fn with_rng(config: EngineConfig, book: Arc<PreferenceDatabase>, rng: R) -> Self {
        Self {
            evaluator: Evaluator::from_config(&config),
            tt: TranspositionTable::new(config.tt_capacity),
            config,
            book,
            rng,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn book(&self) -> &Arc<PreferenceDatabase> {
        &self.book
    }

    /// Forgets everything learned in the previous game.
    pub fn new_game(&mut self) {
        self.tt.clear();
    }

    pub fn tt_stats(&self) -> TtStats {
        self.tt.stats()
    }

    /// Answers a request within its millisecond budget.
    pub fn respond(&mut self, request: &SearchRequest) -> Result<SearchResponse, EngineError> {
        let board = Board::from_fen(&request.fen)?;
        Ok(self.search(&board, &request.history, SearchLimits::millis(request.budget_ms)))
    }

    /// Picks a move for `board`. `history` lists the moves played so far in
    /// compact notation.
    pub fn search<S: AsRef<str>>(
        &mut self,
        board: &Board,
        history: &[S],
        limits: SearchLimits,
    ) -> SearchResponse {
        let tt_before = self.tt.stats();
        let mut root = board.clone_for_lookahead();
        let mut moves = Vec::with_capacity(64);
        legal_moves_into(&mut root, &mut moves);

        if moves.is_empty() {
            let terminal = if root.in_check(root.side_to_move) {
                Terminal::Checkmate
            } else {
                Terminal::Stalemate
            };
            info!(?terminal, "no legal move");
            return SearchResponse {
                verdict: Verdict::NoLegalMove(terminal),
                stats: self.stats_since(tt_before, 0, 0, 0, limits.deadline),
            };
        }

        if let Some(mv) = self.book_move(history, &moves) {
            info!(mv = %move_to_notation(mv), ply = history.len(), "book move");
            return SearchResponse {
                verdict: Verdict::Book(mv),
                stats: self.stats_since(tt_before, 0, 0, 0, limits.deadline),
            };
        }

        let (max_depth, deadline) = self.plan(&root, history.len(), &moves, limits);
        debug!(max_depth, remaining = ?deadline.remaining(), "starting search");

        let mut searcher = Searcher {
            board: root,
            tt: &mut self.tt,
            evaluator: &self.evaluator,
            book: &self.book,
            config: &self.config,
            deadline,
            eval_ply: history.len(),
            line: history.iter().map(|s| s.as_ref().to_string()).collect(),
            nodes: 0,
            qnodes: 0,
            root_best: None,
        };

        let mut completed: Option<(Move, i32, u8)> = None;
        for depth in 1..=max_depth {
            if deadline.is_expired() {
                break;
            }
            searcher.root_best = None;
            match searcher.negamax(depth, 0, -INFINITY, INFINITY) {
                Ok(score) => {
                    if let Some(mv) = searcher.root_best {
                        completed = Some((mv, score, depth));
                    }
                    debug!(
                        depth,
                        score,
                        nodes = searcher.nodes,
                        elapsed_ms = deadline.elapsed().as_millis() as u64,
                        "iteration complete"
                    );
                    if is_mate_score(score) {
                        break;
                    }
                }
                Err(Cancelled) => {
                    debug!(depth, "iteration cancelled at deadline");
                    break;
                }
            }
        }

        let verdict = match completed {
            Some((best, score, depth)) => Verdict::Searched { best, score, depth },
            None => {
                order_moves(&searcher.board, &mut moves, &[], None, &self.config.ordering);
                Verdict::TimedOut { fallback: moves[0] }
            }
        };
        let (nodes, qnodes) = (searcher.nodes, searcher.qnodes);
        let depth = completed.map_or(0, |(_, _, d)| d);
        let stats = self.stats_since(tt_before, nodes, qnodes, depth, deadline);

        info!(
            best = ?completed.map(|(mv, _, _)| move_to_notation(mv)),
            score = completed.map(|(_, s, _)| s),
            depth,
            nodes,
            qnodes,
            tt_hits = stats.tt_hits,
            tt_hit_rate = format_args!("{:.2}", stats.tt.hit_rate()),
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "search finished"
        );

        SearchResponse { verdict, stats }
    }

    fn book_move<S: AsRef<str>>(&mut self, history: &[S], moves: &[Move]) -> Option<Move> {
        if self.book.is_empty() || history.len() >= self.config.book.max_ply {
            return None;
        }
        let phase = self.evaluator.phase_of(history.len());
        let key = position_key(history, self.config.book.windows.for_phase(phase));
        let pick = self.book.select(phase, &key, &mut self.rng)?;
        let found = moves
            .iter()
            .copied()
            .find(|&mv| move_to_notation(mv) == pick.notation);
        if found.is_none() {
            debug!(key = %key, candidate = %pick.notation, "book candidate is not legal here");
        }
        found
    }

    /// Depth ceiling and effective deadline for this position.
    fn plan(
        &self,
        board: &Board,
        plies_played: usize,
        moves: &[Move],
        limits: SearchLimits,
    ) -> (u8, Deadline) {
        let search = &self.config.search;
        let adjustment = if search.adaptive_depth || search.adaptive_time {
            depth_adjustment(complexity(board, moves))
        } else {
            0
        };

        let deadline = if search.adaptive_time {
            let factor = time_factor(adjustment);
            let factor = if limits.stretch { factor } else { factor.min(1.0) };
            limits.deadline.rescaled(factor)
        } else {
            limits.deadline
        };

        let depth = match limits.max_depth {
            Some(d) => d.clamp(1, MAX_DEPTH),
            None => {
                let mut d = i32::from(self.config.max_depth);
                if search.adaptive_depth {
                    d += adjustment;
                }
                if self.evaluator.phase_of(plies_played) == GamePhase::Endgame {
                    d += i32::from(search.endgame_extra_depth);
                }
                d.clamp(1, i32::from(MAX_DEPTH)) as u8
            }
        };
        (depth, deadline)
    }

    fn stats_since(
        &self,
        before: TtStats,
        nodes: u64,
        qnodes: u64,
        depth: u8,
        deadline: Deadline,
    ) -> SearchStats {
        let now = self.tt.stats();
        SearchStats {
            nodes,
            qnodes,
            depth,
            tt_hits: now.hits.saturating_sub(before.hits),
            tt_misses: now.misses.saturating_sub(before.misses),
            tt: now,
            elapsed: deadline.elapsed(),
        }
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
