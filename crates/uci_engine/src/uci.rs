//! UCI command handling.
//!
//! The search runs synchronously inside `go`, so `stop` and `ponderhit` have
//! nothing to interrupt and are ignored along with other unknown commands.

use std::io::Write;
use std::slice::Iter;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tempo_core::{parse_move, Board, Color, Deadline};
use tempo_engine::{is_mate_score, SearchEngine, SearchLimits, Verdict, MATE};
use tracing::{debug, warn};

/// Moves assumed left in the game when the GUI does not say.
const DEFAULT_MOVES_TO_GO: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    engine: SearchEngine,
    board: Board,
    /// Moves played since the start position, in compact notation.
    history: Vec<String>,
}

impl Session {
    pub fn new(engine: SearchEngine) -> Self {
        Self {
            engine,
            board: Board::startpos(),
            history: Vec::new(),
        }
    }

    /// Handles one input line, writing any replies to `out`.
    pub fn handle<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            return Ok(Flow::Continue);
        };

        match command {
            "uci" => {
                writeln!(out, "id name Tempo {}", env!("CARGO_PKG_VERSION"))?;
                writeln!(out, "id author tempo")?;
                writeln!(out, "uciok")?;
            }
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => {
                self.engine.new_game();
                self.board = Board::startpos();
                self.history.clear();
            }
            "position" => {
                if let Err(e) = self.set_position(args) {
                    warn!(error = %e, "position command rejected, keeping the previous position");
                }
            }
            "go" => self.go(args, out)?,
            "quit" => return Ok(Flow::Quit),
            other => debug!(command = other, "ignoring command"),
        }
        out.flush()?;
        Ok(Flow::Continue)
    }

    /// `position startpos|fen <fields> [moves ...]`. Nothing changes unless
    /// the whole command is valid.
    fn set_position(&mut self, args: &[&str]) -> Result<()> {
        let (setup, moves) = match args.iter().position(|&a| a == "moves") {
            Some(i) => (&args[..i], &args[i + 1..]),
            None => (args, &[][..]),
        };

        let mut board = match setup.split_first() {
            Some((&"startpos", _)) => Board::startpos(),
            Some((&"fen", fields)) => Board::from_fen(&fields.join(" "))?,
            _ => bail!("expected `startpos` or `fen`"),
        };

        let mut history = Vec::with_capacity(moves.len());
        for &txt in moves {
            let mv = parse_move(&board, txt).with_context(|| format!("after {} moves", history.len()))?;
            board.make_move(mv);
            history.push(txt.to_string());
        }

        self.board = board;
        self.history = history;
        Ok(())
    }

    fn go<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        let params = GoParams::parse(args);
        let limits = params.limits(
            self.board.side_to_move,
            self.engine.config().default_movetime_ms,
        );
        let response = self.engine.search(&self.board, &self.history, limits);

        if let Verdict::Searched { score, depth, .. } = response.verdict {
            let stats = &response.stats;
            writeln!(
                out,
                "info depth {} score {} nodes {} time {}",
                depth,
                format_score(score),
                stats.nodes + stats.qnodes,
                stats.elapsed.as_millis()
            )?;
        }
        match response.notation() {
            Some(mv) => writeln!(out, "bestmove {mv}")?,
            None => writeln!(out, "bestmove 0000")?,
        }
        Ok(())
    }
}

/// Arguments of a `go` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub movetime: Option<u64>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u64>,
    pub depth: Option<u8>,
    pub infinite: bool,
}

impl GoParams {
    pub fn parse(args: &[&str]) -> Self {
        fn value<T: FromStr>(it: &mut Iter<'_, &str>) -> Option<T> {
            it.next().and_then(|s| s.parse().ok())
        }

        let mut params = Self::default();
        let mut it = args.iter();
        while let Some(&token) = it.next() {
            match token {
                "movetime" => params.movetime = value(&mut it),
                "wtime" => params.wtime = value(&mut it),
                "btime" => params.btime = value(&mut it),
                "winc" => params.winc = value(&mut it),
                "binc" => params.binc = value(&mut it),
                "movestogo" => params.movestogo = value(&mut it),
                "depth" => params.depth = value(&mut it),
                "infinite" => params.infinite = true,
                _ => {}
            }
        }
        params
    }

    /// Milliseconds to spend on this move, `None` for no time limit.
    ///
    /// `stop` is not supported, so `go infinite` without a depth falls back
    /// to `default_ms` instead of searching forever.
    pub fn budget_ms(&self, side: Color, default_ms: u64) -> Option<u64> {
        if self.infinite {
            return if self.depth.is_some() { None } else { Some(default_ms) };
        }
        if let Some(ms) = self.movetime {
            return Some(ms);
        }
        let (clock, inc) = self.clock(side);
        if let Some(remaining) = clock {
            let moves_to_go = self.movestogo.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);
            let share = remaining / moves_to_go + inc.unwrap_or(0) * 3 / 4;
            return Some(share.min(remaining / 2).max(1));
        }
        if self.depth.is_some() {
            None
        } else {
            Some(default_ms)
        }
    }

    fn clock(&self, side: Color) -> (Option<u64>, Option<u64>) {
        match side {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        }
    }

    /// Only a budget carved out of a running clock may be stretched;
    /// `movetime` and the fallbacks are hard limits.
    pub fn limits(&self, side: Color, default_ms: u64) -> SearchLimits {
        let from_clock = !self.infinite && self.movetime.is_none() && self.clock(side).0.is_some();
        SearchLimits {
            deadline: self
                .budget_ms(side, default_ms)
                .map_or_else(Deadline::unbounded, Deadline::after_millis),
            max_depth: self.depth,
            stretch: from_clock,
        }
    }
}

/// UCI score field: `cp <n>` or `mate <moves>` (negative when being mated).
pub fn format_score(score: i32) -> String {
    if is_mate_score(score) {
        let plies = MATE - score.abs();
        let moves = (plies + 1) / 2;
        if score > 0 {
            format!("mate {moves}")
        } else {
            format!("mate -{moves}")
        }
    } else {
        format!("cp {score}")
    }
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
