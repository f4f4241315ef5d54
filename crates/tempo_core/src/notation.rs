//! Compact move notation: origin square, destination square and an optional
//! promotion letter (`e2e4`, `e7e8q`). Used for ordering keys, preference
//! lookups and external reporting.

use crate::{board::Board, error::NotationError, movegen::legal_moves, types::*};

pub fn move_to_notation(mv: Move) -> String {
    let mut s = String::with_capacity(5);
    s.push_str(&sq_to_coord(mv.from));
    s.push_str(&sq_to_coord(mv.to));
    if let Some(p) = mv.promo {
        s.push(p.letter());
    }
    s
}

/// Parses a compact move string and resolves it against the legal moves of
/// `board`, so the derived fields (capture, en-passant, castle) are correct.
pub fn parse_move(board: &Board, txt: &str) -> Result<Move, NotationError> {
    let malformed = || NotationError::Malformed(txt.to_string());
    if !txt.is_ascii() || !(4..=5).contains(&txt.len()) {
        return Err(malformed());
    }
    let from = coord_to_sq(&txt[0..2]).ok_or_else(malformed)?;
    let to = coord_to_sq(&txt[2..4]).ok_or_else(malformed)?;
    let promo = match txt[4..].chars().next() {
        None => None,
        Some(c) => match PieceKind::from_letter(c) {
            Some(k) if PieceKind::PROMOTIONS.contains(&k) => Some(k),
            _ => return Err(malformed()),
        },
    };

    let wanted = Move {
        promo,
        ..Move::new(from, to)
    };
    legal_moves(board)
        .into_iter()
        .find(|m| m.same_path(&wanted))
        .ok_or_else(|| NotationError::Illegal(txt.to_string()))
}

/// Plays a sequence of compact moves on a copy of `board`. The first
/// malformed or illegal move aborts the whole sequence.
pub fn play_moves<S: AsRef<str>>(board: &Board, moves: &[S]) -> Result<Board, NotationError> {
    let mut b = board.clone_for_lookahead();
    for txt in moves {
        let mv = parse_move(&b, txt.as_ref())?;
        b.make_move(mv);
    }
    Ok(b)
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
