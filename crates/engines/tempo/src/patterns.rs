//! Structural evaluation terms: pawn structure, rook coordination, king pawn
//! shield and knight outposts. All scores are positive when White is better.

use tempo_core::{Board, Color, Piece, PieceKind, file_of, rank_of, relative_rank, sq};

const DOUBLED_PAWN: i32 = -15;
const ISOLATED_PAWN: i32 = -20;
const PASSED_PAWN_LINEAR: i32 = 10;
const PASSED_PAWN_QUADRATIC: i32 = 5;
const CONNECTED_ROOKS: i32 = 25;
const KING_SHIELD_PAWN: i32 = 10;
const KNIGHT_OUTPOST: i32 = 30;

pub fn structure(board: &Board) -> i32 {
    [Color::White, Color::Black]
        .into_iter()
        .map(|c| {
            let side =
                pawn_structure(board, c) + rooks(board, c) + king_shield(board, c) + outposts(board, c);
            c.sign() * side
        })
        .sum()
}

fn squares_of(board: &Board, color: Color, kind: PieceKind) -> Vec<u8> {
    board
        .pieces()
        .filter(|&(_, pc)| pc == Piece::new(color, kind))
        .map(|(s, _)| s)
        .collect()
}

/// Doubled, isolated and passed pawns for one side.
pub fn pawn_structure(board: &Board, color: Color) -> i32 {
    let own = squares_of(board, color, PieceKind::Pawn);
    let enemy = squares_of(board, color.other(), PieceKind::Pawn);
    let mut score = 0;

    for &p in &own {
        let file = file_of(p);

        let same_file = own.iter().filter(|&&o| o != p && file_of(o) == file).count() as i32;
        score += same_file * DOUBLED_PAWN;

        let supported = own.iter().any(|&o| (file_of(o) - file).abs() == 1);
        if !supported {
            score += ISOLATED_PAWN;
        }

        let rel = relative_rank(p, color);
        let blocked = enemy
            .iter()
            .any(|&e| (file_of(e) - file).abs() <= 1 && relative_rank(e, color) > rel);
        if !blocked {
            let adv = (rel as i32 - 1).max(0);
            score += PASSED_PAWN_LINEAR * adv + PASSED_PAWN_QUADRATIC * adv * adv;
        }
    }
    score
}

/// Rook pairs sharing a rank or file.
pub fn rooks(board: &Board, color: Color) -> i32 {
    let rooks = squares_of(board, color, PieceKind::Rook);
    let mut score = 0;
    for (i, &a) in rooks.iter().enumerate() {
        for &b in &rooks[i + 1..] {
            if rank_of(a) == rank_of(b) || file_of(a) == file_of(b) {
                score += CONNECTED_ROOKS;
            }
        }
    }
    score
}

/// Own pawns on the two ranks in front of the king, within one file.
pub fn king_shield(board: &Board, color: Color) -> i32 {
    let Some(ksq) = board.king_sq(color) else {
        return 0;
    };
    let pawn = Some(Piece::new(color, PieceKind::Pawn));
    let fwd = color.forward();
    let mut shield = 0;
    for df in -1..=1 {
        for step in 1..=2 {
            if let Some(s) = sq(file_of(ksq) + df, rank_of(ksq) + fwd * step) {
                if board.piece_at(s) == pawn {
                    shield += 1;
                }
            }
        }
    }
    shield * KING_SHIELD_PAWN
}

/// Knights on relative ranks 4-6 defended by an own pawn.
pub fn outposts(board: &Board, color: Color) -> i32 {
    let pawn = Some(Piece::new(color, PieceKind::Pawn));
    let back = -color.forward();
    squares_of(board, color, PieceKind::Knight)
        .into_iter()
        .filter(|&n| (3..=5).contains(&relative_rank(n, color)))
        .filter(|&n| {
            [-1, 1].into_iter().any(|df| {
                sq(file_of(n) + df, rank_of(n) + back).is_some_and(|s| board.piece_at(s) == pawn)
            })
        })
        .count() as i32
        * KNIGHT_OUTPOST
}

#[cfg(test)]
#[path = "patterns_tests.rs"]
mod patterns_tests;
