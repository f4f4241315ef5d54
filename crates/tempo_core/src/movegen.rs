use crate::{board::Board, types::*};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];
const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// What a generation pass is for. Pawns are the only piece whose moves and
/// attacks differ: in `Attacks` mode they emit both diagonal targets
/// regardless of occupancy and no pushes.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Moves,
    Attacks,
}

/// Generate all legal moves, returning a freshly allocated vector.
/// Internally delegates to `legal_moves_into`, cloning the board only once.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mut tmp = board.clone_for_lookahead();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
///
/// A pseudo-legal move is legal exactly when, after playing it, the mover's
/// king is not attacked. No pin tables are involved.
pub fn legal_moves_into(board: &mut Board, out: &mut Vec<Move>) {
    out.clear();
    pseudo_moves(board, out);

    let mover = board.side_to_move;
    out.retain(|&mv| {
        let undo = board.make_move(mv);
        let illegal = board.in_check(mover);
        board.unmake_move(mv, undo);
        !illegal
    });
}

/// Pseudo-legal moves for the side to move, castling included.
pub fn pseudo_moves(board: &Board, out: &mut Vec<Move>) {
    let side = board.side_to_move;
    generate(board, side, Mode::Moves, out);
    gen_castles(board, side, out);
}

/// Whether any piece of `by` attacks `target`.
///
/// Answered by generating `by`'s pseudo-legal moves (castling excluded) and
/// testing whether one of them lands on `target`. A square held by one of
/// `by`'s own pieces is never reported as attacked.
pub fn is_square_attacked(board: &Board, target: u8, by: Color) -> bool {
    let mut moves = Vec::with_capacity(64);
    generate(board, by, Mode::Attacks, &mut moves);
    moves.iter().any(|m| m.to == target)
}

/// Whether playing `mv` leaves the opponent in check.
pub fn gives_check(board: &Board, mv: Move) -> bool {
    let mut tmp = board.clone_for_lookahead();
    let mover = tmp.side_to_move;
    tmp.make_move(mv);
    tmp.in_check(mover.other())
}

fn generate(board: &Board, side: Color, mode: Mode, out: &mut Vec<Move>) {
    for (sq, pc) in board.pieces() {
        if pc.color != side {
            continue;
        }
        match pc.kind {
            PieceKind::Pawn => match mode {
                Mode::Moves => gen_pawn(board, sq, side, out),
                Mode::Attacks => gen_pawn_attacks(sq, side, out),
            },
            PieceKind::Knight => gen_step(board, sq, side, &KNIGHT_DELTAS, out),
            PieceKind::Bishop => gen_slider(board, sq, side, &DIAGONALS, out),
            PieceKind::Rook => gen_slider(board, sq, side, &ORTHOGONALS, out),
            PieceKind::Queen => {
                gen_slider(board, sq, side, &DIAGONALS, out);
                gen_slider(board, sq, side, &ORTHOGONALS, out);
            }
            PieceKind::King => gen_step(board, sq, side, &KING_DELTAS, out),
        }
    }
}

fn push_pawn_move(mv: Move, promotes: bool, out: &mut Vec<Move>) {
    if promotes {
        for pk in PieceKind::PROMOTIONS {
            out.push(Move {
                promo: Some(pk),
                ..mv
            });
        }
    } else {
        out.push(mv);
    }
}

fn gen_pawn(board: &Board, from: u8, c: Color, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);
    let dir = c.forward();
    let start_rank: i8 = match c {
        Color::White => 1,
        Color::Black => 6,
    };
    let promo_rank: i8 = match c {
        Color::White => 7,
        Color::Black => 0,
    };

    // forward 1, then 2 from the start rank
    if let Some(to) = sq(f, r + dir) {
        if board.is_empty(to) {
            push_pawn_move(Move::new(from, to), rank_of(to) == promo_rank, out);
            if r == start_rank {
                if let Some(to2) = sq(f, r + 2 * dir) {
                    if board.is_empty(to2) {
                        out.push(Move::new(from, to2));
                    }
                }
            }
        }
    }

    // captures + en-passant
    for df in [-1, 1] {
        let Some(to) = sq(f + df, r + dir) else {
            continue;
        };
        match board.piece_at(to) {
            Some(target) if target.color != c => {
                push_pawn_move(
                    Move::capture(from, to, target),
                    rank_of(to) == promo_rank,
                    out,
                );
            }
            Some(_) => {}
            None if board.en_passant == Some(to) => {
                // The victim sits beside the capturing pawn, not on `to`.
                let Some(victim_sq) = sq(f + df, r) else {
                    continue;
                };
                if let Some(victim) = board.piece_at(victim_sq) {
                    if victim.color != c && victim.kind == PieceKind::Pawn {
                        out.push(Move {
                            ep_capture: Some(victim_sq),
                            ..Move::capture(from, to, victim)
                        });
                    }
                }
            }
            None => {}
        }
    }
}

fn gen_pawn_attacks(from: u8, c: Color, out: &mut Vec<Move>) {
    for df in [-1, 1] {
        if let Some(to) = sq(file_of(from) + df, rank_of(from) + c.forward()) {
            out.push(Move::new(from, to));
        }
    }
}

/// Knight and king: one hop per delta.
fn gen_step(board: &Board, from: u8, c: Color, deltas: &[(i8, i8)], out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);
    for (df, dr) in deltas {
        if let Some(to) = sq(f + df, r + dr) {
            match board.piece_at(to) {
                None => out.push(Move::new(from, to)),
                Some(pc) if pc.color != c => out.push(Move::capture(from, to, pc)),
                _ => {}
            }
        }
    }
}

fn gen_slider(board: &Board, from: u8, c: Color, dirs: &[(i8, i8)], out: &mut Vec<Move>) {
    let f0 = file_of(from);
    let r0 = rank_of(from);
    for (df, dr) in dirs {
        let mut f = f0 + df;
        let mut r = r0 + dr;
        while let Some(to) = sq(f, r) {
            match board.piece_at(to) {
                None => out.push(Move::new(from, to)),
                Some(pc) if pc.color != c => {
                    out.push(Move::capture(from, to, pc));
                    break;
                }
                _ => break,
            }
            f += df;
            r += dr;
        }
    }
}

fn gen_castles(board: &Board, c: Color, out: &mut Vec<Move>) {
    let enemy = c.other();
    for castle in Castle::ALL {
        if castle.color() != c || !board.castling.has(castle) {
            continue;
        }
        let (king_from, king_to) = castle.king_squares();
        let (rook_from, _) = castle.rook_squares();
        if board.piece_at(king_from) != Some(Piece::new(c, PieceKind::King))
            || board.piece_at(rook_from) != Some(Piece::new(c, PieceKind::Rook))
        {
            continue;
        }
        if !castle.empty_squares().iter().all(|&s| board.is_empty(s)) {
            continue;
        }
        // Can't castle out of, through, or into check.
        if castle
            .king_path()
            .iter()
            .any(|&s| is_square_attacked(board, s, enemy))
        {
            continue;
        }
        out.push(Move {
            castle: Some(castle),
            ..Move::new(king_from, king_to)
        });
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
