//! Zobrist position signatures.
//!
//! The signature XORs together a fixed random key for every occupied
//! (piece, square) pair and for black-to-move, so it identifies full board
//! content plus side to move. Castling rights and the en-passant file are
//! folded in as well; two positions that differ only there reach different
//! cache slots. Collisions between distinct positions are possible and are
//! tolerated by every consumer.

use crate::board::Board;
use crate::types::{Castle, Color, Piece, file_of};

const SEED: u64 = 0x5EED_7E3B_0C4F_11A5;

const fn splitmix64(state: u64) -> (u64, u64) {
    let next = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = next;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (next, z ^ (z >> 31))
}

const fn fill<const N: usize>(mut state: u64) -> ([u64; N], u64) {
    let mut out = [0u64; N];
    let mut i = 0;
    while i < N {
        let (next, key) = splitmix64(state);
        state = next;
        out[i] = key;
        i += 1;
    }
    (out, state)
}

/// Key tables, generated at compile time from a fixed seed.
pub struct ZobristKeys {
    /// Indexed by `color * 384 + kind * 64 + square`.
    pieces: [u64; 768],
    black_to_move: u64,
    /// One per `Castle` variant.
    castling: [u64; 4],
    en_passant_file: [u64; 8],
}

impl ZobristKeys {
    const fn generate(seed: u64) -> Self {
        let (pieces, state) = fill::<768>(seed);
        let (side, state) = fill::<1>(state);
        let (castling, state) = fill::<4>(state);
        let (en_passant_file, _) = fill::<8>(state);
        Self {
            pieces,
            black_to_move: side[0],
            castling,
            en_passant_file,
        }
    }

    #[inline]
    pub fn piece(&self, piece: Piece, sq: u8) -> u64 {
        self.pieces[piece.color.idx() * 384 + piece.kind.idx() * 64 + sq as usize]
    }

    /// Every key, in table order.
    #[cfg(test)]
    fn all(&self) -> impl Iterator<Item = u64> + '_ {
        self.pieces
            .iter()
            .chain(std::iter::once(&self.black_to_move))
            .chain(self.castling.iter())
            .chain(self.en_passant_file.iter())
            .copied()
    }
}

pub static ZOBRIST: ZobristKeys = ZobristKeys::generate(SEED);

/// Signature of a board for transposition caching.
pub fn signature(board: &Board) -> u64 {
    let mut h = board
        .pieces()
        .fold(0u64, |h, (sq, pc)| h ^ ZOBRIST.piece(pc, sq));
    if board.side_to_move == Color::Black {
        h ^= ZOBRIST.black_to_move;
    }
    for castle in Castle::ALL {
        if board.castling.has(castle) {
            h ^= ZOBRIST.castling[castle.idx()];
        }
    }
    if let Some(ep) = board.en_passant {
        h ^= ZOBRIST.en_passant_file[file_of(ep) as usize];
    }
    h
}

impl Board {
    pub fn signature(&self) -> u64 {
        signature(self)
    }
}

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
