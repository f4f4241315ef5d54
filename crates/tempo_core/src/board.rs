use crate::error::FenError;
use crate::movegen::is_square_attacked;
use crate::types::*;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Four independent castling flags. Flags are only ever cleared while a game
/// is played forward; `unmake_move` restores the saved copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastlingRights {
    pub wk: bool,
    pub wq: bool,
    pub bk: bool,
    pub bq: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        wk: true,
        wq: true,
        bk: true,
        bq: true,
    };
    pub const NONE: CastlingRights = CastlingRights {
        wk: false,
        wq: false,
        bk: false,
        bq: false,
    };

    pub fn has(&self, castle: Castle) -> bool {
        match castle {
            Castle::WhiteKingside => self.wk,
            Castle::WhiteQueenside => self.wq,
            Castle::BlackKingside => self.bk,
            Castle::BlackQueenside => self.bq,
        }
    }

    fn clear_color(&mut self, color: Color) {
        match color {
            Color::White => {
                self.wk = false;
                self.wq = false;
            }
            Color::Black => {
                self.bk = false;
                self.bq = false;
            }
        }
    }

    /// Clears the right tied to a rook home square, if `sq` is one.
    fn touch_square(&mut self, sq: u8) {
        match sq {
            0 => self.wq = false,
            7 => self.wk = false,
            56 => self.bq = false,
            63 => self.bk = false,
            _ => {}
        }
    }
}

/// Full position state: 64-cell mailbox plus the side-to-move, castling,
/// en-passant and clock fields of a position description, and cached king
/// squares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub squares: [Option<Piece>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>, // square behind a pawn that just advanced 2
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    kings: [Option<u8>; 2],
}

/// Everything `make_move` overwrites that cannot be recovered from the move.
#[derive(Clone, Debug)]
pub struct Undo {
    pub castling: CastlingRights,
    pub en_passant: Option<u8>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub moved_piece: Piece,
}

impl Board {
    pub fn startpos() -> Self {
        let mut b = Board::empty();
        b.castling = CastlingRights::ALL;

        // Pawns
        for f in 0..8 {
            b.set_piece(8 + f, Some(Piece::new(Color::White, PieceKind::Pawn)));
            b.set_piece(48 + f, Some(Piece::new(Color::Black, PieceKind::Pawn)));
        }
        // Back ranks
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            b.set_piece(f as u8, Some(Piece::new(Color::White, kind)));
            b.set_piece(56 + f as u8, Some(Piece::new(Color::Black, kind)));
        }
        b
    }

    fn empty() -> Self {
        Board {
            squares: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            kings: [None; 2],
        }
    }

    /// Parses a Forsyth-Edwards position description. The board is built
    /// from scratch and only returned once every field has been validated.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::FieldCount(parts.len()));
        }

        let mut b = Board::empty();

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank: i8 = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
            let mut file: usize = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    if d == 0 || d > 8 {
                        return Err(FenError::PieceChar(ch));
                    }
                    file += d as usize;
                } else {
                    let pc = Piece::from_char(ch).ok_or(FenError::PieceChar(ch))?;
                    let s = sq(file as i8, rank).ok_or(FenError::FileCount {
                        rank: rank as usize + 1,
                        files: file + 1,
                    })?;
                    b.set_piece(s, Some(pc));
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::FileCount {
                        rank: rank as usize + 1,
                        files: file,
                    });
                }
            }
            if file != 8 {
                return Err(FenError::FileCount {
                    rank: rank as usize + 1,
                    files: file,
                });
            }
        }

        b.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => b.castling.wk = true,
                    'Q' => b.castling.wq = true,
                    'k' => b.castling.bk = true,
                    'q' => b.castling.bq = true,
                    _ => return Err(FenError::CastlingChar(c)),
                }
            }
        }

        b.en_passant = match parts[3] {
            "-" => None,
            coord => match coord_to_sq(coord) {
                Some(s) if rank_of(s) == 2 || rank_of(s) == 5 => Some(s),
                _ => return Err(FenError::EnPassant(coord.to_string())),
            },
        };

        if let Some(hm) = parts.get(4) {
            b.halfmove_clock = hm
                .parse()
                .map_err(|_| FenError::Counter(hm.to_string()))?;
        }
        if let Some(fm) = parts.get(5) {
            b.fullmove_number = fm
                .parse()
                .map_err(|_| FenError::Counter(fm.to_string()))?;
        }

        for color in [Color::White, Color::Black] {
            let count = b
                .squares
                .iter()
                .flatten()
                .filter(|pc| pc.color == color && pc.kind == PieceKind::King)
                .count();
            if count != 1 {
                return Err(FenError::KingCount { color, count });
            }
        }

        Ok(b)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.squares[rank * 8 + file] {
                    Some(pc) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(pc.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        let before = out.len();
        for (flag, c) in [
            (self.castling.wk, 'K'),
            (self.castling.wq, 'Q'),
            (self.castling.bk, 'k'),
            (self.castling.bq, 'q'),
        ] {
            if flag {
                out.push(c);
            }
        }
        if out.len() == before {
            out.push('-');
        }

        out.push(' ');
        match self.en_passant {
            Some(s) => out.push_str(&sq_to_coord(s)),
            None => out.push('-'),
        }
        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }

    /// Independent copy for exploring a branch without aliasing this board.
    pub fn clone_for_lookahead(&self) -> Board {
        self.clone()
    }

    pub fn king_sq(&self, c: Color) -> Option<u8> {
        self.kings[c.idx()]
    }

    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.squares[sq as usize]
    }

    pub fn is_empty(&self, sq: u8) -> bool {
        self.squares[sq as usize].is_none()
    }

    pub fn set_piece(&mut self, sq: u8, pc: Option<Piece>) {
        if let Some(old) = self.squares[sq as usize] {
            if old.kind == PieceKind::King && self.kings[old.color.idx()] == Some(sq) {
                self.kings[old.color.idx()] = None;
            }
        }
        if let Some(p) = pc {
            if p.kind == PieceKind::King {
                self.kings[p.color.idx()] = Some(sq);
            }
        }
        self.squares[sq as usize] = pc;
    }

    /// Occupied squares with their pieces, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (u8, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(i, pc)| pc.map(|p| (i as u8, p)))
    }

    pub fn in_check(&self, c: Color) -> bool {
        match self.king_sq(c) {
            Some(ksq) => is_square_attacked(self, ksq, c.other()),
            None => false,
        }
    }

    /// Applies a generator-produced move in place. No legality checking is
    /// done here; the returned `Undo` restores the board exactly.
    ///
    /// Panics if `mv.from` is empty, which only happens for moves that were
    /// not generated for this board.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let from = mv.from;
        let to = mv.to;
        let moved = self.piece_at(from).expect("no piece on from-square");
        let undo = Undo {
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            moved_piece: moved,
        };

        if let Some(cs) = mv.ep_capture {
            self.set_piece(cs, None);
        }

        self.set_piece(from, None);
        let placed = match mv.promo {
            Some(kind) => Piece::new(moved.color, kind),
            None => moved,
        };
        self.set_piece(to, Some(placed));

        if let Some(castle) = mv.castle {
            let (rf, rt) = castle.rook_squares();
            let rook = self.piece_at(rf);
            self.set_piece(rf, None);
            self.set_piece(rt, rook);
        }

        if moved.kind == PieceKind::King {
            self.castling.clear_color(moved.color);
        }
        self.castling.touch_square(from);
        self.castling.touch_square(to);

        self.en_passant = None;
        if moved.kind == PieceKind::Pawn && (rank_of(from) - rank_of(to)).abs() == 2 {
            self.en_passant = sq(file_of(from), (rank_of(from) + rank_of(to)) / 2);
        }

        self.halfmove_clock = if moved.kind == PieceKind::Pawn || mv.is_capture() {
            0
        } else {
            self.halfmove_clock + 1
        };
        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.other();

        undo
    }

    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        self.side_to_move = self.side_to_move.other();
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        if let Some(castle) = mv.castle {
            let (rf, rt) = castle.rook_squares();
            let rook = self.piece_at(rt);
            self.set_piece(rt, None);
            self.set_piece(rf, rook);
        }

        self.set_piece(mv.to, None);
        self.set_piece(mv.from, Some(undo.moved_piece));

        match mv.ep_capture {
            Some(cs) => self.set_piece(cs, mv.captured),
            None => self.set_piece(mv.to, mv.captured),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
