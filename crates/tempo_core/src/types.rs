#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
    /// +1 for White, -1 for Black. Used to sign side-independent scores.
    pub fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
    /// Rank a pawn of this color moves towards, per step.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion targets in generation order.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    pub fn idx(self) -> usize {
        self as usize
    }

    /// Lowercase letter used in position descriptions and promotion suffixes.
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Material value in centipawns. The king carries a large sentinel value
    /// so that king captures dominate any ordering that uses it.
    pub fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 20_000,
        }
    }
}

/// One of the 12 piece codes (6 kinds x 2 sides).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    pub fn to_char(self) -> char {
        let c = self.kind.letter();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_letter(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { color, kind })
    }
}

/// Identifies which king/rook pair a castle move relocates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Castle {
    WhiteKingside,
    WhiteQueenside,
    BlackKingside,
    BlackQueenside,
}

impl Castle {
    pub const ALL: [Castle; 4] = [
        Castle::WhiteKingside,
        Castle::WhiteQueenside,
        Castle::BlackKingside,
        Castle::BlackQueenside,
    ];

    pub fn idx(self) -> usize {
        self as usize
    }

    pub fn color(self) -> Color {
        match self {
            Castle::WhiteKingside | Castle::WhiteQueenside => Color::White,
            Castle::BlackKingside | Castle::BlackQueenside => Color::Black,
        }
    }

    /// (king_from, king_to)
    pub fn king_squares(self) -> (u8, u8) {
        match self {
            Castle::WhiteKingside => (4, 6),
            Castle::WhiteQueenside => (4, 2),
            Castle::BlackKingside => (60, 62),
            Castle::BlackQueenside => (60, 58),
        }
    }

    /// (rook_from, rook_to)
    pub fn rook_squares(self) -> (u8, u8) {
        match self {
            Castle::WhiteKingside => (7, 5),
            Castle::WhiteQueenside => (0, 3),
            Castle::BlackKingside => (63, 61),
            Castle::BlackQueenside => (56, 59),
        }
    }

    /// Squares strictly between king and rook that must be empty.
    pub fn empty_squares(self) -> &'static [u8] {
        match self {
            Castle::WhiteKingside => &[5, 6],
            Castle::WhiteQueenside => &[1, 2, 3],
            Castle::BlackKingside => &[61, 62],
            Castle::BlackQueenside => &[57, 58, 59],
        }
    }

    /// Squares the king stands on or crosses; none may be attacked.
    pub fn king_path(self) -> [u8; 3] {
        match self {
            Castle::WhiteKingside => [4, 5, 6],
            Castle::WhiteQueenside => [4, 3, 2],
            Castle::BlackKingside => [60, 61, 62],
            Castle::BlackQueenside => [60, 59, 58],
        }
    }
}

/// A move as produced by the generator. Carries enough context (captured
/// piece, en-passant victim square, castle tag) to apply it without
/// re-deriving anything from the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: u8, // 0..63
    pub to: u8,   // 0..63
    pub promo: Option<PieceKind>,
    pub captured: Option<Piece>,
    /// Square of the pawn removed by an en-passant capture.
    pub ep_capture: Option<u8>,
    pub castle: Option<Castle>,
}

impl Move {
    pub fn new(from: u8, to: u8) -> Self {
        Self {
            from,
            to,
            promo: None,
            captured: None,
            ep_capture: None,
            castle: None,
        }
    }

    pub fn capture(from: u8, to: u8, captured: Piece) -> Self {
        Self {
            captured: Some(captured),
            ..Self::new(from, to)
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn is_en_passant(&self) -> bool {
        self.ep_capture.is_some()
    }

    pub fn is_castle(&self) -> bool {
        self.castle.is_some()
    }

    /// Same origin, destination and promotion. Ignores the derived context
    /// fields so that a parsed move can be matched against generated ones.
    pub fn same_path(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to && self.promo == other.promo
    }
}

// Helpers
pub fn file_of(sq: u8) -> i8 {
    (sq % 8) as i8
}
pub fn rank_of(sq: u8) -> i8 {
    (sq / 8) as i8
}
pub fn sq(file: i8, rank: i8) -> Option<u8> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some((rank as u8) * 8 + (file as u8))
    } else {
        None
    }
}

/// Rank as seen from `color`'s side of the board (0 = own back rank).
pub fn relative_rank(sq: u8, color: Color) -> i8 {
    match color {
        Color::White => rank_of(sq),
        Color::Black => 7 - rank_of(sq),
    }
}

/// Manhattan distance between two squares.
pub fn manhattan(a: u8, b: u8) -> i32 {
    ((file_of(a) - file_of(b)).abs() + (rank_of(a) - rank_of(b)).abs()) as i32
}

pub fn sq_to_coord(sq: u8) -> String {
    let f = (b'a' + (sq % 8)) as char;
    let r = (b'1' + (sq / 8)) as char;
    format!("{f}{r}")
}

pub fn coord_to_sq(c: &str) -> Option<u8> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let f = b[0];
    let r = b[1];
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return None;
    }
    let file = f - b'a';
    let rank = r - b'1';
    Some(rank * 8 + file)
}
