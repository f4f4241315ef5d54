use super::*;
use tempo_core::{sq_to_coord, coord_to_sq};

/// Colour-flipped copy of a position: ranks reversed, piece colours and the
/// side to move swapped.
fn mirror(fen: &str) -> String {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    let placement: Vec<String> = parts[0]
        .split('/')
        .rev()
        .map(|rank| rank.chars().map(swap_case).collect())
        .collect();
    let side = if parts[1] == "w" { "b" } else { "w" };
    let castling: String = if parts[2] == "-" {
        "-".into()
    } else {
        let swapped: String = parts[2].chars().map(swap_case).collect();
        let mut order: Vec<char> = swapped.chars().collect();
        order.sort_by_key(|c| "KQkq".find(*c));
        order.into_iter().collect()
    };
    let ep = match coord_to_sq(parts[3]) {
        Some(s) => sq_to_coord(s ^ 56),
        None => "-".into(),
    };
    format!("{} {} {} {} 0 1", placement.join("/"), side, castling, ep)
}

fn swap_case(c: char) -> char {
    if c.is_ascii_uppercase() {
        c.to_ascii_lowercase()
    } else {
        c.to_ascii_uppercase()
    }
}

fn eval(fen: &str, ply: usize) -> i32 {
    Evaluator::default().evaluate(&Board::from_fen(fen).unwrap(), ply)
}

#[test]
fn test_startpos_is_mobility_only() {
    // Everything static cancels; 20 moves at the opening weight remain.
    assert_eq!(eval(tempo_core::START_FEN, 0), 20 * 18);
}

#[test]
fn test_mobility_counts_only_legal_moves() {
    // The e2 rook is pinned: six moves along the file plus four king steps.
    let b = Board::from_fen("4r1k1/8/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
    let e = Evaluator::default();
    let phase = e.phase_of(0);
    let mobility = e.evaluate(&b, 0) - e.side_independent(&b, phase);
    assert_eq!(mobility, 10 * 18);
}

#[test]
fn test_mirrored_positions_score_the_same() {
    for fen in [
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
    ] {
        for ply in [0, 20, 60] {
            assert_eq!(eval(fen, ply), eval(&mirror(fen), ply), "{fen} at ply {ply}");
        }
    }
}

#[test]
fn test_score_is_from_the_movers_view() {
    let white = eval("4k3/8/8/8/8/8/8/3QK3 w - - 0 1", 30);
    let black = eval("4k3/8/8/8/8/8/8/3QK3 b - - 0 1", 30);
    assert!(white > 800);
    assert!(black < -800);
}

#[test]
fn test_deterministic() {
    let b = Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
        .unwrap();
    let e = Evaluator::default();
    assert_eq!(e.evaluate(&b, 12), e.evaluate(&b, 12));
}

#[test]
fn test_phase_changes_weights() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    assert_ne!(eval(fen, 0), eval(fen, 30));
    assert_ne!(eval(fen, 30), eval(fen, 60));
}

#[test]
fn test_phase_scale_applies_to_tables() {
    let e = Evaluator::default();
    assert_eq!(e.phase_of(10), GamePhase::Opening);
    // Knight on f3 is worth more in the opening than in the endgame.
    let knight = piece_square(PieceKind::Knight, Color::White, coord_to_sq("f3").unwrap());
    assert_eq!(knight, 10);
    assert_eq!(knight * phase_scale(GamePhase::Opening, PieceKind::Knight) / 100, 14);
    assert_eq!(knight * phase_scale(GamePhase::Endgame, PieceKind::Knight) / 100, 10);
}

#[test]
fn test_tables_are_mirrored_for_black() {
    for kind in PieceKind::ALL {
        for s in 0..64u8 {
            assert_eq!(
                piece_square(kind, Color::White, s),
                piece_square(kind, Color::Black, s ^ 56)
            );
        }
    }
}

#[test]
fn test_center_bonus() {
    assert_eq!(center_bonus(coord_to_sq("d4").unwrap()), 30);
    assert_eq!(center_bonus(coord_to_sq("c6").unwrap()), 10);
    assert_eq!(center_bonus(coord_to_sq("b4").unwrap()), 0);
}

#[test]
fn test_pattern_terms_toggle() {
    let b = Board::from_fen("4k3/8/8/8/8/4P3/4P3/4K3 w - - 0 1").unwrap();
    let with = Evaluator::new(PhaseConfig::default(), EvalConfig { pattern_terms: true });
    let without = Evaluator::new(PhaseConfig::default(), EvalConfig { pattern_terms: false });
    assert_eq!(
        with.evaluate(&b, 0) - without.evaluate(&b, 0),
        patterns::structure(&b)
    );
}
