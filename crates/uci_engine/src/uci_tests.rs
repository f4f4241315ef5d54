use super::*;
use std::sync::Arc;
use std::time::Duration;

use tempo_core::{legal_moves, move_to_notation, play_moves};
use tempo_engine::{EngineConfig, PreferenceDatabase};

fn session() -> Session {
    let config = EngineConfig {
        seed: Some(1),
        ..EngineConfig::default()
    };
    Session::new(SearchEngine::new(config, Arc::new(PreferenceDatabase::empty())))
}

fn send(session: &mut Session, line: &str) -> (Flow, String) {
    let mut out = Vec::new();
    let flow = session.handle(line, &mut out).unwrap();
    (flow, String::from_utf8(out).unwrap())
}

#[test]
fn test_handshake() {
    let mut s = session();
    let (flow, out) = send(&mut s, "uci");
    assert_eq!(flow, Flow::Continue);
    assert!(out.starts_with("id name Tempo"));
    assert!(out.ends_with("uciok\n"));
    assert_eq!(send(&mut s, "isready").1, "readyok\n");
}

#[test]
fn test_blank_and_unknown_lines_are_ignored() {
    let mut s = session();
    assert_eq!(send(&mut s, ""), (Flow::Continue, String::new()));
    assert_eq!(send(&mut s, "   "), (Flow::Continue, String::new()));
    assert_eq!(send(&mut s, "setoption name Hash value 16"), (Flow::Continue, String::new()));
}

#[test]
fn test_quit() {
    let mut s = session();
    assert_eq!(send(&mut s, "quit").0, Flow::Quit);
}

#[test]
fn test_position_startpos_with_moves() {
    let mut s = session();
    send(&mut s, "position startpos moves e2e4 e7e5 g1f3");
    let expected = play_moves(&Board::startpos(), &["e2e4", "e7e5", "g1f3"]).unwrap();
    assert_eq!(s.board, expected);
    assert_eq!(s.history, vec!["e2e4", "e7e5", "g1f3"]);
}

#[test]
fn test_position_fen() {
    let mut s = session();
    let fen = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1";
    send(&mut s, &format!("position fen {fen} moves e2e4"));
    assert_eq!(s.board.to_fen(), "4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1");
    assert_eq!(s.history, vec!["e2e4"]);
}

#[test]
fn test_bad_position_keeps_the_previous_one() {
    let mut s = session();
    send(&mut s, "position startpos moves d2d4");
    let before = s.board.clone();

    send(&mut s, "position startpos moves e2e4 e2e4");
    assert_eq!(s.board, before);
    send(&mut s, "position fen not/a/fen w - -");
    assert_eq!(s.board, before);
    send(&mut s, "position somewhere");
    assert_eq!(s.board, before);
    assert_eq!(s.history, vec!["d2d4"]);
}

#[test]
fn test_go_depth_prints_a_legal_bestmove() {
    let mut s = session();
    send(&mut s, "position startpos moves e2e4");
    let (_, out) = send(&mut s, "go depth 2");
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("info depth 2 score cp "), "{out}");
    let best = lines[1].strip_prefix("bestmove ").unwrap();
    let legal: Vec<String> = legal_moves(&s.board).into_iter().map(move_to_notation).collect();
    assert!(legal.iter().any(|m| m == best), "{best} is not legal");
}

#[test]
fn test_go_reports_mate() {
    let mut s = session();
    send(&mut s, "position fen 6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1");
    let (_, out) = send(&mut s, "go depth 3");
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("info depth 1 score mate 1 nodes "), "{out}");
    assert_eq!(lines[1], "bestmove e1e8");
}

#[test]
fn test_go_without_moves_prints_null_move() {
    let mut s = session();
    send(&mut s, "position fen 7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert_eq!(send(&mut s, "go depth 2").1, "bestmove 0000\n");
}

#[test]
fn test_ucinewgame_resets() {
    let mut s = session();
    send(&mut s, "position startpos moves e2e4");
    send(&mut s, "go depth 2");
    assert!(s.engine.tt_stats().size > 0);
    send(&mut s, "ucinewgame");
    assert_eq!(s.board, Board::startpos());
    assert!(s.history.is_empty());
    assert_eq!(s.engine.tt_stats().size, 0);
}

#[test]
fn test_go_params_parse() {
    let p = GoParams::parse(&["wtime", "30000", "btime", "20000", "winc", "300", "movestogo", "20", "depth", "6", "bogus"]);
    assert_eq!(
        p,
        GoParams {
            wtime: Some(30_000),
            btime: Some(20_000),
            winc: Some(300),
            movestogo: Some(20),
            depth: Some(6),
            ..GoParams::default()
        }
    );
    assert_eq!(GoParams::parse(&["movetime", "abc"]).movetime, None);
    assert!(GoParams::parse(&["infinite"]).infinite);
}

#[test]
fn test_budget_from_clock() {
    let p = GoParams::parse(&["wtime", "30000", "btime", "6000", "winc", "400", "binc", "0"]);
    assert_eq!(p.budget_ms(Color::White, 2000), Some(30_000 / 30 + 300));
    assert_eq!(p.budget_ms(Color::Black, 2000), Some(200));

    let low = GoParams::parse(&["wtime", "100", "winc", "1000"]);
    assert_eq!(low.budget_ms(Color::White, 2000), Some(50));

    assert_eq!(GoParams::parse(&["movetime", "750"]).budget_ms(Color::Black, 2000), Some(750));
    assert_eq!(GoParams::parse(&["depth", "4"]).budget_ms(Color::White, 2000), None);
    assert_eq!(GoParams::parse(&[]).budget_ms(Color::White, 2000), Some(2000));
}

#[test]
fn test_infinite_is_bounded_without_stop() {
    assert_eq!(GoParams::parse(&["infinite"]).budget_ms(Color::White, 2000), Some(2000));
    assert_eq!(
        GoParams::parse(&["infinite", "depth", "5"]).budget_ms(Color::White, 2000),
        None
    );
    assert!(!GoParams::parse(&["infinite", "wtime", "60000"]).limits(Color::White, 2000).stretch);
}

#[test]
fn test_only_clock_budgets_stretch() {
    let clock = GoParams::parse(&["wtime", "60000", "btime", "60000"]);
    assert!(clock.limits(Color::White, 2000).stretch);
    assert!(clock.limits(Color::Black, 2000).stretch);
    assert!(!GoParams::parse(&["btime", "60000"]).limits(Color::White, 2000).stretch);
    assert!(!GoParams::parse(&["movetime", "200", "wtime", "60000"]).limits(Color::White, 2000).stretch);
    assert!(!GoParams::parse(&[]).limits(Color::White, 2000).stretch);
}

#[test]
fn test_movetime_is_a_hard_limit() {
    let mut s = session();
    send(
        &mut s,
        "position fen r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    );
    let start = std::time::Instant::now();
    let (_, out) = send(&mut s, "go movetime 200");
    let took = start.elapsed();
    assert!(out.lines().last().unwrap().starts_with("bestmove "), "{out}");
    assert!(took < Duration::from_millis(260), "took {took:?}: {out}");
}

#[test]
fn test_limits_carry_depth_and_deadline() {
    let limits = GoParams::parse(&["movetime", "500", "depth", "3"]).limits(Color::White, 2000);
    assert_eq!(limits.max_depth, Some(3));
    assert!(limits.deadline.remaining().unwrap() <= Duration::from_millis(500));
    assert_eq!(GoParams::parse(&["depth", "3"]).limits(Color::White, 2000).deadline.remaining(), None);
}

#[test]
fn test_format_score() {
    assert_eq!(format_score(35), "cp 35");
    assert_eq!(format_score(-120), "cp -120");
    assert_eq!(format_score(MATE - 1), "mate 1");
    assert_eq!(format_score(MATE - 3), "mate 2");
    assert_eq!(format_score(-MATE + 2), "mate -1");
    assert_eq!(format_score(-MATE + 4), "mate -2");
}
