//! End-to-end search behaviour through the public engine API.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::mock::StepRng;
use tempo_core::{legal_moves, move_to_notation, play_moves, Board, START_FEN};
use tempo_engine::{
    EngineConfig, Evaluator, GamePhase, PreferenceDatabase, SearchEngine, SearchLimits,
    SearchRequest, Verdict, MATE,
};

const NO_HISTORY: [&str; 0] = [];

fn engine_with_book(config: EngineConfig, book: PreferenceDatabase) -> SearchEngine<StepRng> {
    SearchEngine::with_rng(config, Arc::new(book), StepRng::new(0, 0))
}

fn engine(config: EngineConfig) -> SearchEngine<StepRng> {
    engine_with_book(config, PreferenceDatabase::empty())
}

fn board(fen: &str) -> Board {
    Board::from_fen(fen).unwrap()
}

/// Plain minimax with the engine's terminal scoring, no pruning or caching.
fn minimax(board: &mut Board, eval: &Evaluator, depth: u8, ply: i32) -> i32 {
    let moves = legal_moves(board);
    if moves.is_empty() {
        return if board.in_check(board.side_to_move) { -MATE + ply } else { 0 };
    }
    if depth == 0 {
        return eval.evaluate(board, 0);
    }
    let mut best = i32::MIN;
    for mv in moves {
        let undo = board.make_move(mv);
        let score = -minimax(board, eval, depth - 1, ply + 1);
        board.unmake_move(mv, undo);
        best = best.max(score);
    }
    best
}

fn searched(verdict: Verdict) -> (String, i32, u8) {
    match verdict {
        Verdict::Searched { best, score, depth } => (move_to_notation(best), score, depth),
        other => panic!("expected a searched move, got {other:?}"),
    }
}

#[test]
fn test_mate_in_one_at_every_depth() {
    let cases = [
        ("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1", "e1e8"),
        ("k7/8/1K6/8/8/8/8/7R w - - 0 1", "h1h8"),
        ("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4", "h5f7"),
    ];
    for (fen, mate) in cases {
        for depth in 1..=3 {
            let mut e = engine(EngineConfig::default());
            let resp = e.search(&board(fen), &NO_HISTORY, SearchLimits::depth(depth));
            let (best, score, _) = searched(resp.verdict);
            assert_eq!(best, mate, "{fen} at depth {depth}");
            assert_eq!(score, MATE - 1);
        }
    }
}

#[test]
fn test_prefers_the_faster_mate() {
    // Mate in one is available; longer mates must not outrank it.
    let fen = "k7/8/1K6/8/8/8/8/6QR w - - 0 1";
    let mut e = engine(EngineConfig::default());
    let resp = e.search(&board(fen), &NO_HISTORY, SearchLimits::depth(4));
    let (_, score, _) = searched(resp.verdict);
    assert_eq!(score, MATE - 1);
}

#[test]
fn test_alpha_beta_matches_minimax() {
    let positions = [
        "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1",
        "4k3/pp6/8/8/8/8/6PP/4K3 w - - 0 1",
        "r3k3/8/8/8/8/8/8/4K2R b - - 0 1",
    ];
    for fen in positions {
        let mut plain = EngineConfig::default();
        plain.search.use_tt = false;
        plain.search.use_quiescence = false;
        plain.search.pruning = false;
        let mut pruned = plain.clone();
        pruned.search.pruning = true;

        let reference = minimax(&mut board(fen), &Evaluator::from_config(&plain), 3, 0);

        let slow = engine(plain).search(&board(fen), &NO_HISTORY, SearchLimits::depth(3));
        let fast = engine(pruned).search(&board(fen), &NO_HISTORY, SearchLimits::depth(3));
        let (slow_move, slow_score, _) = searched(slow.verdict);
        let (fast_move, fast_score, _) = searched(fast.verdict);

        assert_eq!(slow_score, reference, "{fen}");
        assert_eq!(fast_score, reference, "{fen}");
        assert_eq!(fast_move, slow_move, "{fen}");
        assert!(fast.stats.nodes <= slow.stats.nodes);
    }
}

#[test]
fn test_transposition_table_keeps_the_score() {
    let fen = "4k3/pp6/8/8/8/8/6PP/4K3 w - - 0 1";
    let mut cached = EngineConfig::default();
    cached.search.use_quiescence = false;
    let mut uncached = cached.clone();
    uncached.search.use_tt = false;

    // Three plies are too shallow for a stored entry to stand in for a
    // deeper one, so the cache may only change speed.
    let with_tt = engine(cached.clone()).search(&board(fen), &NO_HISTORY, SearchLimits::depth(3));
    let without = engine(uncached).search(&board(fen), &NO_HISTORY, SearchLimits::depth(3));
    assert_eq!(searched(with_tt.verdict).1, searched(without.verdict).1);
    assert_eq!(without.stats.tt.size, 0);
    assert!(with_tt.stats.tt.size > 0);

    // From four plies on, move-order transpositions start to hit.
    let deeper = engine(cached).search(&board(fen), &NO_HISTORY, SearchLimits::depth(4));
    assert!(deeper.stats.tt_hits > 0);
    assert!(deeper.best_move().is_some());
}

#[test]
fn test_startpos_depth_four() {
    let mut e = engine(EngineConfig::default());
    let b = Board::startpos();
    let resp = e.search(&b, &NO_HISTORY, SearchLimits::depth(4));
    let (best, _, depth) = searched(resp.verdict);
    assert_eq!(depth, 4);
    assert!(legal_moves(&b).iter().any(|&m| move_to_notation(m) == best));
    assert!(resp.stats.qnodes > 0);
}

#[test]
fn test_tiny_budget_returns_a_legal_move() {
    let mut e = engine(EngineConfig::default());
    let b = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let resp = e.search(&b, &NO_HISTORY, SearchLimits::time(Duration::from_millis(1)));
    let mv = resp.best_move().expect("a move");
    assert!(legal_moves(&b).contains(&mv));
    assert!(resp.stats.elapsed < Duration::from_secs(1));
}

#[test]
fn test_time_budget_is_respected() {
    let budget = Duration::from_millis(200);
    let slack = Duration::from_millis(60);

    // A busy middlegame earns the largest complexity bonus, which must not
    // push a fixed budget past its limit.
    let mut e = engine(EngineConfig::default());
    let busy = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let resp = e.search(&busy, &NO_HISTORY, SearchLimits::time(budget));
    assert!(resp.best_move().is_some());
    assert!(resp.stats.elapsed < budget + slack, "{:?}", resp.stats.elapsed);

    // The quiet start position gives time back.
    let mut e = engine(EngineConfig::default());
    let resp = e.search(&Board::startpos(), &NO_HISTORY, SearchLimits::time(budget));
    assert!(resp.stats.elapsed < budget * 7 / 10 + slack, "{:?}", resp.stats.elapsed);
}

#[test]
fn test_clock_share_may_run_long_in_busy_positions() {
    let budget = Duration::from_millis(100);
    let mut e = engine(EngineConfig::default());
    let busy = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let resp = e.search(&busy, &NO_HISTORY, SearchLimits::clock_share(budget));
    assert!(resp.best_move().is_some());
    assert!(resp.stats.elapsed >= budget, "{:?}", resp.stats.elapsed);
    assert!(resp.stats.elapsed < budget * 3 / 2 + Duration::from_millis(60));
}

#[test]
fn test_start_sentinel_plays_the_book_move() {
    let mut book = PreferenceDatabase::empty();
    book.insert(GamePhase::Opening, "start", vec![("g1f3", 1.0)]);
    let mut e = engine_with_book(EngineConfig::default(), book);
    let resp = e.search(&Board::startpos(), &NO_HISTORY, SearchLimits::depth(3));
    match resp.verdict {
        Verdict::Book(mv) => assert_eq!(move_to_notation(mv), "g1f3"),
        other => panic!("expected a book move, got {other:?}"),
    }
    assert_eq!(resp.stats.nodes, 0);
}

#[test]
fn test_book_follows_the_history_window() {
    let mut book = PreferenceDatabase::empty();
    book.insert(GamePhase::Opening, "e2e4 e7e5", vec![("g1f3", 0.7), ("f1c4", 0.3)]);
    let history = ["e2e4", "e7e5"];
    let b = play_moves(&Board::startpos(), &history).unwrap();

    let mut e = engine_with_book(EngineConfig::default(), book);
    let resp = e.search(&b, &history, SearchLimits::depth(2));
    // StepRng(0, 0) always draws 0.0.
    assert_eq!(resp.verdict, Verdict::Book(tempo_core::parse_move(&b, "g1f3").unwrap()));
}

#[test]
fn test_seeded_engines_agree() {
    let json = r#"{"openings": {"start": [["e2e4", 1], ["d2d4", 1], ["c2c4", 1], ["g1f3", 1]]}}"#;
    let book = Arc::new(PreferenceDatabase::from_json_str(json).unwrap());
    let config = EngineConfig {
        seed: Some(42),
        ..EngineConfig::default()
    };
    let mut a = SearchEngine::new(config.clone(), Arc::clone(&book));
    let mut b = SearchEngine::new(config, book);
    for _ in 0..10 {
        let x = a.search(&Board::startpos(), &NO_HISTORY, SearchLimits::depth(1));
        let y = b.search(&Board::startpos(), &NO_HISTORY, SearchLimits::depth(1));
        assert!(matches!(x.verdict, Verdict::Book(_)));
        assert_eq!(x.verdict, y.verdict);
    }
}

#[test]
fn test_book_is_ignored_when_unusable() {
    let mut book = PreferenceDatabase::empty();
    // Illegal in the start position.
    book.insert(GamePhase::Opening, "start", vec![("e2e5", 1.0)]);
    let mut e = engine_with_book(EngineConfig::default(), book);
    let resp = e.search(&Board::startpos(), &NO_HISTORY, SearchLimits::depth(1));
    assert!(matches!(resp.verdict, Verdict::Searched { .. }));

    let mut book = PreferenceDatabase::empty();
    book.insert(GamePhase::Opening, "start", vec![("g1f3", 1.0)]);
    let mut config = EngineConfig::default();
    config.book.max_ply = 0;
    let mut e = engine_with_book(config, book);
    let resp = e.search(&Board::startpos(), &NO_HISTORY, SearchLimits::depth(1));
    assert!(matches!(resp.verdict, Verdict::Searched { .. }));
}

#[test]
fn test_respond_plays_from_the_request() {
    let mut e = engine(EngineConfig::default());
    let resp = e
        .respond(&SearchRequest {
            fen: START_FEN.to_string(),
            history: Vec::new(),
            budget_ms: 100,
        })
        .unwrap();
    let mv = resp.best_move().unwrap();
    assert!(legal_moves(&Board::startpos()).contains(&mv));
}

#[test]
fn test_engines_share_one_book_across_threads() {
    let mut book = PreferenceDatabase::empty();
    book.insert(GamePhase::Opening, "start", vec![("d2d4", 1.0)]);
    let book = Arc::new(book);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let book = Arc::clone(&book);
            std::thread::spawn(move || {
                let config = EngineConfig {
                    seed: Some(i),
                    ..EngineConfig::default()
                };
                let mut e = SearchEngine::new(config, book);
                e.search(&Board::startpos(), &NO_HISTORY, SearchLimits::depth(1))
                    .notation()
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap().as_deref(), Some("d2d4"));
    }
}
