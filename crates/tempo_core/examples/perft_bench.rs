//! Perft timing harness, handy under a profiler.
//!
//! ```text
//! cargo run --release --example perft_bench -p tempo_core -- [depth] [fen]
//! cargo flamegraph --profile profiling --example perft_bench -p tempo_core -- 5
//! ```
//!
//! Without a position it times a fixed set of reference positions. With one
//! it also prints the per-move split.

use std::env;
use std::time::{Duration, Instant};

use tempo_core::{Board, START_FEN, divide, perft};

const POSITIONS: &[(&str, &str)] = &[
    ("start", START_FEN),
    ("kiwipete", "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -"),
    ("rook endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -"),
    ("promotions", "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq -"),
];

fn rate(nodes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { nodes as f64 / secs } else { 0.0 }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

fn main() {
    let mut args = env::args().skip(1);
    let depth: u8 = args.next().and_then(|s| s.parse().ok()).unwrap_or(4);

    if let Some(fen) = args.next() {
        let mut board = match Board::from_fen(&fen) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("invalid position: {e}");
                std::process::exit(1);
            }
        };
        let (split, elapsed) = timed(|| divide(&mut board, depth));
        for (mv, n) in &split {
            println!("{mv}: {n}");
        }
        let nodes: u64 = split.iter().map(|(_, n)| n).sum();
        println!("\n{nodes} nodes at depth {depth} in {elapsed:.3?} ({:.0} nps)", rate(nodes, elapsed));
        return;
    }

    let mut total = (0u64, Duration::ZERO);
    for (name, fen) in POSITIONS {
        let Ok(mut board) = Board::from_fen(fen) else {
            eprintln!("skipping {name}: invalid position");
            continue;
        };
        let (nodes, elapsed) = timed(|| perft(&mut board, depth));
        println!("{name:<14} d{depth} {nodes:>12} nodes {elapsed:>10.3?} {:>12.0} nps", rate(nodes, elapsed));
        total.0 += nodes;
        total.1 += elapsed;
    }
    println!("{:-<60}", "");
    println!("total {} nodes in {:.3?} ({:.0} nps)", total.0, total.1, rate(total.0, total.1));
}
