use crate::{board::Board, movegen::legal_moves_into, types::Move};

/// Pure perft node count.
/// Counts all legal positions from the current one down to `depth`.
pub fn perft(board: &mut Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    fn inner(board: &mut Board, depth: u8, layers: &mut [Vec<Move>]) -> u64 {
        if depth == 0 {
            return 1;
        }

        let Some((buf, rest)) = layers.split_first_mut() else {
            return 0;
        };

        legal_moves_into(board, buf);
        if depth == 1 {
            return buf.len() as u64;
        }

        let mut nodes = 0u64;
        for mv in buf.iter().copied() {
            let undo = board.make_move(mv);
            nodes += inner(board, depth - 1, rest);
            board.unmake_move(mv, undo);
        }
        nodes
    }

    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    inner(board, depth, &mut layers[..])
}

/// Per-root-move node counts, sorted by move notation.
pub fn divide(board: &mut Board, depth: u8) -> Vec<(String, u64)> {
    let mut moves = Vec::with_capacity(64);
    legal_moves_into(board, &mut moves);
    let mut out: Vec<(String, u64)> = moves
        .into_iter()
        .map(|mv| {
            let undo = board.make_move(mv);
            let n = perft(board, depth.saturating_sub(1));
            board.unmake_move(mv, undo);
            (crate::notation::move_to_notation(mv), n)
        })
        .collect();
    out.sort();
    out
}
