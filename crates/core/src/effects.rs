//! Effects - color-bomb targeting and swap enumeration
//!
//! These are the board queries the engine needs for moves that do not come
//! from a player picking two cells: which candy a color-bomb wipes, which
//! swaps an automatic move may pick from, and which swaps would match (for
//! hints and for the automatic-move fallback).

use crate::board::Board;
use crate::matcher::run_through;
use crate::types::{Candy, Pos};

/// Most common candy on the board.
///
/// Ties go to the candy whose first occurrence comes earliest in row-major
/// order. None only for an all-empty board.
pub fn most_frequent_candy(board: &Board) -> Option<Candy> {
    // (count, first index) per palette slot
    let mut stats = [(0usize, usize::MAX); Candy::ALL.len()];
    for (idx, cell) in board.cells().iter().enumerate() {
        if let Some(candy) = cell {
            let entry = &mut stats[candy.index() as usize];
            if entry.0 == 0 {
                entry.1 = idx;
            }
            entry.0 += 1;
        }
    }

    stats
        .iter()
        .enumerate()
        .filter(|(_, (count, _))| *count > 0)
        .max_by(|(_, a), (_, b)| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .and_then(|(slot, _)| Candy::from_index(slot as u8))
}

/// Every swap an automatic move may try: each cell with its right and its
/// bottom neighbor, `2 * N * (N - 1)` pairs in row-major order.
pub fn swap_candidates(size: u8) -> Vec<(Pos, Pos)> {
    let n = size as i8;
    let mut out = Vec::with_capacity(2 * (size as usize) * (size as usize).saturating_sub(1));
    for row in 0..n {
        for col in 0..n {
            let here = Pos::new(row, col);
            if col + 1 < n {
                out.push((here, Pos::new(row, col + 1)));
            }
            if row + 1 < n {
                out.push((here, Pos::new(row + 1, col)));
            }
        }
    }
    out
}

/// Would swapping `a` and `b` put either of them in a run?
///
/// Works on a scratch copy; the board is not touched.
pub fn swap_forms_match(board: &Board, a: Pos, b: Pos) -> bool {
    if board.candy(a) == board.candy(b) {
        return false;
    }
    let mut probe = board.clone();
    if probe.swap(a, b).is_none() {
        return false;
    }
    run_through(&probe, a) || run_through(&probe, b)
}

/// All candidate swaps that would match, in candidate order.
pub fn matching_swaps(board: &Board) -> Vec<(Pos, Pos)> {
    swap_candidates(board.size())
        .into_iter()
        .filter(|&(a, b)| swap_forms_match(board, a, b))
        .collect()
}

/// First matching swap in candidate order, if any.
pub fn find_matching_swap(board: &Board) -> Option<(Pos, Pos)> {
    swap_candidates(board.size())
        .into_iter()
        .find(|&(a, b)| swap_forms_match(board, a, b))
}
