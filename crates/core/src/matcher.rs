//! Match detection.
//!
//! Rows are scanned left to right, then columns top to bottom. Each maximal
//! run of three or more equal candies is recorded once per axis; runs that
//! cross (L and T shapes) share cells, and [`find_matches`] merges them into a
//! single deduplicated set.

use serde::Serialize;

use crate::board::Board;
use crate::types::{Candy, Pos, MIN_RUN};

/// Scan direction of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Column,
}

/// A maximal run of one candy along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Run {
    pub candy: Candy,
    pub start: Pos,
    pub len: u8,
    pub axis: Axis,
}

impl Run {
    /// Cells covered by the run
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let Run {
            start, len, axis, ..
        } = *self;
        (0..len as i8).map(move |k| match axis {
            Axis::Row => Pos::new(start.row, start.col + k),
            Axis::Column => Pos::new(start.row + k, start.col),
        })
    }
}

/// Every matched cell of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    runs: Vec<Run>,
    /// Deduplicated, row-major
    positions: Vec<Pos>,
}

impl MatchSet {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of distinct cells matched
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Pos] {
        &self.positions
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }
}

/// All runs on the board: row runs first, then column runs.
pub fn find_runs(board: &Board) -> Vec<Run> {
    let n = board.size() as i8;
    let mut runs = Vec::new();
    for row in 0..n {
        scan_line(board, |i| Pos::new(row, i), Axis::Row, &mut runs);
    }
    for col in 0..n {
        scan_line(board, |i| Pos::new(i, col), Axis::Column, &mut runs);
    }
    runs
}

/// Detect every match on the board without touching it.
pub fn find_matches(board: &Board) -> MatchSet {
    let runs = find_runs(board);
    if runs.is_empty() {
        return MatchSet::default();
    }

    let n = board.size() as usize;
    let mut mask = vec![false; n * n];
    for run in &runs {
        for pos in run.positions() {
            mask[(pos.row as usize) * n + (pos.col as usize)] = true;
        }
    }

    let positions = board
        .positions()
        .filter(|pos| mask[(pos.row as usize) * n + (pos.col as usize)])
        .collect();

    MatchSet { runs, positions }
}

/// Cheaper than [`find_matches`] when only a yes/no is needed.
pub fn has_any_run(board: &Board) -> bool {
    let n = board.size() as i8;
    (0..n).any(|row| {
        (0..n).any(|col| {
            let pos = Pos::new(row, col);
            run_length(board, pos, 0, 1) >= MIN_RUN || run_length(board, pos, 1, 0) >= MIN_RUN
        })
    })
}

/// Is `pos` part of a run of three or more in either axis?
pub fn run_through(board: &Board, pos: Pos) -> bool {
    let Some(candy) = board.candy(pos) else {
        return false;
    };
    let horizontal = 1 + extent(board, pos, candy, 0, -1) + extent(board, pos, candy, 0, 1);
    let vertical = 1 + extent(board, pos, candy, -1, 0) + extent(board, pos, candy, 1, 0);
    horizontal >= MIN_RUN || vertical >= MIN_RUN
}

/// Length of the run starting exactly at `pos` going in (dr, dc)
fn run_length(board: &Board, pos: Pos, dr: i8, dc: i8) -> usize {
    match board.candy(pos) {
        Some(candy) => 1 + extent(board, pos, candy, dr, dc),
        None => 0,
    }
}

/// How many cells past `pos` in (dr, dc) hold `candy`
fn extent(board: &Board, pos: Pos, candy: Candy, dr: i8, dc: i8) -> usize {
    let mut count = 0;
    let mut cur = Pos::new(pos.row + dr, pos.col + dc);
    while board.candy(cur) == Some(candy) {
        count += 1;
        cur = Pos::new(cur.row + dr, cur.col + dc);
    }
    count
}

fn scan_line(board: &Board, at: impl Fn(i8) -> Pos, axis: Axis, out: &mut Vec<Run>) {
    let n = board.size() as i8;
    let mut i = 0;
    while i < n {
        let Some(candy) = board.candy(at(i)) else {
            i += 1;
            continue;
        };
        let mut end = i + 1;
        while end < n && board.candy(at(end)) == Some(candy) {
            end += 1;
        }
        let len = (end - i) as usize;
        if len >= MIN_RUN {
            out.push(Run {
                candy,
                start: at(i),
                len: len as u8,
                axis,
            });
        }
        i = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settled_board_has_no_matches() {
        let board = Board::parse(6, &["RGBR", "GBRG", "BRGB", "RGBR"]).unwrap();
        assert!(find_matches(&board).is_empty());
        assert!(!has_any_run(&board));
    }

    #[test]
    fn test_horizontal_run_of_four() {
        let board = Board::parse(6, &["RRRR", "GBYG", "BYGB", "YGBY"]).unwrap();
        let m = find_matches(&board);
        assert_eq!(m.len(), 4);
        assert_eq!(m.runs().len(), 1);
        assert_eq!(m.runs()[0].axis, Axis::Row);
        assert_eq!(m.runs()[0].len, 4);
        assert!(has_any_run(&board));
    }

    #[test]
    fn test_vertical_run() {
        let board = Board::parse(6, &["RGBY", "RBYG", "RYGB", "GBYG"]).unwrap();
        let m = find_matches(&board);
        assert_eq!(
            m.positions(),
            &[Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)]
        );
        assert_eq!(m.runs()[0].axis, Axis::Column);
    }

    #[test]
    fn test_l_shape_is_deduplicated() {
        // Row 0 R R R and column 0 R R R share (0, 0).
        let board = Board::parse(6, &["RRRG", "RBYB", "RYGY", "GBYG"]).unwrap();
        let m = find_matches(&board);
        assert_eq!(m.runs().len(), 2);
        assert_eq!(m.len(), 5);
        assert!(m.positions().contains(&Pos::new(0, 0)));
        assert!(m.positions().contains(&Pos::new(2, 0)));
        assert!(!m.positions().contains(&Pos::new(1, 1)));
    }

    #[test]
    fn test_t_shape_is_deduplicated() {
        let board = Board::parse(6, &["GYGY", "BBBY", "YBGB", "GBYG"]).unwrap();
        let m = find_matches(&board);
        // Row 1 B B B plus column 1 B B B meeting at (1, 1).
        assert_eq!(m.len(), 5);
    }

    #[test]
    fn test_empty_cells_break_runs() {
        let board = Board::parse(6, &["RR.R", "GBYG", "BYGB", "...."]).unwrap();
        assert!(find_matches(&board).is_empty());
    }

    #[test]
    fn test_two_separate_runs_in_one_row() {
        let board = Board::parse(
            6,
            &["RRRGBBB", "GBYBYGY", "BYGYGBG", "YGBGBYB", "GBYBYGY", "BYGYGBG", "YGBGBYB"],
        )
        .unwrap();
        let m = find_matches(&board);
        assert_eq!(m.runs().len(), 2);
        assert_eq!(m.len(), 6);
    }

    #[test]
    fn test_run_through_checks_both_axes() {
        let board = Board::parse(6, &["RRRG", "GBYB", "BYGY", "GBYG"]).unwrap();
        assert!(run_through(&board, Pos::new(0, 1)));
        assert!(!run_through(&board, Pos::new(1, 1)));
        assert!(!run_through(&board, Pos::new(9, 9)));
    }
}
