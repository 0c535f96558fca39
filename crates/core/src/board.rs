//! Board module - manages the candy grid
//!
//! The board is an N x N grid where each cell is empty or holds a candy.
//! Storage is a flat row-major vector (`row * size + col`); row 0 is the top.
//! Coordinates come in as signed [`Pos`] values and every accessor bounds-checks.
//!
//! Invariant: right after [`Board::generate`] and after every completed cascade
//! the board is settled (no run of three or more in any row or column). The
//! board itself does not enforce this; the engine does.

use std::fmt;

use arrayvec::ArrayVec;
use tracing::{trace, warn};

use crate::error::EngineError;
use crate::matcher;
use crate::rng::RandomSource;
use crate::types::{
    Candy, Cell, Direction, Pos, MAX_BOARD_SIZE, MAX_PALETTE_SIZE, MIN_BOARD_SIZE,
};

/// How many times a single row is regenerated before giving up
const ROW_ATTEMPTS: u32 = 32;

/// The candy grid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: u8,
    palette: u8,
    /// Flat array of cells, row-major order (row * size + col)
    cells: Vec<Cell>,
}

/// Check that a size/palette pair is something the engine can run.
pub fn validate_dimensions(size: u8, palette: u8) -> Result<(), EngineError> {
    if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        return Err(EngineError::InvalidConfig(format!(
            "board size must be {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}, got {size}"
        )));
    }
    if !(1..=MAX_PALETTE_SIZE).contains(&palette) {
        return Err(EngineError::InvalidConfig(format!(
            "palette size must be 1..={MAX_PALETTE_SIZE}, got {palette}"
        )));
    }
    Ok(())
}

impl Board {
    /// Create a board with every cell empty
    pub fn empty(size: u8, palette: u8) -> Self {
        let len = (size as usize) * (size as usize);
        Self {
            size,
            palette,
            cells: vec![None; len],
        }
    }

    /// Fill a new board with no pre-existing runs.
    ///
    /// Each cell draws a random starting candy and walks the palette until it
    /// finds one that does not complete a run with the two cells to its left
    /// or the two above. With three or more candy types that always succeeds.
    /// With fewer a row can dead-end; it is regenerated up to a fixed number of
    /// times before the call fails with [`EngineError::GenerationStall`].
    pub fn generate<R: RandomSource + ?Sized>(
        size: u8,
        palette: u8,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        validate_dimensions(size, palette)?;

        let mut board = Self::empty(size, palette);
        for row in 0..size {
            let mut attempts = 1;
            while !board.fill_row(row, rng) {
                if attempts >= ROW_ATTEMPTS {
                    warn!(size, palette, row, "board generation stalled");
                    return Err(EngineError::GenerationStall { size, palette });
                }
                attempts += 1;
                trace!(row, attempts, "regenerating row");
            }
        }
        Ok(board)
    }

    /// Build a board from explicit row-major cells.
    ///
    /// Every candy must belong to the first `palette` candy types.
    pub fn from_cells(size: u8, palette: u8, cells: Vec<Cell>) -> Result<Self, EngineError> {
        validate_dimensions(size, palette)?;
        let expected = (size as usize) * (size as usize);
        if cells.len() != expected {
            return Err(EngineError::InvalidConfig(format!(
                "expected {expected} cells for a {size}x{size} board, got {}",
                cells.len()
            )));
        }
        if let Some(candy) = cells.iter().flatten().find(|c| c.index() >= palette) {
            return Err(EngineError::InvalidConfig(format!(
                "{} is outside a palette of {palette}",
                candy.as_str()
            )));
        }
        Ok(Self {
            size,
            palette,
            cells,
        })
    }

    /// Build a board from one string per row: candy initials (`R O Y G B P`)
    /// and `.` for empty cells.
    pub fn parse(palette: u8, rows: &[&str]) -> Result<Self, EngineError> {
        let size = u8::try_from(rows.len())
            .map_err(|_| EngineError::InvalidConfig("too many rows".into()))?;
        let mut cells = Vec::with_capacity(rows.len() * rows.len());
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != rows.len() {
                return Err(EngineError::InvalidConfig(format!(
                    "row {row} has {} cells, expected {}",
                    line.chars().count(),
                    rows.len()
                )));
            }
            for ch in line.chars() {
                if ch == '.' {
                    cells.push(None);
                    continue;
                }
                let candy = Candy::from_str(&ch.to_string()).ok_or_else(|| {
                    EngineError::InvalidConfig(format!("unknown candy '{ch}' in row {row}"))
                })?;
                cells.push(Some(candy));
            }
        }
        Self::from_cells(size, palette, cells)
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        let n = self.size as i16;
        let (r, c) = (pos.row as i16, pos.col as i16);
        if r < 0 || r >= n || c < 0 || c >= n {
            return None;
        }
        Some((r * n + c) as usize)
    }

    /// Edge length of the board
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Number of candy types used for refills
    pub fn palette(&self) -> u8 {
        self.palette
    }

    /// Whether `pos` lies on the board
    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// Get cell at `pos`
    /// Returns None if out of bounds
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Candy at `pos`, None when empty or out of bounds
    pub fn candy(&self, pos: Pos) -> Option<Candy> {
        self.get(pos).flatten()
    }

    /// Set cell at `pos`
    /// Returns false if out of bounds
    pub fn set(&mut self, pos: Pos, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Exchange two cells and hand back the board as it was before.
    ///
    /// No adjacency or match checks happen here. Returns None (and leaves the
    /// board untouched) if either position is off the board.
    pub fn swap(&mut self, a: Pos, b: Pos) -> Option<Board> {
        let ia = self.index(a)?;
        let ib = self.index(b)?;
        let previous = self.clone();
        self.cells.swap(ia, ib);
        Some(previous)
    }

    /// Empty every listed cell. Returns how many held a candy.
    pub fn clear(&mut self, positions: &[Pos]) -> u32 {
        let mut cleared = 0;
        for &pos in positions {
            if let Some(idx) = self.index(pos) {
                if self.cells[idx].take().is_some() {
                    cleared += 1;
                }
            }
        }
        cleared
    }

    /// Drop candies into the gaps and refill from the top.
    ///
    /// Each column is compacted downward independently, keeping the relative
    /// order of its candies, and the vacated top cells get fresh random candies.
    /// Refills may form new runs; that is what drives a cascade. Returns whether
    /// any cell moved or was filled.
    pub fn apply_gravity_and_refill<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.compact_and_fill(rng, false)
    }

    /// Like [`Board::apply_gravity_and_refill`], but each fresh candy walks the
    /// palette from its random start until it completes no run with its
    /// neighbors. Falls back to the random start when every candy would.
    pub fn refill_without_runs<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.compact_and_fill(rng, true)
    }

    fn compact_and_fill<R: RandomSource + ?Sized>(&mut self, rng: &mut R, avoid_runs: bool) -> bool {
        let n = self.size as usize;
        let mut changed = false;

        for col in 0..n {
            // Scan bottom to top; `write` is the next free slot from the bottom.
            let mut write = n;
            for row in (0..n).rev() {
                let idx = row * n + col;
                if let Some(candy) = self.cells[idx] {
                    write -= 1;
                    if write != row {
                        self.cells[write * n + col] = Some(candy);
                        self.cells[idx] = None;
                        changed = true;
                    }
                }
            }

            for row in 0..write {
                let pos = Pos::new(row as i8, col as i8);
                let candy = if avoid_runs {
                    self.run_free_candy(pos, rng)
                } else {
                    self.random_candy(rng)
                };
                self.cells[row * n + col] = Some(candy);
                changed = true;
            }
        }

        changed
    }

    /// In-bounds orthogonal neighbors of `pos`
    pub fn neighbors(&self, pos: Pos) -> ArrayVec<Pos, 4> {
        let mut out = ArrayVec::new();
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let next = pos.step(dir);
            if self.contains(next) {
                out.push(next);
            }
        }
        out
    }

    /// How many cells hold `candy`
    pub fn count(&self, candy: Candy) -> usize {
        self.cells.iter().filter(|c| **c == Some(candy)).count()
    }

    /// Every position holding `candy`, in row-major order
    pub fn positions_of(&self, candy: Candy) -> Vec<Pos> {
        self.positions()
            .filter(|pos| self.candy(*pos) == Some(candy))
            .collect()
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let n = self.size as i8;
        (0..n).flat_map(move |row| (0..n).map(move |col| Pos::new(row, col)))
    }

    /// True when no row or column holds a run of three or more
    pub fn is_settled(&self) -> bool {
        !matcher::has_any_run(self)
    }

    /// Number of empty cells
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size as usize)
    }

    fn random_candy<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Candy {
        let idx = rng.next_range(self.palette as u32) as usize;
        Candy::ALL[idx % Candy::ALL.len()]
    }

    fn run_free_candy<R: RandomSource + ?Sized>(&mut self, pos: Pos, rng: &mut R) -> Candy {
        let palette = self.palette;
        let start = rng.next_range(palette as u32) as u8;
        let fallback = Candy::ALL[(start as usize) % Candy::ALL.len()];
        let pick = (0..palette)
            .filter_map(|k| Candy::from_index((start + k) % palette))
            .find(|candy| {
                self.set(pos, Some(*candy));
                let run = matcher::run_through(self, pos);
                self.set(pos, None);
                !run
            });
        pick.unwrap_or(fallback)
    }

    /// Fill one row left to right. On a dead end the row is wiped and false
    /// is returned so the caller can retry it.
    fn fill_row<R: RandomSource + ?Sized>(&mut self, row: u8, rng: &mut R) -> bool {
        for col in 0..self.size {
            let pos = Pos::new(row as i8, col as i8);
            let start = rng.next_range(self.palette as u32) as u8;
            let pick = (0..self.palette)
                .filter_map(|k| Candy::from_index((start + k) % self.palette))
                .find(|candy| !self.completes_run(pos, *candy));

            match pick {
                Some(candy) => {
                    self.set(pos, Some(candy));
                }
                None => {
                    for c in 0..self.size {
                        self.set(Pos::new(row as i8, c as i8), None);
                    }
                    return false;
                }
            }
        }
        true
    }

    /// Would placing `candy` at `pos` finish a run with the two cells before
    /// it in its row or its column?
    fn completes_run(&self, pos: Pos, candy: Candy) -> bool {
        let same = |dr: i8, dc: i8| {
            self.candy(Pos::new(pos.row - dr, pos.col - dc)) == Some(candy)
        };
        (same(0, 1) && same(0, 2)) || (same(1, 0) && same(2, 0))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let ch = cell.map_or('.', Candy::initial);
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ReplayRng, SimpleRng};

    #[test]
    fn test_board_index_calculation() {
        let board = Board::empty(8, 6);
        assert_eq!(board.index(Pos::new(0, 0)), Some(0));
        assert_eq!(board.index(Pos::new(0, 7)), Some(7));
        assert_eq!(board.index(Pos::new(1, 0)), Some(8));
        assert_eq!(board.index(Pos::new(7, 7)), Some(63));
        assert_eq!(board.index(Pos::new(-1, 0)), None);
        assert_eq!(board.index(Pos::new(0, 8)), None);
        assert_eq!(board.index(Pos::new(8, 0)), None);
    }

    #[test]
    fn test_generate_is_full_and_settled() {
        for seed in 1..50 {
            let mut rng = SimpleRng::new(seed);
            let board = Board::generate(8, 6, &mut rng).unwrap();
            assert_eq!(board.empty_count(), 0);
            assert!(board.is_settled(), "seed {seed}:\n{board}");
        }
    }

    #[test]
    fn test_generate_three_colors_never_stalls() {
        for seed in 1..50 {
            let mut rng = SimpleRng::new(seed);
            let board = Board::generate(16, 3, &mut rng).unwrap();
            assert!(board.is_settled());
            assert!(board.cells().iter().flatten().all(|c| c.index() < 3));
        }
    }

    #[test]
    fn test_generate_single_color_stalls() {
        let mut rng = SimpleRng::new(1);
        assert_eq!(
            Board::generate(8, 1, &mut rng),
            Err(EngineError::GenerationStall {
                size: 8,
                palette: 1
            })
        );
    }

    #[test]
    fn test_generate_rejects_bad_dimensions() {
        let mut rng = SimpleRng::new(1);
        assert!(matches!(
            Board::generate(2, 6, &mut rng),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            Board::generate(8, 0, &mut rng),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            Board::generate(8, 7, &mut rng),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_swap_returns_previous_board() {
        let mut board = Board::parse(6, &["RGB", "GBR", "BRG"]).unwrap();
        let before = board.clone();
        let previous = board.swap(Pos::new(0, 0), Pos::new(0, 1)).unwrap();
        assert_eq!(previous, before);
        assert_eq!(board.candy(Pos::new(0, 0)), Some(Candy::Green));
        assert_eq!(board.candy(Pos::new(0, 1)), Some(Candy::Red));

        // Swapping back is the identity.
        board.swap(Pos::new(0, 0), Pos::new(0, 1)).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_swap_out_of_bounds_is_noop() {
        let mut board = Board::parse(6, &["RGB", "GBR", "BRG"]).unwrap();
        let before = board.clone();
        assert!(board.swap(Pos::new(0, 0), Pos::new(0, 3)).is_none());
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_counts_only_occupied() {
        let mut board = Board::parse(6, &["RG.", "GBR", "BRG"]).unwrap();
        let cleared = board.clear(&[Pos::new(0, 0), Pos::new(0, 2), Pos::new(5, 5)]);
        assert_eq!(cleared, 1);
        assert_eq!(board.get(Pos::new(0, 0)), Some(None));
        assert_eq!(board.empty_count(), 2);
    }

    #[test]
    fn test_gravity_preserves_column_order() {
        // Column 0 top to bottom: R . G . -> after gravity: ? ? R G
        let mut board = Board::parse(6, &["RBOY", ".OYB", "GYBO", ".BOY"]).unwrap();
        let mut rng = ReplayRng::new(vec![4, 5]);
        assert!(board.apply_gravity_and_refill(&mut rng));

        assert_eq!(board.candy(Pos::new(2, 0)), Some(Candy::Red));
        assert_eq!(board.candy(Pos::new(3, 0)), Some(Candy::Green));
        assert_eq!(board.candy(Pos::new(0, 0)), Some(Candy::Blue));
        assert_eq!(board.candy(Pos::new(1, 0)), Some(Candy::Purple));
        assert_eq!(board.empty_count(), 0);

        // Untouched columns keep their contents.
        assert_eq!(board.candy(Pos::new(0, 1)), Some(Candy::Blue));
        assert_eq!(board.candy(Pos::new(3, 3)), Some(Candy::Yellow));
    }

    #[test]
    fn test_gravity_on_full_board_reports_no_change() {
        let mut board = Board::parse(6, &["RGB", "GBR", "BRG"]).unwrap();
        let before = board.clone();
        let mut rng = SimpleRng::new(3);
        assert!(!board.apply_gravity_and_refill(&mut rng));
        assert_eq!(board, before);
    }

    #[test]
    fn test_gravity_refills_within_palette() {
        let mut board = Board::empty(8, 4);
        let mut rng = SimpleRng::new(11);
        assert!(board.apply_gravity_and_refill(&mut rng));
        assert_eq!(board.empty_count(), 0);
        assert!(board.cells().iter().flatten().all(|c| c.index() < 4));
    }

    #[test]
    fn test_refill_without_runs_skips_completing_candies() {
        let rows = ["....", "GBRY", "BYGB", "YGBY"];
        let mut rng = ReplayRng::new(vec![0]);

        let mut plain = Board::parse(6, &rows).unwrap();
        assert!(plain.apply_gravity_and_refill(&mut rng));
        assert!(!plain.is_settled());

        let mut board = Board::parse(6, &rows).unwrap();
        assert!(board.refill_without_runs(&mut rng));
        assert!(board.is_settled());
        assert_eq!(board.to_string().lines().next(), Some("RROR"));
    }

    #[test]
    fn test_neighbors_at_corner_and_center() {
        let board = Board::empty(8, 6);
        assert_eq!(board.neighbors(Pos::new(0, 0)).len(), 2);
        assert_eq!(board.neighbors(Pos::new(0, 3)).len(), 3);
        assert_eq!(board.neighbors(Pos::new(4, 4)).len(), 4);
    }

    #[test]
    fn test_parse_and_display_roundtrip() {
        let rows = ["RGB", "G.R", "BRP"];
        let board = Board::parse(6, &rows).unwrap();
        assert_eq!(board.to_string(), "RGB\nG.R\nBRP");
    }

    #[test]
    fn test_from_cells_rejects_foreign_candy() {
        let result = Board::parse(3, &["RGB", "GBR", "BRP"]);
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }
}
