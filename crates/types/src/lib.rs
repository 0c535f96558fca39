//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! They are plain data with no behavior beyond parsing and geometry, so the
//! simulation core, the terminal view and the input layer can all share them.
//!
//! # Board Dimensions
//!
//! - **Default size**: 8x8, indexed `(row, col)` with row 0 at the top
//! - **Supported sizes**: 3..=16
//! - **Palette**: up to 6 candy types; a palette of `K` uses the first `K`
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `POINTS_PER_CANDY` | 100 | Points per candy cleared by a match |
//! | `BOMB_POINTS_PER_CANDY` | 150 | Points per candy wiped by a color-bomb |
//! | `BOMB_BONUS` | 500 | Flat bonus added to every color-bomb |
//!
//! # Examples
//!
//! ```
//! use candy_cascade_types::{Candy, Direction, Pos};
//!
//! assert_eq!(Candy::from_str("RED"), Some(Candy::Red));
//! assert_eq!(Candy::from_index(5), Some(Candy::Purple));
//!
//! let a = Pos::new(2, 3);
//! assert!(a.is_adjacent(a.step(Direction::Right)));
//! assert!(!a.is_adjacent(Pos::new(3, 4)));
//! ```

use serde::{Deserialize, Serialize};

/// Default board edge length (8x8)
pub const DEFAULT_BOARD_SIZE: u8 = 8;

/// Smallest board on which a run of three fits
pub const MIN_BOARD_SIZE: u8 = 3;

/// Largest supported board edge length
pub const MAX_BOARD_SIZE: u8 = 16;

/// Default number of candy types in play
pub const DEFAULT_PALETTE_SIZE: u8 = 6;

/// Number of candy types that exist
pub const MAX_PALETTE_SIZE: u8 = 6;

/// Minimum length of a run that counts as a match
pub const MIN_RUN: usize = 3;

/// Points per candy cleared by a regular match
pub const POINTS_PER_CANDY: u32 = 100;

/// Points per candy wiped by a color-bomb
pub const BOMB_POINTS_PER_CANDY: u32 = 150;

/// Flat bonus for every color-bomb that clears at least one candy
pub const BOMB_BONUS: u32 = 500;

/// Default move allowance for a level
pub const DEFAULT_MOVES: u32 = 20;

/// Default target score for a level
pub const DEFAULT_TARGET_SCORE: u32 = 6000;

/// The six candy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Candy {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl Candy {
    /// All candies in palette order
    pub const ALL: [Candy; 6] = [
        Candy::Red,
        Candy::Orange,
        Candy::Yellow,
        Candy::Green,
        Candy::Blue,
        Candy::Purple,
    ];

    /// Palette index of this candy (0..6)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Candy at a palette index
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Parse candy from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "red" | "r", "orange" | "o", ...
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" | "r" => Some(Candy::Red),
            "orange" | "o" => Some(Candy::Orange),
            "yellow" | "y" => Some(Candy::Yellow),
            "green" | "g" => Some(Candy::Green),
            "blue" | "b" => Some(Candy::Blue),
            "purple" | "p" => Some(Candy::Purple),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Candy::Red => "red",
            Candy::Orange => "orange",
            Candy::Yellow => "yellow",
            Candy::Green => "green",
            Candy::Blue => "blue",
            Candy::Purple => "purple",
        }
    }

    /// Uppercase single-letter form used in text boards
    pub fn initial(self) -> char {
        match self {
            Candy::Red => 'R',
            Candy::Orange => 'O',
            Candy::Yellow => 'Y',
            Candy::Green => 'G',
            Candy::Blue => 'B',
            Candy::Purple => 'P',
        }
    }
}

/// A cell on the board
///
/// - `None`: empty (only observable mid-cascade)
/// - `Some(Candy)`: occupied
pub type Cell = Option<Candy>;

/// Grid coordinate. Signed so callers can hand over unchecked input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: i8,
    pub col: i8,
}

impl Pos {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Manhattan distance is exactly one
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dr = (self.row as i16 - other.row as i16).abs();
        let dc = (self.col as i16 - other.col as i16).abs();
        dr + dc == 1
    }

    /// Neighboring coordinate in `dir` (may fall off the board)
    pub fn step(self, dir: Direction) -> Pos {
        let (dr, dc) = dir.delta();
        Pos {
            row: self.row.saturating_add(dr),
            col: self.col.saturating_add(dc),
        }
    }
}

/// Cardinal directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row delta, col delta)
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Player-facing actions produced by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the cursor, or swap the selected candy in this direction
    Move(Direction),
    /// Select or deselect the candy under the cursor
    Select,
    /// Drop the current selection
    Cancel,
    /// Fire a color-bomb on the most common candy
    ColorBomb,
    /// Let the engine play one automatic move
    AutoMove,
    /// Highlight a swap that would match
    Hint,
    /// Start a new level
    Restart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candy_index_roundtrip() {
        for (i, candy) in Candy::ALL.iter().enumerate() {
            assert_eq!(candy.index() as usize, i);
            assert_eq!(Candy::from_index(i as u8), Some(*candy));
        }
        assert_eq!(Candy::from_index(6), None);
    }

    #[test]
    fn candy_parse() {
        assert_eq!(Candy::from_str("Purple"), Some(Candy::Purple));
        assert_eq!(Candy::from_str("g"), Some(Candy::Green));
        assert_eq!(Candy::from_str("teal"), None);
        assert_eq!(Candy::Blue.as_str(), "blue");
        for candy in Candy::ALL {
            assert_eq!(Candy::from_str(&candy.initial().to_string()), Some(candy));
        }
    }

    #[test]
    fn adjacency_is_manhattan_one() {
        let p = Pos::new(4, 4);
        assert!(p.is_adjacent(Pos::new(3, 4)));
        assert!(p.is_adjacent(Pos::new(4, 5)));
        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Pos::new(5, 5)));
        assert!(!p.is_adjacent(Pos::new(4, 6)));
    }

    #[test]
    fn step_follows_direction() {
        let p = Pos::new(0, 0);
        assert_eq!(p.step(Direction::Up), Pos::new(-1, 0));
        assert_eq!(p.step(Direction::Right), Pos::new(0, 1));
        assert_eq!(p.step(Direction::Down), Pos::new(1, 0));
        assert_eq!(p.step(Direction::Left), Pos::new(0, -1));
    }

    #[test]
    fn default_constants() {
        assert_eq!(DEFAULT_BOARD_SIZE, 8);
        assert_eq!(DEFAULT_PALETTE_SIZE, 6);
        assert_eq!(POINTS_PER_CANDY, 100);
        assert_eq!(BOMB_POINTS_PER_CANDY, 150);
        assert_eq!(BOMB_BONUS, 500);
    }
}
