//! Snapshot - a plain copy of the engine's observable state
//!
//! Renderers and the headless runner read the board through
//! [`BoardSnapshot`] instead of borrowing the engine. It serializes to the
//! JSON the headless runner prints.

use serde::Serialize;

use crate::engine::Phase;
use crate::types::{Candy, Cell, Pos};

/// Read-only view of an engine, for renderers and the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BoardSnapshot {
    pub size: u8,
    pub palette: u8,
    pub rows: Vec<Vec<Cell>>,
    pub board_id: u32,
    pub score: u32,
    pub moves_consumed: u32,
    pub phase: Phase,
    pub busy: bool,
    /// Whether any swap would match right now
    pub moves_available: bool,
    pub seed: Option<u32>,
}

impl BoardSnapshot {
    pub fn cell(&self, pos: Pos) -> Option<Candy> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        self.rows
            .get(pos.row as usize)
            .and_then(|row| row.get(pos.col as usize))
            .copied()
            .flatten()
    }

    /// Idle with at least one matching swap
    pub fn playable(&self) -> bool {
        !self.busy && self.moves_available
    }

    /// Rows as letters, `.` for empty cells
    pub fn to_text(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or('.', Candy::initial))
                    .collect()
            })
            .collect()
    }
}
