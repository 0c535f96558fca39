//! Board cursor and selection.
//!
//! Picking two cells with a keyboard takes either two presses of `Select` on
//! adjacent cells, or `Select` followed by a direction. The cursor turns those
//! sequences into [`Request::Swap`]; everything else passes straight through.

use crate::types::{GameAction, Pos};

/// What the host should ask of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Swap { from: Pos, to: Pos },
    ColorBomb,
    AutoMove,
    Hint,
    Restart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pos: Pos,
    selected: Option<Pos>,
    size: u8,
}

impl Cursor {
    pub fn new(size: u8) -> Self {
        Self {
            pos: Pos::new(0, 0),
            selected: None,
            size,
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    fn contains(&self, pos: Pos) -> bool {
        let n = self.size as i8;
        (0..n).contains(&pos.row) && (0..n).contains(&pos.col)
    }

    pub fn apply(&mut self, action: GameAction) -> Option<Request> {
        match action {
            GameAction::Move(dir) => {
                let from = self.selected.take();
                let next = from.unwrap_or(self.pos).step(dir);
                if !self.contains(next) {
                    return None;
                }
                self.pos = next;
                from.map(|from| Request::Swap { from, to: next })
            }
            GameAction::Select => match self.selected {
                Some(sel) if sel == self.pos => {
                    self.selected = None;
                    None
                }
                Some(sel) if sel.is_adjacent(self.pos) => {
                    self.selected = None;
                    Some(Request::Swap {
                        from: sel,
                        to: self.pos,
                    })
                }
                _ => {
                    self.selected = Some(self.pos);
                    None
                }
            },
            GameAction::Cancel => {
                self.selected = None;
                None
            }
            GameAction::ColorBomb => Some(Request::ColorBomb),
            GameAction::AutoMove => Some(Request::AutoMove),
            GameAction::Hint => Some(Request::Hint),
            GameAction::Restart => {
                self.selected = None;
                Some(Request::Restart)
            }
        }
    }

    /// Put the cursor on `pos` if it is on the board
    pub fn jump_to(&mut self, pos: Pos) {
        if self.contains(pos) {
            self.pos = pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn test_cursor_stays_on_board() {
        let mut cursor = Cursor::new(3);
        assert_eq!(cursor.apply(GameAction::Move(Direction::Up)), None);
        assert_eq!(cursor.pos(), Pos::new(0, 0));
        cursor.apply(GameAction::Move(Direction::Right));
        cursor.apply(GameAction::Move(Direction::Right));
        cursor.apply(GameAction::Move(Direction::Right));
        assert_eq!(cursor.pos(), Pos::new(0, 2));
    }

    #[test]
    fn test_select_then_direction_swaps() {
        let mut cursor = Cursor::new(8);
        cursor.jump_to(Pos::new(2, 2));
        assert_eq!(cursor.apply(GameAction::Select), None);
        assert_eq!(cursor.selected(), Some(Pos::new(2, 2)));
        assert_eq!(
            cursor.apply(GameAction::Move(Direction::Down)),
            Some(Request::Swap {
                from: Pos::new(2, 2),
                to: Pos::new(3, 2)
            })
        );
        assert_eq!(cursor.selected(), None);
        assert_eq!(cursor.pos(), Pos::new(3, 2));
    }

    #[test]
    fn test_select_twice_on_neighbors_swaps() {
        let mut cursor = Cursor::new(8);
        cursor.apply(GameAction::Select);
        cursor.jump_to(Pos::new(0, 1));
        assert_eq!(
            cursor.apply(GameAction::Select),
            Some(Request::Swap {
                from: Pos::new(0, 0),
                to: Pos::new(0, 1)
            })
        );
    }

    #[test]
    fn test_select_far_cell_moves_selection() {
        let mut cursor = Cursor::new(8);
        cursor.apply(GameAction::Select);
        cursor.jump_to(Pos::new(4, 4));
        assert_eq!(cursor.apply(GameAction::Select), None);
        assert_eq!(cursor.selected(), Some(Pos::new(4, 4)));
        // Selecting the same cell again drops it.
        assert_eq!(cursor.apply(GameAction::Select), None);
        assert_eq!(cursor.selected(), None);
    }

    #[test]
    fn test_edge_swap_is_dropped() {
        let mut cursor = Cursor::new(4);
        cursor.apply(GameAction::Select);
        assert_eq!(cursor.apply(GameAction::Move(Direction::Left)), None);
        assert_eq!(cursor.selected(), None);
    }

    #[test]
    fn test_passthrough_requests() {
        let mut cursor = Cursor::new(4);
        assert_eq!(cursor.apply(GameAction::ColorBomb), Some(Request::ColorBomb));
        assert_eq!(cursor.apply(GameAction::AutoMove), Some(Request::AutoMove));
        assert_eq!(cursor.apply(GameAction::Hint), Some(Request::Hint));
        cursor.apply(GameAction::Select);
        assert_eq!(cursor.apply(GameAction::Restart), Some(Request::Restart));
        assert_eq!(cursor.selected(), None);
    }
}
