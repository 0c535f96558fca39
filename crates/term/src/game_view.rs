//! GameView: maps a [`BoardSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{BoardSnapshot, LevelStatus, Phase};
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::types::{Candy, Pos};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Everything drawn besides the board itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudView {
    pub cursor: Pos,
    pub selected: Option<Pos>,
    pub hint: Option<(Pos, Pos)>,
    pub moves_left: u32,
    pub target_score: u32,
    pub status: LevelStatus,
}

impl HudView {
    pub fn new(moves_left: u32, target_score: u32) -> Self {
        Self {
            cursor: Pos::new(0, 0),
            selected: None,
            hint: None,
            moves_left,
            target_score,
            status: LevelStatus::Playing,
        }
    }
}

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const LIGHT: Rgb = Rgb::new(200, 200, 200);

/// A lightweight terminal renderer for the candy board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 3x1 keeps cells roughly square and leaves room for the cursor marks.
        Self { cell_w: 3, cell_h: 1 }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &BoardSnapshot, hud: &HudView, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.reset(viewport.width, viewport.height);

        let n = snap.size as u16;
        let board_px_w = n * self.cell_w;
        let board_px_h = n * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w + PANEL_W) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        fb.fill_rect(start_x + 1, start_y + 1, board_px_w, board_px_h, ' ', Style::PLAIN.bg(BOARD_BG));
        draw_border(fb, start_x, start_y, frame_w, frame_h, Style::PLAIN.fg(LIGHT));

        for (r, row) in snap.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let pos = Pos::new(r as i8, c as i8);
                let mark = self.mark_for(pos, hud);
                self.draw_cell(fb, start_x, start_y, pos, *cell, mark);
            }
        }

        self.draw_side_panel(fb, snap, hud, viewport, start_x + frame_w + 2, start_y);

        let overlay = match hud.status {
            LevelStatus::Won => Some("LEVEL CLEAR"),
            LevelStatus::OutOfMoves => Some("OUT OF MOVES"),
            LevelStatus::Playing if !snap.busy && !snap.playable() => Some("NO MOVES"),
            LevelStatus::Playing => None,
        };
        if let Some(text) = overlay {
            draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, text);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &BoardSnapshot, hud: &HudView, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    fn mark_for(&self, pos: Pos, hud: &HudView) -> Mark {
        if hud.selected == Some(pos) {
            Mark::Selected
        } else if hud.cursor == pos {
            Mark::Cursor
        } else if hud.hint.is_some_and(|(a, b)| a == pos || b == pos) {
            Mark::Hint
        } else {
            Mark::None
        }
    }

    fn draw_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, pos: Pos, cell: Option<Candy>, mark: Mark) {
        let bg = match mark {
            Mark::Selected => Rgb::new(120, 100, 30),
            Mark::Cursor => Rgb::new(70, 70, 90),
            Mark::Hint => Rgb::new(40, 80, 60),
            Mark::None => BOARD_BG,
        };
        let (ch, fg) = match cell {
            Some(candy) => (candy.initial(), candy_color(candy)),
            None => ('·', Rgb::new(90, 90, 100)),
        };
        let base = Style::PLAIN.fg(fg).bg(bg);
        let style = if cell.is_some() { base.bold() } else { base.dim() };

        let px = start_x + 1 + (pos.col as u16) * self.cell_w;
        let py = start_y + 1 + (pos.row as u16) * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        fb.put_char(px + self.cell_w / 2, py + self.cell_h / 2, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &BoardSnapshot,
        hud: &HudView,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x.saturating_add(12) > viewport.width {
            return;
        }

        let label = Style::PLAIN.bold();
        let value = Style::PLAIN.fg(LIGHT);
        let dim = value.dim();

        let mut y = start_y;
        for (name, v) in [
            ("SCORE", snap.score),
            ("TARGET", hud.target_score),
            ("MOVES", hud.moves_left),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, v, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "PHASE", label);
        match snap.phase {
            Phase::Idle => fb.put_str(panel_x, y + 1, "idle", value),
            Phase::Validating => fb.put_str(panel_x, y + 1, "checking", value),
            Phase::Resolving { round } => {
                fb.put_str(panel_x, y + 1, "cascade", value);
                fb.put_u32(panel_x + 8, y + 1, round, value);
            }
        }
        y = y.saturating_add(3);

        for help in ["b bomb  a auto", "i hint  r new", "q quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, help, dim);
            y = y.saturating_add(1);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    None,
    Cursor,
    Selected,
    Hint,
}

const PANEL_W: u16 = 16;

fn candy_color(candy: Candy) -> Rgb {
    match candy {
        Candy::Red => Rgb::new(230, 70, 70),
        Candy::Orange => Rgb::new(255, 165, 0),
        Candy::Yellow => Rgb::new(240, 220, 80),
        Candy::Green => Rgb::new(100, 220, 120),
        Candy::Blue => Rgb::new(80, 140, 240),
        Candy::Purple => Rgb::new(200, 120, 220),
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: Style) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_overlay_text(fb: &mut FrameBuffer, start_x: u16, start_y: u16, frame_w: u16, frame_h: u16, text: &str) {
    let mid_y = start_y.saturating_add(frame_h / 2);
    let text_w = text.chars().count() as u16;
    let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
    let style = Style::PLAIN.fg(Rgb::new(255, 255, 255)).bold();
    fb.put_str(x, mid_y, text, style);
}
