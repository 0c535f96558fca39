//! TerminalRenderer: puts frames on a real terminal.
//!
//! The first frame (and any frame after a resize) repaints everything. After
//! that only spans of changed glyphs are written, so stepping a cascade one
//! phase at a time costs a few cells per frame instead of the whole screen.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::{cursor, queue, terminal};

use crate::fb::{FrameBuffer, Rgb, Style};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    /// Frame currently on screen, None forces a repaint
    shown: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        queue!(
            self.buf,
            terminal::EnterAlternateScreen,
            terminal::DisableLineWrap,
            cursor::Hide
        )?;
        self.flush()
    }

    /// Undo [`TerminalRenderer::enter`].
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        queue!(
            self.buf,
            SetAttribute(Attribute::Reset),
            ResetColor,
            cursor::Show,
            terminal::EnableLineWrap,
            terminal::LeaveAlternateScreen
        )?;
        self.flush()?;
        terminal::disable_raw_mode()?;
        self.shown = None;
        Ok(())
    }

    /// Repaint everything on the next frame, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Show `fb`, writing only what changed since the last frame.
    ///
    /// The shown frame and `fb` trade places, so afterwards `fb` holds an old
    /// frame for the view to draw over and no frame is ever reallocated.
    pub fn present(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let mut old = match self.shown.take() {
            Some(old) if same_size(&old, fb) => {
                encode_changes(&old, fb, &mut self.buf)?;
                old
            }
            _ => {
                encode_full(fb, &mut self.buf)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.flush()?;

        std::mem::swap(&mut old, fb);
        self.shown = Some(old);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// A horizontal run of changed glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub x: u16,
    pub y: u16,
    pub len: u16,
}

/// Spans where `next` differs from `prev`, top to bottom, left to right.
///
/// Frames of different sizes differ everywhere.
pub fn changed_spans(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<Span> {
    let w = next.width();
    if !same_size(prev, next) {
        return (0..next.height()).map(|y| Span { x: 0, y, len: w }).collect();
    }

    let mut spans = Vec::new();
    for y in 0..next.height() {
        let differs = |x: u16| prev.get(x, y) != next.get(x, y);
        let mut x = 0;
        while x < w {
            if !differs(x) {
                x += 1;
                continue;
            }
            let start = x;
            while x < w && differs(x) {
                x += 1;
            }
            spans.push(Span { x: start, y, len: x - start });
        }
    }
    spans
}

/// Encode a full repaint of `fb` into `out`.
pub fn encode_full(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    queue!(out, terminal::Clear(terminal::ClearType::All))?;
    let mut pen = Pen::default();
    for y in 0..fb.height() {
        queue!(out, cursor::MoveTo(0, y))?;
        pen.print_row(out, fb, 0, y, fb.width())?;
    }
    pen.finish(out)
}

/// Encode the glyphs of `next` that differ from `prev`.
pub fn encode_changes(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let spans = changed_spans(prev, next);
    if spans.is_empty() {
        return Ok(());
    }
    let mut pen = Pen::default();
    for span in spans {
        queue!(out, cursor::MoveTo(span.x, span.y))?;
        pen.print_row(out, next, span.x, span.y, span.len)?;
    }
    pen.finish(out)
}

/// Tracks the terminal's current style so only changes are emitted.
#[derive(Debug, Default)]
struct Pen {
    current: Option<Style>,
}

impl Pen {
    fn print_row(&mut self, out: &mut Vec<u8>, fb: &FrameBuffer, x: u16, y: u16, len: u16) -> Result<()> {
        for dx in 0..len {
            let glyph = fb.get(x.saturating_add(dx), y).unwrap_or_default();
            self.switch_to(out, glyph.style)?;
            queue!(out, Print(glyph.ch))?;
        }
        Ok(())
    }

    fn switch_to(&mut self, out: &mut Vec<u8>, style: Style) -> Result<()> {
        let attrs_changed = self
            .current
            .map_or(true, |cur| cur.bold != style.bold || cur.dim != style.dim);

        if attrs_changed {
            // SGR reset also drops the colors, so both are re-sent.
            queue!(out, SetAttribute(Attribute::Reset))?;
            if style.bold {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                queue!(out, SetAttribute(Attribute::Dim))?;
            }
        }
        if attrs_changed || self.current.map(|c| c.fg) != Some(style.fg) {
            queue!(out, SetForegroundColor(color(style.fg)))?;
        }
        if attrs_changed || self.current.map(|c| c.bg) != Some(style.bg) {
            queue!(out, SetBackgroundColor(color(style.bg)))?;
        }
        self.current = Some(style);
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<()> {
        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
        self.current = None;
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_spans_coalesce_neighbors() {
        let a = FrameBuffer::new(6, 2);
        let mut b = FrameBuffer::new(6, 2);
        b.put_str(1, 0, "RRR", Style::PLAIN);
        b.put_char(5, 1, 'B', Style::PLAIN);
        assert_eq!(
            changed_spans(&a, &b),
            vec![Span { x: 1, y: 0, len: 3 }, Span { x: 5, y: 1, len: 1 }]
        );
    }

    #[test]
    fn test_style_only_change_is_a_span() {
        let a = FrameBuffer::new(3, 1);
        let mut b = a.clone();
        b.put_char(1, 0, ' ', Style::PLAIN.bg(Rgb::new(70, 70, 90)));
        assert_eq!(changed_spans(&a, &b), vec![Span { x: 1, y: 0, len: 1 }]);
    }

    #[test]
    fn test_resized_frame_differs_everywhere() {
        let a = FrameBuffer::new(4, 2);
        let b = FrameBuffer::new(5, 3);
        let spans = changed_spans(&a, &b);
        assert_eq!(spans.len(), 3);
        assert!(spans.iter().all(|s| s.x == 0 && s.len == 5));
    }

    #[test]
    fn test_identical_frames_encode_nothing() {
        let a = FrameBuffer::new(4, 2);
        let mut out = Vec::new();
        encode_changes(&a, &a.clone(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_full_encode_prints_rows_in_order() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_str(0, 0, "RO", Style::PLAIN);
        fb.put_str(0, 1, "YG", Style::PLAIN);

        let mut out = Vec::new();
        encode_full(&fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        let ro = text.find("RO").unwrap();
        let yg = text.find("YG").unwrap();
        assert!(ro < yg);
    }

    #[test]
    fn test_pen_skips_unchanged_colors() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.put_str(0, 0, "RRR", Style::PLAIN.fg(Rgb::new(230, 70, 70)));

        let mut out = Vec::new();
        encode_full(&fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        // One foreground switch for the whole run.
        assert_eq!(text.matches("38;2;230;70;70").count(), 1);
        assert!(text.contains("RRR"));
    }
}
