//! Terminal front end for the candy board.
//!
//! The view draws a [`BoardSnapshot`](candy_cascade_core::BoardSnapshot) into
//! a framebuffer, and the renderer writes only the glyphs that changed, so the
//! board can be redrawn after every cascade phase without flicker.
//!
//! - [`game_view`] is pure and turns a snapshot into cells
//! - [`renderer`] owns the terminal and does the I/O

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use candy_cascade_core as core;
pub use candy_cascade_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{GameView, HudView, Viewport};
pub use renderer::{changed_spans, encode_changes, encode_full, Span, TerminalRenderer};
