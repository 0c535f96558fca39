//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::GameAction`] and keeps the board cursor and
//! selection, turning actions into requests the engine understands.

pub mod cursor;
pub mod map;

pub use candy_cascade_types as types;

pub use cursor::{Cursor, Request};
pub use map::{handle_key_event, should_quit};
