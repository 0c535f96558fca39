//! Candy Cascade (workspace facade crate).
//!
//! The rules live in dedicated crates under `crates/`; this package re-exports
//! them as `candy_cascade::{core,input,term,types}` and holds the pieces shared
//! by the two binaries.

pub mod cli;
pub mod logging;

pub use candy_cascade_core as core;
pub use candy_cascade_input as input;
pub use candy_cascade_term as term;
pub use candy_cascade_types as types;
