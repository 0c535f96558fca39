//! Core simulation module - pure, deterministic, and testable
//!
//! This crate holds every rule of the game: the board, match detection,
//! cascades, scoring, color-bombs, automatic moves and the state machine that
//! sequences them. It has **no dependencies** on terminal I/O, so it runs the
//! same under the TUI, the headless runner and the test suite.
//!
//! # Module Structure
//!
//! - [`board`]: N x N grid, settled generation, swap, clear, gravity and refill
//! - [`matcher`]: run detection with L/T deduplication
//! - [`resolver`]: the detect/clear/refill cascade as a steppable machine
//! - [`scoring`]: points for matches and color-bombs
//! - [`effects`]: color-bomb targeting and swap enumeration
//! - [`engine`]: move validation, effects and the in-progress guard
//! - [`session`]: move budget and target score
//! - [`rng`]: injectable random sources
//!
//! # Rules
//!
//! - A swap is only kept if it creates a run of three or more; otherwise the
//!   board is restored exactly.
//! - Every matched candy is worth 100 points, in every cascade round.
//! - A color-bomb wipes every candy of one type for 150 points each plus 500.
//! - The board is settled (no runs, no holes) whenever the engine is idle.
//!
//! # Example
//!
//! ```
//! use candy_cascade_core::Engine;
//!
//! let mut engine = Engine::initialize(8, 6, Some(12345)).unwrap();
//! assert!(engine.board().is_settled());
//!
//! if let Some((a, b)) = engine.hint() {
//!     let outcome = engine.propose_swap(a, b).unwrap();
//!     assert!(outcome.accepted);
//!     assert!(engine.score() >= 300);
//! }
//! assert!(engine.board().is_settled());
//! ```

pub mod board;
pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use candy_cascade_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::EngineConfig;
pub use effects::{find_matching_swap, matching_swaps, most_frequent_candy, swap_candidates};
pub use engine::{
    AutoMovesOutcome, ColorBombOutcome, Engine, EngineEvent, Phase, ResolutionKind,
    ResolutionReport, SwapOutcome, SwapRejection, SwapStart,
};
pub use error::EngineError;
pub use matcher::{find_matches, MatchSet};
pub use resolver::{Cascade, CascadeEvent, CascadeSummary};
pub use rng::{RandomSource, ReplayRng, SimpleRng};
pub use session::{Level, LevelConfig, LevelStatus};
pub use snapshot::BoardSnapshot;
