//! Engine error taxonomy.
//!
//! Rejected moves are not errors: they come back as `accepted == false` with a
//! [`SwapRejection`](crate::engine::SwapRejection). Everything here is
//! recoverable by the caller except `GenerationStall`, which means the board
//! parameters cannot produce a settled board.

/// Errors returned by the simulation core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("a move or effect is already being resolved")]
    Busy,

    #[error("could not generate a settled {size}x{size} board with {palette} candy types")]
    GenerationStall { size: u8, palette: u8 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("board already contains a run of three or more")]
    UnsettledBoard,

    #[error("the level is over")]
    LevelOver,
}
