//! Engine and level parameters, with environment overrides.

use crate::board::validate_dimensions;
use crate::error::EngineError;
use crate::types::{DEFAULT_BOARD_SIZE, DEFAULT_MOVES, DEFAULT_PALETTE_SIZE, DEFAULT_TARGET_SCORE};

/// Parameters for a new engine and the level around it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub size: u8,
    pub palette_size: u8,
    /// None seeds from the clock
    pub seed: Option<u32>,
    pub moves: u32,
    pub target_score: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            palette_size: DEFAULT_PALETTE_SIZE,
            seed: None,
            moves: DEFAULT_MOVES,
            target_score: DEFAULT_TARGET_SCORE,
        }
    }
}

impl EngineConfig {
    /// Create from `CANDY_*` environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults; ranges are only
    /// checked by [`EngineConfig::validate`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|s| s.trim().parse().ok());

        Self {
            size: parsed("CANDY_BOARD_SIZE")
                .and_then(|v: u32| u8::try_from(v).ok())
                .unwrap_or(defaults.size),
            palette_size: parsed("CANDY_PALETTE_SIZE")
                .and_then(|v: u32| u8::try_from(v).ok())
                .unwrap_or(defaults.palette_size),
            seed: parsed("CANDY_SEED").or(defaults.seed),
            moves: parsed("CANDY_MOVES").unwrap_or(defaults.moves),
            target_score: parsed("CANDY_TARGET_SCORE").unwrap_or(defaults.target_score),
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        validate_dimensions(self.size, self.palette_size)?;
        if self.moves == 0 {
            return Err(EngineError::InvalidConfig("moves must be at least 1".into()));
        }
        Ok(())
    }
}
