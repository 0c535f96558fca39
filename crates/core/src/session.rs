//! Level session - move budget and target score around an engine
//!
//! The engine never charges moves itself. A [`Level`] does: every swap the
//! engine accepts costs one move, rejected swaps and effects are free. The
//! level is won as soon as the score reaches the target and lost when the
//! budget runs out first. Either way no further swaps or effects are taken.

use serde::Serialize;
use tracing::info;

use crate::config::EngineConfig;
use crate::engine::{
    AutoMovesOutcome, ColorBombOutcome, Engine, EngineEvent, SwapOutcome, SwapStart,
};
use crate::error::EngineError;
use crate::rng::{RandomSource, SimpleRng};
use crate::snapshot::BoardSnapshot;
use crate::types::{Candy, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelStatus {
    Playing,
    Won,
    OutOfMoves,
}

/// Budget and goal of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    pub moves: u32,
    pub target_score: u32,
}

impl From<&EngineConfig> for LevelConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            moves: config.moves,
            target_score: config.target_score,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Level<R: RandomSource = SimpleRng> {
    engine: Engine<R>,
    config: LevelConfig,
    moves_left: u32,
    status: LevelStatus,
}

impl Level<SimpleRng> {
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let engine = Engine::from_config(config)?;
        Ok(Self::new(engine, LevelConfig::from(config)))
    }
}

impl<R: RandomSource> Level<R> {
    pub fn new(engine: Engine<R>, config: LevelConfig) -> Self {
        let mut level = Self {
            engine,
            config,
            moves_left: config.moves,
            status: LevelStatus::Playing,
        };
        level.update_status();
        level
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    pub fn config(&self) -> LevelConfig {
        self.config
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn status(&self) -> LevelStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.engine.score()
    }

    pub fn is_playing(&self) -> bool {
        self.status == LevelStatus::Playing
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.engine.snapshot()
    }

    pub fn hint(&self) -> Option<(Pos, Pos)> {
        self.engine.hint()
    }

    /// Start a player swap. An accepted swap is charged immediately.
    pub fn begin_swap(&mut self, from: Pos, to: Pos) -> Result<SwapStart, EngineError> {
        self.ensure_playing()?;
        let start = self.engine.begin_swap(from, to)?;
        if start == SwapStart::Accepted {
            self.moves_left = self.moves_left.saturating_sub(1);
        }
        Ok(start)
    }

    pub fn begin_color_bomb(&mut self, target: Option<Candy>) -> Result<(), EngineError> {
        self.ensure_playing()?;
        self.engine.begin_color_bomb(target)
    }

    pub fn begin_automatic_moves(&mut self, count: u32) -> Result<(), EngineError> {
        self.ensure_playing()?;
        self.engine.begin_automatic_moves(count)
    }

    /// Step the engine; the status is re-evaluated once the operation ends.
    pub fn step(&mut self) -> Option<EngineEvent> {
        let event = self.engine.step()?;
        if matches!(event, EngineEvent::Finished(_)) {
            self.update_status();
        }
        Some(event)
    }

    pub fn propose_swap(&mut self, from: Pos, to: Pos) -> Result<SwapOutcome, EngineError> {
        self.ensure_playing()?;
        let outcome = self.engine.propose_swap(from, to)?;
        if outcome.move_consumed {
            self.moves_left = self.moves_left.saturating_sub(1);
        }
        self.update_status();
        Ok(outcome)
    }

    pub fn trigger_color_bomb(&mut self, target: Option<Candy>) -> Result<ColorBombOutcome, EngineError> {
        self.ensure_playing()?;
        let outcome = self.engine.trigger_color_bomb(target)?;
        self.update_status();
        Ok(outcome)
    }

    pub fn run_automatic_moves(&mut self, count: u32) -> Result<AutoMovesOutcome, EngineError> {
        self.ensure_playing()?;
        let outcome = self.engine.run_automatic_moves(count)?;
        self.update_status();
        Ok(outcome)
    }

    fn ensure_playing(&self) -> Result<(), EngineError> {
        if self.is_playing() {
            Ok(())
        } else {
            Err(EngineError::LevelOver)
        }
    }

    fn update_status(&mut self) {
        if self.status != LevelStatus::Playing || self.engine.is_busy() {
            return;
        }
        let next = if self.engine.score() >= self.config.target_score {
            LevelStatus::Won
        } else if self.moves_left == 0 {
            LevelStatus::OutOfMoves
        } else {
            LevelStatus::Playing
        };
        if next != LevelStatus::Playing {
            info!(
                status = ?next,
                score = self.engine.score(),
                moves_left = self.moves_left,
                "level over"
            );
        }
        self.status = next;
    }
}
