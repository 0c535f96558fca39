//! Engine module - move validation, effects and the resolution state machine
//!
//! This module ties together the board, the resolver and the effects queries.
//! Every operation follows the same life cycle:
//!
//! ```text
//! Idle -> Validating -> Resolving(round 1..n) -> Idle
//! ```
//!
//! Operations are started with `begin_*` and advanced with [`Engine::step`],
//! one phase per call, so a presentation layer can pause between phases to
//! animate. While an operation is in flight every other `begin_*` (and every
//! synchronous wrapper) fails with [`EngineError::Busy`]. The synchronous
//! calls [`Engine::propose_swap`], [`Engine::trigger_color_bomb`] and
//! [`Engine::run_automatic_moves`] simply begin and step to completion.

use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::effects::{find_matching_swap, matching_swaps, most_frequent_candy, swap_candidates};
use crate::error::EngineError;
use crate::matcher::find_matches;
use crate::resolver::{Cascade, CascadeEvent};
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::color_bomb_points;
use crate::snapshot::BoardSnapshot;
use crate::types::{Candy, Pos};

/// Where the engine is in its life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    /// A swap is being checked (or an automatic move is looking for one)
    Validating,
    /// Cascade round `round` is being resolved (0 before the first match)
    Resolving { round: u32 },
}

/// Why a proposed swap was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapRejection {
    OutOfBounds,
    NotAdjacent,
    NoMatch,
}

impl SwapRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapRejection::OutOfBounds => "out of bounds",
            SwapRejection::NotAdjacent => "cells are not adjacent",
            SwapRejection::NoMatch => "swap does not make a match",
        }
    }
}

impl fmt::Display for SwapRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`Engine::begin_swap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStart {
    /// The swap matched and a cascade is now in flight
    Accepted,
    /// Nothing changed
    Rejected(SwapRejection),
}

/// Which operation a report belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionKind {
    Swap,
    ColorBomb,
    AutoMoves,
}

/// Running totals of one operation, handed out with the final event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    pub kind: ResolutionKind,
    /// Candies cleared, color-bomb wipe included
    pub cleared: u32,
    /// Points added to the score, color-bomb bonus included
    pub score_delta: u32,
    /// Cascade rounds that matched something
    pub cascade_rounds: u32,
    /// Whether the host should charge a move for this operation
    pub move_consumed: bool,
    pub bomb_candy: Option<Candy>,
    pub bomb_cleared: u32,
    pub bomb_bonus: u32,
    pub auto_requested: u32,
    pub auto_executed: u32,
    pub auto_attempts: u32,
}

impl ResolutionReport {
    pub fn new(kind: ResolutionKind) -> Self {
        Self {
            kind,
            cleared: 0,
            score_delta: 0,
            cascade_rounds: 0,
            move_consumed: false,
            bomb_candy: None,
            bomb_cleared: 0,
            bomb_bonus: 0,
            auto_requested: 0,
            auto_executed: 0,
            auto_attempts: 0,
        }
    }
}

/// Everything the presentation layer may want to animate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    SwapApplied { from: Pos, to: Pos },
    /// The swap made no match and was undone
    SwapReverted { from: Pos, to: Pos },
    ColorBomb { candy: Candy, cells: Vec<Pos>, bonus: u32 },
    AutoMove { from: Pos, to: Pos, matched: bool },
    Cascade(CascadeEvent),
    /// Last event of every operation
    Finished(ResolutionReport),
}

/// Result of [`Engine::propose_swap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapOutcome {
    pub accepted: bool,
    /// Candies cleared across the whole cascade
    pub matched_count: u32,
    pub total_score_delta: u32,
    pub cascade_rounds: u32,
    pub move_consumed: bool,
    pub rejection: Option<SwapRejection>,
}

impl SwapOutcome {
    pub fn rejected(reason: SwapRejection) -> Self {
        Self {
            accepted: false,
            matched_count: 0,
            total_score_delta: 0,
            cascade_rounds: 0,
            move_consumed: false,
            rejection: Some(reason),
        }
    }
}

impl From<&ResolutionReport> for SwapOutcome {
    fn from(report: &ResolutionReport) -> Self {
        Self {
            accepted: true,
            matched_count: report.cleared,
            total_score_delta: report.score_delta,
            cascade_rounds: report.cascade_rounds,
            move_consumed: report.move_consumed,
            rejection: None,
        }
    }
}

/// Result of [`Engine::trigger_color_bomb`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorBombOutcome {
    /// None when the requested candy was not on the board
    pub candy: Option<Candy>,
    /// Candies wiped by the bomb itself
    pub cleared_count: u32,
    /// `cleared_count * 150 + 500`, before any cascade points
    pub bonus_score: u32,
    /// Candies cleared by the cascade that followed
    pub cascade_cleared: u32,
    pub total_score_delta: u32,
}

impl From<&ResolutionReport> for ColorBombOutcome {
    fn from(report: &ResolutionReport) -> Self {
        Self {
            candy: report.bomb_candy,
            cleared_count: report.bomb_cleared,
            bonus_score: report.bomb_bonus,
            cascade_cleared: report.cleared.saturating_sub(report.bomb_cleared),
            total_score_delta: report.score_delta,
        }
    }
}

/// Result of [`Engine::run_automatic_moves`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AutoMovesOutcome {
    pub requested: u32,
    /// Swaps that matched and were resolved
    pub executed: u32,
    /// Swaps tried, reverted ones included
    pub attempts: u32,
    pub total_score_delta: u32,
}

impl From<&ResolutionReport> for AutoMovesOutcome {
    fn from(report: &ResolutionReport) -> Self {
        Self {
            requested: report.auto_requested,
            executed: report.auto_executed,
            attempts: report.auto_attempts,
            total_score_delta: report.score_delta,
        }
    }
}

#[derive(Debug, Clone)]
enum Activity {
    Swap {
        cascade: Cascade,
    },
    ColorBomb {
        target: Option<Candy>,
        /// None until the wipe has happened
        cascade: Option<Cascade>,
    },
    AutoMoves {
        candidates: Vec<(Pos, Pos)>,
        /// The cascade of the move currently resolving
        cascade: Option<Cascade>,
        /// Consecutive reverted picks since the last executed move
        misses: u32,
    },
}

#[derive(Debug, Clone)]
struct Active {
    activity: Activity,
    report: ResolutionReport,
}

/// The match-3 simulation.
#[derive(Debug, Clone)]
pub struct Engine<R: RandomSource = SimpleRng> {
    board: Board,
    rng: R,
    seed: Option<u32>,
    score: u32,
    /// Accepted player swaps so far
    moves_consumed: u32,
    /// Bumped on every board mutation, for cheap change detection
    board_id: u32,
    phase: Phase,
    active: Option<Active>,
    /// Events of the most recent operation
    events: Vec<EngineEvent>,
}

impl Engine<SimpleRng> {
    /// Generate a fresh board. Without a seed the clock picks one.
    pub fn initialize(size: u8, palette: u8, seed: Option<u32>) -> Result<Self, EngineError> {
        let rng = seed.map(SimpleRng::new).unwrap_or_else(SimpleRng::from_clock);
        let seed = rng.seed();
        let mut engine = Self::with_rng(size, palette, rng)?;
        engine.seed = Some(seed);
        debug!(size, palette, seed, "engine initialized");
        Ok(engine)
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Self::initialize(config.size, config.palette_size, config.seed)
    }
}

impl<R: RandomSource> Engine<R> {
    /// Generate a fresh board with an injected random source.
    pub fn with_rng(size: u8, palette: u8, mut rng: R) -> Result<Self, EngineError> {
        let board = Board::generate(size, palette, &mut rng)?;
        Ok(Self::assemble(board, rng))
    }

    /// Start from a prepared board, which must be full and settled.
    pub fn from_board(board: Board, rng: R) -> Result<Self, EngineError> {
        if board.empty_count() > 0 {
            return Err(EngineError::InvalidConfig(
                "board must not contain empty cells".into(),
            ));
        }
        if !board.is_settled() {
            return Err(EngineError::UnsettledBoard);
        }
        Ok(Self::assemble(board, rng))
    }

    fn assemble(board: Board, rng: R) -> Self {
        Self {
            board,
            rng,
            seed: None,
            score: 0,
            moves_consumed: 0,
            board_id: 0,
            phase: Phase::Idle,
            active: None,
            events: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while any swap, color-bomb or automatic-move run is in flight
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub fn moves_consumed(&self) -> u32 {
        self.moves_consumed
    }

    pub fn board_id(&self) -> u32 {
        self.board_id
    }

    /// Seed of the built-in generator, when one was used
    pub fn seed(&self) -> Option<u32> {
        self.seed
    }

    /// Events emitted by the most recent operation, in order
    pub fn last_events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// A swap that would match right now. None while busy.
    pub fn hint(&self) -> Option<(Pos, Pos)> {
        if self.is_busy() {
            return None;
        }
        find_matching_swap(&self.board)
    }

    /// Read-only copy for rendering
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            size: self.board.size(),
            palette: self.board.palette(),
            rows: self.board.rows().map(|row| row.to_vec()).collect(),
            score: self.score,
            moves_consumed: self.moves_consumed,
            board_id: self.board_id,
            phase: self.phase,
            busy: self.is_busy(),
            moves_available: self.hint().is_some(),
            seed: self.seed,
        }
    }

    /// Validate a player swap and, if it matches, start resolving it.
    pub fn begin_swap(&mut self, from: Pos, to: Pos) -> Result<SwapStart, EngineError> {
        self.ensure_idle()?;
        self.events.clear();
        self.phase = Phase::Validating;

        let start = self.validate_swap(from, to);
        match start {
            SwapStart::Accepted => {
                let mut report = ResolutionReport::new(ResolutionKind::Swap);
                report.move_consumed = true;
                self.moves_consumed = self.moves_consumed.saturating_add(1);
                self.phase = Phase::Resolving { round: 0 };
                self.active = Some(Active {
                    activity: Activity::Swap {
                        cascade: Cascade::new(),
                    },
                    report,
                });
                debug!(?from, ?to, "swap accepted");
            }
            SwapStart::Rejected(reason) => {
                self.phase = Phase::Idle;
                debug!(?from, ?to, %reason, "swap rejected");
            }
        }
        Ok(start)
    }

    /// Start a color-bomb on `target`, or on the most common candy.
    pub fn begin_color_bomb(&mut self, target: Option<Candy>) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.events.clear();
        self.phase = Phase::Resolving { round: 0 };
        self.active = Some(Active {
            activity: Activity::ColorBomb {
                target,
                cascade: None,
            },
            report: ResolutionReport::new(ResolutionKind::ColorBomb),
        });
        debug!(?target, "color-bomb started");
        Ok(())
    }

    /// Start a run of `count` automatic moves. They never charge the move
    /// budget.
    pub fn begin_automatic_moves(&mut self, count: u32) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.events.clear();
        self.phase = Phase::Validating;
        let mut report = ResolutionReport::new(ResolutionKind::AutoMoves);
        report.auto_requested = count;
        self.active = Some(Active {
            activity: Activity::AutoMoves {
                candidates: swap_candidates(self.board.size()),
                cascade: None,
                misses: 0,
            },
            report,
        });
        debug!(count, "automatic moves started");
        Ok(())
    }

    /// Advance the operation in flight by one phase.
    ///
    /// Returns None when idle. The last event of each operation is
    /// [`EngineEvent::Finished`]; after it the engine is idle again.
    pub fn step(&mut self) -> Option<EngineEvent> {
        let mut active = self.active.take()?;
        let Active { activity, report } = &mut active;

        let next = match activity {
            Activity::Swap { cascade } => self.step_cascade(cascade, report),
            Activity::ColorBomb { target, cascade } => match cascade {
                Some(running) => self.step_cascade(running, report),
                None => self.detonate(*target, cascade, report),
            },
            Activity::AutoMoves {
                candidates,
                cascade,
                misses,
            } => self.step_automatic(candidates, cascade, misses, report),
        };

        let event = match next {
            Some(event) => {
                self.active = Some(active);
                event
            }
            None => {
                self.phase = Phase::Idle;
                let report = active.report;
                debug!(
                    kind = ?report.kind,
                    cleared = report.cleared,
                    score_delta = report.score_delta,
                    rounds = report.cascade_rounds,
                    "operation finished"
                );
                EngineEvent::Finished(report)
            }
        };
        Some(self.record(event))
    }

    /// Step until idle. Returns the final report, or None if nothing was in
    /// flight.
    pub fn run_until_idle(&mut self) -> Option<ResolutionReport> {
        let mut finished = None;
        while let Some(event) = self.step() {
            if let EngineEvent::Finished(report) = event {
                finished = Some(report);
            }
        }
        finished
    }

    /// Swap two adjacent cells and resolve the result to a settled board.
    #[instrument(level = "debug", skip(self))]
    pub fn propose_swap(&mut self, from: Pos, to: Pos) -> Result<SwapOutcome, EngineError> {
        match self.begin_swap(from, to)? {
            SwapStart::Rejected(reason) => Ok(SwapOutcome::rejected(reason)),
            SwapStart::Accepted => Ok(SwapOutcome::from(&self.finish(ResolutionKind::Swap))),
        }
    }

    /// Wipe every candy of one type, then resolve to a settled board.
    #[instrument(level = "debug", skip(self))]
    pub fn trigger_color_bomb(&mut self, target: Option<Candy>) -> Result<ColorBombOutcome, EngineError> {
        self.begin_color_bomb(target)?;
        Ok(ColorBombOutcome::from(&self.finish(ResolutionKind::ColorBomb)))
    }

    /// Play up to `count` matching swaps picked at random.
    ///
    /// Best effort: stops early if the board has no matching swap left.
    #[instrument(level = "debug", skip(self))]
    pub fn run_automatic_moves(&mut self, count: u32) -> Result<AutoMovesOutcome, EngineError> {
        self.begin_automatic_moves(count)?;
        Ok(AutoMovesOutcome::from(&self.finish(ResolutionKind::AutoMoves)))
    }

    fn finish(&mut self, kind: ResolutionKind) -> ResolutionReport {
        self.run_until_idle()
            .unwrap_or_else(|| ResolutionReport::new(kind))
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.is_busy() {
            debug!(phase = ?self.phase, "request rejected while busy");
            return Err(EngineError::Busy);
        }
        Ok(())
    }

    fn record(&mut self, event: EngineEvent) -> EngineEvent {
        self.events.push(event.clone());
        event
    }

    fn bump_board(&mut self) {
        self.board_id = self.board_id.wrapping_add(1);
    }

    fn validate_swap(&mut self, from: Pos, to: Pos) -> SwapStart {
        if !self.board.contains(from) || !self.board.contains(to) {
            return SwapStart::Rejected(SwapRejection::OutOfBounds);
        }
        if !self.board.neighbors(from).contains(&to) {
            return SwapStart::Rejected(SwapRejection::NotAdjacent);
        }

        self.record(EngineEvent::SwapApplied { from, to });
        if self.swap_if_matching(from, to) {
            SwapStart::Accepted
        } else {
            self.record(EngineEvent::SwapReverted { from, to });
            SwapStart::Rejected(SwapRejection::NoMatch)
        }
    }

    /// Swap; keep it if it produced a match, otherwise put back the exact
    /// board from before.
    fn swap_if_matching(&mut self, from: Pos, to: Pos) -> bool {
        let Some(previous) = self.board.swap(from, to) else {
            return false;
        };
        if find_matches(&self.board).is_empty() {
            self.board = previous;
            return false;
        }
        self.bump_board();
        true
    }

    /// One cascade phase with score bookkeeping. None once settled.
    fn step_cascade(&mut self, cascade: &mut Cascade, report: &mut ResolutionReport) -> Option<EngineEvent> {
        if cascade.is_done() {
            return None;
        }

        let event = cascade.step(&mut self.board, &mut self.rng);
        match &event {
            CascadeEvent::Matched { round, cells, points } => {
                self.score = self.score.saturating_add(*points);
                report.score_delta = report.score_delta.saturating_add(*points);
                report.cleared = report.cleared.saturating_add(cells.len() as u32);
                report.cascade_rounds += 1;
                self.phase = Phase::Resolving { round: *round };
            }
            CascadeEvent::Cleared { .. } | CascadeEvent::Refilled { .. } => self.bump_board(),
            CascadeEvent::Settled(_) => {}
        }
        Some(EngineEvent::Cascade(event))
    }

    /// The color-bomb wipe itself. None if there was nothing to wipe.
    fn detonate(
        &mut self,
        target: Option<Candy>,
        cascade: &mut Option<Cascade>,
        report: &mut ResolutionReport,
    ) -> Option<EngineEvent> {
        let candy = target.or_else(|| most_frequent_candy(&self.board))?;
        let cells = self.board.positions_of(candy);
        if cells.is_empty() {
            debug!(?candy, "color-bomb target not on board");
            return None;
        }

        let cleared = self.board.clear(&cells);
        let bonus = color_bomb_points(cells.len());
        self.score = self.score.saturating_add(bonus);
        self.bump_board();

        report.bomb_candy = Some(candy);
        report.bomb_cleared = cleared;
        report.bomb_bonus = bonus;
        report.cleared = report.cleared.saturating_add(cleared);
        report.score_delta = report.score_delta.saturating_add(bonus);

        *cascade = Some(Cascade::after_clear());
        Some(EngineEvent::ColorBomb { candy, cells, bonus })
    }

    /// Drive the current automatic move's cascade, or pick the next move.
    ///
    /// Picks are uniform over all right/bottom candidates. Misses are reverted
    /// and retried; after as many misses in a row as there are candidates the
    /// pick is made among the matching swaps directly, so a board with any
    /// matching swap always makes progress.
    fn step_automatic(
        &mut self,
        candidates: &[(Pos, Pos)],
        cascade: &mut Option<Cascade>,
        misses: &mut u32,
        report: &mut ResolutionReport,
    ) -> Option<EngineEvent> {
        if let Some(running) = cascade.as_mut() {
            if let Some(event) = self.step_cascade(running, report) {
                return Some(event);
            }
        }
        if cascade.take().is_some() {
            report.auto_executed += 1;
        }

        if report.auto_executed >= report.auto_requested {
            return None;
        }
        if *misses == 0 && find_matching_swap(&self.board).is_none() {
            debug!(
                executed = report.auto_executed,
                requested = report.auto_requested,
                "no matching swap left, stopping automatic moves"
            );
            return None;
        }

        self.phase = Phase::Validating;
        let (from, to) = if (*misses as usize) < candidates.len() {
            candidates[self.rng.next_range(candidates.len() as u32) as usize]
        } else {
            let matching = matching_swaps(&self.board);
            *matching.get(self.rng.next_range(matching.len() as u32) as usize)?
        };

        report.auto_attempts += 1;
        let matched = self.swap_if_matching(from, to);
        if matched {
            *misses = 0;
            *cascade = Some(Cascade::new());
            self.phase = Phase::Resolving { round: 0 };
        } else {
            *misses += 1;
        }
        Some(EngineEvent::AutoMove { from, to, matched })
    }
}
