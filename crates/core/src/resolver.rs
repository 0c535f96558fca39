//! Resolver - detect, score, clear and cascade until the board settles
//!
//! A [`Cascade`] is a small state machine over one board:
//!
//! ```text
//! Detect --matches--> Clear --> Refill --> Detect ... --none--> Done
//! ```
//!
//! Every call to [`Cascade::step`] performs exactly one transition and returns
//! the matching [`CascadeEvent`]. The gaps between steps are where a
//! presentation layer animates; the board is never left half-updated within a
//! step. Hosts that do not animate call [`Cascade::run_to_end`].

use serde::Serialize;
use tracing::{trace, warn};

use crate::board::Board;
use crate::matcher::{find_matches, MatchSet};
use crate::rng::RandomSource;
use crate::scoring::match_points;
use crate::types::Pos;

/// One observable phase of a cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CascadeEvent {
    /// Cells matched in this round and the points they earned
    Matched {
        round: u32,
        cells: Vec<Pos>,
        points: u32,
    },
    /// Matched cells were emptied
    Cleared { round: u32, count: u32 },
    /// Gravity and refill ran
    Refilled { round: u32, changed: bool },
    /// Nothing left to match
    Settled(CascadeSummary),
}

/// Totals for a finished (or running) cascade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CascadeSummary {
    /// Rounds that produced at least one match
    pub rounds: u32,
    /// Candies cleared across all rounds
    pub cleared: u32,
    /// Points awarded across all rounds
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Stage {
    Detect,
    Clear(MatchSet),
    Refill,
    Done,
}

/// Resolution state for one swap or effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cascade {
    stage: Stage,
    round: u32,
    summary: CascadeSummary,
}

impl Cascade {
    /// Start with a detection pass
    pub fn new() -> Self {
        Self {
            stage: Stage::Detect,
            round: 0,
            summary: CascadeSummary::default(),
        }
    }

    /// Start with gravity/refill, for callers that already emptied cells
    pub fn after_clear() -> Self {
        Self {
            stage: Stage::Refill,
            ..Self::new()
        }
    }

    pub fn is_done(&self) -> bool {
        self.stage == Stage::Done
    }

    pub fn summary(&self) -> CascadeSummary {
        self.summary
    }

    /// Advance one phase.
    ///
    /// Once done, keeps returning `Settled` without touching the board.
    pub fn step<R: RandomSource + ?Sized>(&mut self, board: &mut Board, rng: &mut R) -> CascadeEvent {
        match std::mem::replace(&mut self.stage, Stage::Done) {
            Stage::Detect => {
                let matches = find_matches(board);
                if matches.is_empty() {
                    trace!(rounds = self.summary.rounds, "board settled");
                    return CascadeEvent::Settled(self.summary);
                }

                let limit = round_limit(board);
                if self.round >= limit.saturating_mul(2) {
                    warn!(round = self.round, "cascade cut short with runs left on the board");
                    return CascadeEvent::Settled(self.summary);
                }

                self.round += 1;
                let points = match_points(matches.len());
                self.summary.rounds = self.round;
                self.summary.cleared = self.summary.cleared.saturating_add(matches.len() as u32);
                self.summary.points = self.summary.points.saturating_add(points);

                if self.round == limit {
                    warn!(round = self.round, "cascade is unusually long, refilling without runs");
                }

                trace!(round = self.round, runs = matches.runs().len(), cells = matches.len(), points, "matched");
                let cells = matches.positions().to_vec();
                self.stage = Stage::Clear(matches);
                CascadeEvent::Matched {
                    round: self.round,
                    cells,
                    points,
                }
            }
            Stage::Clear(matches) => {
                let count = board.clear(matches.positions());
                self.stage = Stage::Refill;
                CascadeEvent::Cleared {
                    round: self.round,
                    count,
                }
            }
            Stage::Refill => {
                let changed = if self.round >= round_limit(board) {
                    board.refill_without_runs(rng)
                } else {
                    board.apply_gravity_and_refill(rng)
                };
                // Nothing moved means nothing new to match.
                self.stage = if changed { Stage::Detect } else { Stage::Done };
                CascadeEvent::Refilled {
                    round: self.round,
                    changed,
                }
            }
            Stage::Done => CascadeEvent::Settled(self.summary),
        }
    }

    /// Step until settled and return the totals.
    pub fn run_to_end<R: RandomSource + ?Sized>(&mut self, board: &mut Board, rng: &mut R) -> CascadeSummary {
        loop {
            if let CascadeEvent::Settled(summary) = self.step(board, rng) {
                return summary;
            }
        }
    }
}

/// Rounds after which refills stop creating runs. Twice this many ends the
/// cascade outright, which only a palette too small to avoid runs can reach.
fn round_limit(board: &Board) -> u32 {
    u32::from(board.size()) * u32::from(board.size())
}

impl Default for Cascade {
    fn default() -> Self {
        Self::new()
    }
}

/// One detect-and-resolve pass: match, score, clear, refill.
///
/// Returns None when the board was already settled.
pub fn resolve_once<R: RandomSource + ?Sized>(board: &mut Board, rng: &mut R) -> Option<CascadeSummary> {
    let matches = find_matches(board);
    if matches.is_empty() {
        return None;
    }
    let cleared = board.clear(matches.positions());
    board.apply_gravity_and_refill(rng);
    Some(CascadeSummary {
        rounds: 1,
        cleared,
        points: match_points(matches.len()),
    })
}

/// Resolve repeatedly until the board is settled.
pub fn resolve_to_settled<R: RandomSource + ?Sized>(board: &mut Board, rng: &mut R) -> CascadeSummary {
    Cascade::new().run_to_end(board, rng)
}
