//! Scoring module - match and color-bomb points
//!
//! The base law is flat: every candy removed by a match is worth
//! [`POINTS_PER_CANDY`], in every cascade round alike. Color-bombs pay per
//! candy wiped plus a flat bonus. All arithmetic saturates so the score can
//! only grow.

use crate::types::{BOMB_BONUS, BOMB_POINTS_PER_CANDY, POINTS_PER_CANDY};

/// Points for one resolution pass that matched `count` distinct cells
pub fn match_points(count: usize) -> u32 {
    clamp(count).saturating_mul(POINTS_PER_CANDY)
}

/// Points for a color-bomb that wiped `count` candies.
///
/// A bomb that finds nothing to clear scores nothing, bonus included.
pub fn color_bomb_points(count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    clamp(count)
        .saturating_mul(BOMB_POINTS_PER_CANDY)
        .saturating_add(BOMB_BONUS)
}

fn clamp(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
