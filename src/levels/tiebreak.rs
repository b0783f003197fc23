//! Tie-break: point → tie-break at six games all.
//!
//! Player one serves the first point, then each player serves two points in
//! turn: point `t` (0-based) is served by player one when `⌊(t + 1) / 2⌋` is
//! even. First to seven points with a two-point margin wins.
//!
//! # Folding beyond 7-7
//!
//! The state graph stops at 7-7. Winning a point from 7-7 leads back to 6-5
//! or 5-6 rather than to 8-7 or 7-8. Those pairs share both the point margin
//! and the next server (point 15 and point 11 are both served by player one),
//! so the fold is exact: the truncated table gives the same absorption
//! probabilities as an unbounded first-to-two-ahead race.

use crate::chain::{split, ChainLevel, MarkovChain, Rule};
use crate::error::Result;

/// Number of tie-break states (52 scores plus SETv1 and SETv2).
pub const TIEBREAK_STATES: usize = 54;

/// Parameter index: player one wins a point on their own serve.
pub const SRV1: usize = 0;
/// Parameter index: player two wins a point on their own serve.
pub const SRV2: usize = 1;

/// The tie-break level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TieBreak;

impl ChainLevel<TIEBREAK_STATES> for TieBreak {
    const NAME: &'static str = "tie-break";
    const STATES: &'static [&'static str] = &[
        "0-0", "0-1", "1-0", "1-1",
        "2-0", "0-2", "3-0", "2-1",
        "1-2", "0-3", "4-0", "3-1",
        "2-2", "1-3", "0-4", "5-0",
        "4-1", "3-2", "2-3", "1-4",
        "0-5", "5-1", "4-2", "3-3",
        "2-4", "1-5", "5-2", "4-3", "3-4",
        "2-5", "5-3", "4-4", "3-5", "5-4",
        "4-5", "5-5", "6-5", "5-6",
        "6-6",
        "SETv1", "SETv2",
        "6-0", "6-1", "6-2", "6-3", "6-4",
        "4-6", "3-6", "2-6", "1-6", "0-6",
        "7-7", "7-6", "6-7",
    ];
    const START: &'static str = "0-0";
    const ABSORBING: [&'static str; 2] = ["SETv1", "SETv2"];
    const PARAMETERS: &'static [&'static str] = &["point_win_srv1", "point_win_srv2"];
    // `win` is the serving player's point.
    const RULES: &'static [Rule] = &[
        split("0-0", SRV1, "1-0", "0-1"),
        split("0-1", SRV2, "0-2", "1-1"),
        split("1-0", SRV2, "1-1", "2-0"),
        split("1-1", SRV2, "1-2", "2-1"),
        split("2-0", SRV2, "2-1", "3-0"),
        split("0-2", SRV2, "0-3", "1-2"),
        split("3-0", SRV1, "4-0", "3-1"),
        split("2-1", SRV1, "3-1", "2-2"),
        split("1-2", SRV1, "2-2", "1-3"),
        split("0-3", SRV1, "1-3", "0-4"),
        split("4-0", SRV1, "5-0", "4-1"),
        split("3-1", SRV1, "4-1", "3-2"),
        split("2-2", SRV1, "3-2", "2-3"),
        split("1-3", SRV1, "2-3", "1-4"),
        split("0-4", SRV1, "1-4", "0-5"),
        split("5-0", SRV2, "5-1", "6-0"),
        split("4-1", SRV2, "4-2", "5-1"),
        split("3-2", SRV2, "3-3", "4-2"),
        split("2-3", SRV2, "2-4", "3-3"),
        split("1-4", SRV2, "1-5", "2-4"),
        split("0-5", SRV2, "0-6", "1-5"),
        split("5-1", SRV2, "5-2", "6-1"),
        split("4-2", SRV2, "4-3", "5-2"),
        split("3-3", SRV2, "3-4", "4-3"),
        split("2-4", SRV2, "2-5", "3-4"),
        split("1-5", SRV2, "1-6", "2-5"),
        split("5-2", SRV1, "6-2", "5-3"),
        split("4-3", SRV1, "5-3", "4-4"),
        split("3-4", SRV1, "4-4", "3-5"),
        split("2-5", SRV1, "3-5", "2-6"),
        split("5-3", SRV1, "6-3", "5-4"),
        split("4-4", SRV1, "5-4", "4-5"),
        split("3-5", SRV1, "4-5", "3-6"),
        split("5-4", SRV2, "5-5", "6-4"),
        split("4-5", SRV2, "4-6", "5-5"),
        split("5-5", SRV2, "5-6", "6-5"),
        split("6-5", SRV1, "SETv1", "6-6"),
        split("5-6", SRV1, "6-6", "SETv2"),
        split("6-6", SRV1, "7-6", "6-7"),
        split("6-0", SRV2, "6-1", "SETv1"),
        split("6-1", SRV1, "SETv1", "6-2"),
        split("6-2", SRV1, "SETv1", "6-3"),
        split("6-3", SRV2, "6-4", "SETv1"),
        split("6-4", SRV2, "6-5", "SETv1"),
        split("4-6", SRV2, "SETv2", "5-6"),
        split("3-6", SRV2, "SETv2", "4-6"),
        split("2-6", SRV1, "3-6", "SETv2"),
        split("1-6", SRV1, "2-6", "SETv2"),
        split("0-6", SRV2, "SETv2", "1-6"),
        split("7-7", SRV2, "5-6", "6-5"),
        split("7-6", SRV2, "7-7", "SETv1"),
        split("6-7", SRV2, "SETv2", "7-7"),
    ];
    const ABSORPTION_POWER: u32 = 1_000;
}

/// A tie-break compiled for both players' serve point-win probabilities.
pub type TieBreakChain = MarkovChain<TieBreak, TIEBREAK_STATES>;

impl MarkovChain<TieBreak, TIEBREAK_STATES> {
    /// Validated tie-break chain.
    pub fn tie_break(point_win_srv1: f64, point_win_srv2: f64) -> Result<Self> {
        Self::build(&[point_win_srv1, point_win_srv2])
    }
}
