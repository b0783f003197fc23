//! Best-of-three match: set → match.
//!
//! A single parameter, player one's probability of winning a set. Two sets
//! win; "2-0", "2-1", "0-2" and "1-2" step to V1/V2 with certainty.

use crate::chain::{forced, split, ChainLevel, MarkovChain, Rule};
use crate::error::Result;

/// Number of match states (8 set scores plus V1 and V2).
pub const MATCH_STATES: usize = 10;

/// Parameter index: player one wins a set.
pub const SET1: usize = 0;

/// The best-of-three match level.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchPlay;

impl ChainLevel<MATCH_STATES> for MatchPlay {
    const NAME: &'static str = "match";
    const STATES: &'static [&'static str] = &[
        "0-0", "0-1", "1-0", "1-1", "2-0", "0-2", "2-1", "1-2", "V1", "V2",
    ];
    const START: &'static str = "0-0";
    const ABSORBING: [&'static str; 2] = ["V1", "V2"];
    const PARAMETERS: &'static [&'static str] = &["set_win1"];
    const RULES: &'static [Rule] = &[
        split("0-0", SET1, "1-0", "0-1"),
        split("1-0", SET1, "2-0", "1-1"),
        split("0-1", SET1, "1-1", "0-2"),
        split("1-1", SET1, "2-1", "1-2"),
        forced("2-0", "V1"),
        forced("2-1", "V1"),
        forced("0-2", "V2"),
        forced("1-2", "V2"),
    ];
    const ABSORPTION_POWER: u32 = 5;
}

/// A match compiled for player one's set-win probability.
pub type MatchChain = MarkovChain<MatchPlay, MATCH_STATES>;

impl MarkovChain<MatchPlay, MATCH_STATES> {
    /// Validated best-of-three match chain.
    pub fn best_of_three(set_win1: f64) -> Result<Self> {
        Self::build(&[set_win1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::check_topology;

    #[test]
    fn test_match_topology() {
        assert_eq!(check_topology::<MatchPlay, MATCH_STATES>(), Ok(()));
    }

    #[test]
    fn test_finished_scores_step_to_victory() {
        let chain = MatchChain::best_of_three(0.3).unwrap();
        let [v1, v2] = chain.absorbing_states();
        for (score, winner) in [("2-0", v1), ("2-1", v1), ("0-2", v2), ("1-2", v2)] {
            let i = chain.state_index(score).unwrap();
            assert_eq!(chain.matrix().get(i, winner), 1.0, "{}", score);
        }
    }
}
