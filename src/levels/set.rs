//! Set: game → set.
//!
//! Player one serves the first game and service alternates, so player one
//! serves whenever the number of games played is even. Six games with a
//! two-game margin win the set; at 6-6 the set is decided by a tie-break
//! whose win probability is supplied as a parameter.

use crate::chain::{split, ChainLevel, MarkovChain, Rule};
use crate::error::Result;

/// Number of set states (39 scores plus SETv1 and SETv2).
pub const SET_STATES: usize = 41;

/// Parameter index: player one holds serve.
pub const HOLD1: usize = 0;
/// Parameter index: player two holds serve.
pub const HOLD2: usize = 1;
/// Parameter index: player one wins the 6-6 tie-break.
pub const TIE1: usize = 2;

/// The set level.
#[derive(Clone, Copy, Debug, Default)]
pub struct Set;

impl ChainLevel<SET_STATES> for Set {
    const NAME: &'static str = "set";
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
    ];
    const START: &'static str = "0-0";
    const ABSORBING: [&'static str; 2] = ["SETv1", "SETv2"];
    const PARAMETERS: &'static [&'static str] = &["hold1", "hold2", "tie1"];
    // `win` is the server holding; at 6-6 it is player one taking the tie-break.
    const RULES: &'static [Rule] = &[
        split("0-0", HOLD1, "1-0", "0-1"),
        split("0-1", HOLD2, "0-2", "1-1"),
        split("1-0", HOLD2, "1-1", "2-0"),
        split("1-1", HOLD1, "2-1", "1-2"),
        split("2-0", HOLD1, "3-0", "2-1"),
        split("0-2", HOLD1, "1-2", "0-3"),
        split("3-0", HOLD2, "3-1", "4-0"),
        split("2-1", HOLD2, "2-2", "3-1"),
        split("1-2", HOLD2, "1-3", "2-2"),
        split("0-3", HOLD2, "0-4", "1-3"),
        split("4-0", HOLD1, "5-0", "4-1"),
        split("3-1", HOLD1, "4-1", "3-2"),
        split("2-2", HOLD1, "3-2", "2-3"),
        split("1-3", HOLD1, "2-3", "1-4"),
        split("0-4", HOLD1, "1-4", "0-5"),
        split("5-0", HOLD2, "5-1", "SETv1"),
        split("4-1", HOLD2, "4-2", "5-1"),
        split("3-2", HOLD2, "3-3", "4-2"),
        split("2-3", HOLD2, "2-4", "3-3"),
        split("1-4", HOLD2, "1-5", "2-4"),
        split("0-5", HOLD2, "SETv2", "1-5"),
        split("5-1", HOLD1, "SETv1", "5-2"),
        split("4-2", HOLD1, "5-2", "4-3"),
        split("3-3", HOLD1, "4-3", "3-4"),
        split("2-4", HOLD1, "3-4", "2-5"),
        split("1-5", HOLD1, "2-5", "SETv2"),
        split("5-2", HOLD2, "5-3", "SETv1"),
        split("4-3", HOLD2, "4-4", "5-3"),
        split("3-4", HOLD2, "3-5", "4-4"),
        split("2-5", HOLD2, "SETv2", "3-5"),
        split("5-3", HOLD1, "SETv1", "5-4"),
        split("4-4", HOLD1, "5-4", "4-5"),
        split("3-5", HOLD1, "4-5", "SETv2"),
        split("5-4", HOLD2, "5-5", "SETv1"),
        split("4-5", HOLD2, "SETv2", "5-5"),
        split("5-5", HOLD1, "6-5", "5-6"),
        split("6-5", HOLD2, "6-6", "SETv1"),
        split("5-6", HOLD2, "SETv2", "6-6"),
        split("6-6", TIE1, "SETv1", "SETv2"),
    ];
    const ABSORPTION_POWER: u32 = 100;
}

/// A set compiled for both hold probabilities and the tie-break probability.
pub type SetChain = MarkovChain<Set, SET_STATES>;

impl MarkovChain<Set, SET_STATES> {
    /// Validated set chain.
    pub fn set(hold1: f64, hold2: f64, tie1: f64) -> Result<Self> {
        Self::build(&[hold1, hold2, tie1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::check_topology;

    #[test]
    fn test_set_topology() {
        assert_eq!(check_topology::<Set, SET_STATES>(), Ok(()));
    }

    #[test]
    fn test_server_alternates_by_game_count() {
        for rule in Set::RULES {
            if let Rule::Split { from, param, .. } = *rule {
                if from == "6-6" {
                    assert_eq!(param, TIE1);
                    continue;
                }
                let (a, b) = from.split_once('-').unwrap();
                let games: u32 = a.parse::<u32>().unwrap() + b.parse::<u32>().unwrap();
                let expected = if games % 2 == 0 { HOLD1 } else { HOLD2 };
                assert_eq!(param, expected, "wrong server at {}", from);
            }
        }
    }

    #[test]
    fn test_six_all_routes_to_absorbing_states() {
        let chain = SetChain::set(0.8, 0.7, 0.55).unwrap();
        let m = chain.matrix();
        let six_all = chain.state_index("6-6").unwrap();
        let [v1, v2] = chain.absorbing_states();
        assert_eq!(m.get(six_all, v1), 0.55);
        assert!((m.get(six_all, v2) - 0.45).abs() < 1e-12);
        assert_eq!(m.get(six_all, six_all), 0.0);
    }
}
