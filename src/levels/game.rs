//! Service game: point → game.
//!
//! One server, one parameter: the probability the server wins any given
//! point. Deuce and advantage fold back onto "30-30(DEUCE)", "40-30(A-40)"
//! and "30-40(40-A)", so the table is finite but cyclic.

use crate::chain::{split, ChainLevel, MarkovChain, Rule};
use crate::error::Result;

/// Number of game states (15 scores plus HOLD and BREAK).
pub const GAME_STATES: usize = 17;

/// Parameter index: server wins the point.
pub const SERVER: usize = 0;

/// The service-game level.
#[derive(Clone, Copy, Debug, Default)]
pub struct Game;

impl ChainLevel<GAME_STATES> for Game {
    const NAME: &'static str = "game";
    const STATES: &'static [&'static str] = &[
        "0-0", "0-15", "15-0", "15-15",
        "30-0", "0-30", "40-0", "30-15",
        "15-30", "0-40", "40-15", "15-40",
        "30-30(DEUCE)", "40-30(A-40)", "30-40(40-A)",
        "HOLD", "BREAK",
    ];
    const START: &'static str = "0-0";
    const ABSORBING: [&'static str; 2] = ["HOLD", "BREAK"];
    const PARAMETERS: &'static [&'static str] = &["point_win_server"];
    const RULES: &'static [Rule] = &[
        split("0-0", SERVER, "15-0", "0-15"),
        split("0-15", SERVER, "15-15", "0-30"),
        split("15-0", SERVER, "30-0", "15-15"),
        split("15-15", SERVER, "30-15", "15-30"),
        split("30-0", SERVER, "40-0", "30-15"),
        split("0-30", SERVER, "15-30", "0-40"),
        split("40-0", SERVER, "HOLD", "40-15"),
        split("30-15", SERVER, "40-15", "30-30(DEUCE)"),
        split("15-30", SERVER, "30-30(DEUCE)", "15-40"),
        split("0-40", SERVER, "15-40", "BREAK"),
        split("40-15", SERVER, "HOLD", "40-30(A-40)"),
        split("15-40", SERVER, "30-40(40-A)", "BREAK"),
        split("30-30(DEUCE)", SERVER, "40-30(A-40)", "30-40(40-A)"),
        split("40-30(A-40)", SERVER, "HOLD", "30-30(DEUCE)"),
        split("30-40(40-A)", SERVER, "30-30(DEUCE)", "BREAK"),
    ];
    const ABSORPTION_POWER: u32 = 10_000;
}

/// A service game compiled for one server.
pub type GameChain = MarkovChain<Game, GAME_STATES>;

impl MarkovChain<Game, GAME_STATES> {
    /// Validated game chain for a server winning each point with `point_win`.
    pub fn service_game(point_win: f64) -> Result<Self> {
        Self::build(&[point_win])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::check_topology;

    #[test]
    fn test_game_topology() {
        assert_eq!(check_topology::<Game, GAME_STATES>(), Ok(()));
    }

    #[test]
    fn test_deuce_loops_back() {
        let chain = GameChain::service_game(0.6).unwrap();
        let adv_in = chain.state_index("40-30(A-40)").unwrap();
        let deuce = chain.state_index("30-30(DEUCE)").unwrap();
        assert!((chain.matrix().get(adv_in, deuce) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_certain_server_rows_are_degenerate() {
        let chain = GameChain::service_game(1.0).unwrap();
        let start = chain.state_index("0-0").unwrap();
        let fifteen = chain.state_index("15-0").unwrap();
        assert_eq!(chain.matrix().get(start, fifteen), 1.0);
        assert_eq!(chain.matrix().row_sum(start), 1.0);
    }
}
