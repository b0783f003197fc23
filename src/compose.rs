/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Level composition: serve probabilities and a live score in, match-win
//! probability out.
//!
//! ```text
//! point_win_srv1 ──► Game ──► hold1 ─┐
//! point_win_srv2 ──► Game ──► hold2 ─┼─► Set ──► set1 ──► Match ──► V1 / V2
//!    both        ──► TieBreak ► tie1 ┘
//! ```
//!
//! The four scalars `hold1`, `hold2`, `tie1`, `set1` are the only information
//! that crosses a level boundary.
//!
//! # Resuming mid-match
//!
//! [`Composer::forecast`] plays out the rest of the current set from the given
//! game score, then injects that set's outcome as the two transitions out of
//! the current match state. The match chain starts with all its mass on that
//! state; the sets already completed are not re-derived.

use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use crate::absorb::{Absorber, RESIDUAL_WARNING};
use crate::chain::{ChainLevel, MarkovChain, Outcome};
use crate::error::{ChainError, Result};
use crate::levels::{GameChain, MatchChain, SetChain, TieBreakChain};

// ─── SetScore ────────────────────────────────────────────────────────────────

/// Sets won so far in a best-of-three match (player one first).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetScore {
    /// 0-0: first set in progress.
    ZeroZero,
    /// 1-0: second set, player one leads.
    OneZero,
    /// 0-1: second set, player two leads.
    ZeroOne,
    /// 1-1: deciding set.
    OneOne,
}

impl SetScore {
    /// All set scores from which play can still continue.
    pub const ALL: [SetScore; 4] = [Self::ZeroZero, Self::OneZero, Self::ZeroOne, Self::OneOne];

    /// Match-chain label of this score.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ZeroZero => "0-0",
            Self::OneZero => "1-0",
            Self::ZeroOne => "0-1",
            Self::OneOne => "1-1",
        }
    }

    /// Match-chain labels reached when player one / player two takes the
    /// set in progress.
    pub const fn successors(self) -> (&'static str, &'static str) {
        match self {
            Self::ZeroZero => ("1-0", "0-1"),
            Self::OneZero => ("2-0", "1-1"),
            Self::ZeroOne => ("1-1", "0-2"),
            Self::OneOne => ("2-1", "1-2"),
        }
    }
}

impl FromStr for SetScore {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|score| score.label() == s)
            .ok_or_else(|| ChainError::InvalidSetScore(s.to_string()))
    }
}

impl fmt::Display for SetScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// Scalars derived from the lower levels, each an absorption output.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelProbabilities {
    /// Player one holds serve.
    pub hold1: f64,
    /// Player two holds serve.
    pub hold2: f64,
    /// Player one wins a tie-break from 0-0.
    pub tie1: f64,
    /// Player one wins a set from 0-0.
    pub set1: f64,
}

/// Full result of a mid-match forecast.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchForecast {
    /// Derived per-level probabilities.
    pub levels: LevelProbabilities,
    /// Outcome of the set in progress from the current game score.
    pub current_set: Outcome,
    /// Outcome of the match (V1 / V2).
    pub outcome: Outcome,
}

impl MatchForecast {
    /// Probability player one wins the match.
    pub fn p_win_1(&self) -> f64 {
        self.outcome.first
    }

    /// Probability player two wins the match.
    pub fn p_win_2(&self) -> f64 {
        self.outcome.second
    }
}

// ─── Composer ────────────────────────────────────────────────────────────────

/// Chains the four levels together.
///
/// Every call rebuilds the chains it needs; nothing is cached between calls.
/// A level that leaves more than [`RESIDUAL_WARNING`] unabsorbed fails with
/// [`ChainError::NoAbsorbingPath`] instead of passing a truncated result up.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Composer {
    /// Absorption configuration used at every level.
    pub absorber: Absorber,
}

impl Composer {
    /// Composer using `absorber` at every level.
    pub fn new(absorber: Absorber) -> Self {
        Self { absorber }
    }

    /// Absorb `chain` from `from`, refusing an incomplete result.
    fn settle<L: ChainLevel<N>, const N: usize>(&self, chain: &MarkovChain<L, N>, from: &str) -> Result<Outcome> {
        let absorption = self.absorber.absorb(chain, &chain.vector_at(from)?)?;
        if absorption.outcome.residual > RESIDUAL_WARNING {
            let [a, b] = chain.absorbing_states();
            let mass = |i: usize| absorption.distribution.get(i);
            let stuck = (0..N)
                .filter(|&i| i != a && i != b)
                .max_by(|&i, &j| mass(i).total_cmp(&mass(j)))
                .map_or(L::START, |i| chain.index().label(i));
            return Err(ChainError::NoAbsorbingPath { level: L::NAME, state: stuck });
        }
        Ok(absorption.outcome)
    }

    /// Service game outcome (HOLD / BREAK) from game score `from`.
    pub fn game_outcome(&self, point_win: f64, from: &str) -> Result<Outcome> {
        let chain = GameChain::service_game(point_win)?;
        self.settle(&chain, from)
    }

    /// Probability the server holds a game from 0-0.
    pub fn hold_probability(&self, point_win: f64) -> Result<f64> {
        Ok(self.game_outcome(point_win, "0-0")?.first)
    }

    /// Tie-break outcome (SETv1 / SETv2) from point score `from`.
    pub fn tiebreak_outcome(&self, point_win_srv1: f64, point_win_srv2: f64, from: &str) -> Result<Outcome> {
        let chain = TieBreakChain::tie_break(point_win_srv1, point_win_srv2)?;
        self.settle(&chain, from)
    }

    /// Set outcome (SETv1 / SETv2) from game score `from`.
    pub fn set_outcome(&self, hold1: f64, hold2: f64, tie1: f64, from: &str) -> Result<Outcome> {
        let chain = SetChain::set(hold1, hold2, tie1)?;
        self.settle(&chain, from)
    }

    /// Match outcome (V1 / V2) from set score `from`, every remaining set
    /// won by player one with probability `set_win1`.
    pub fn match_outcome(&self, set_win1: f64, from: &str) -> Result<Outcome> {
        let chain = MatchChain::best_of_three(set_win1)?;
        self.settle(&chain, from)
    }

    /// hold1, hold2, tie1 and set1 from the two serve point-win probabilities.
    pub fn level_probabilities(&self, point_win_srv1: f64, point_win_srv2: f64) -> Result<LevelProbabilities> {
        let hold1 = self.hold_probability(point_win_srv1)?;
        let hold2 = self.hold_probability(point_win_srv2)?;
        let tie1 = self.tiebreak_outcome(point_win_srv1, point_win_srv2, "0-0")?.first;
        let set1 = self.set_outcome(hold1, hold2, tie1, "0-0")?.first;
        log::trace!("levels: hold1={hold1:.6} hold2={hold2:.6} tie1={tie1:.6} set1={set1:.6}");
        Ok(LevelProbabilities { hold1, hold2, tie1, set1 })
    }

    /// Forecast the match from `set_score` sets and `game_score` games in the
    /// set in progress.
    ///
    /// `set_score` must be one of "0-0", "1-0", "0-1", "1-1"; `game_score`
    /// must be a set-level state label.
    pub fn forecast(
        &self,
        point_win_srv1: f64,
        point_win_srv2: f64,
        set_score: &str,
        game_score: &str,
    ) -> Result<MatchForecast> {
        let sets: SetScore = set_score.parse()?;
        log::debug!("forecasting from {sets} sets, {game_score} games");

        let levels = self.level_probabilities(point_win_srv1, point_win_srv2)?;
        let current_set = self.set_outcome(levels.hold1, levels.hold2, levels.tie1, game_score)?;

        let mut chain = MatchChain::best_of_three(levels.set1)?;
        let (on_first, on_second) = sets.successors();
        chain.override_row(
            sets.label(),
            &[(on_first, current_set.first), (on_second, current_set.second)],
        )?;
        let outcome = self.settle(&chain, sets.label())?;

        log::debug!("match outcome: V1={:.6} V2={:.6}", outcome.first, outcome.second);
        Ok(MatchForecast { levels, current_set, outcome })
    }
}

/// Match outcome (V1 / V2) from a live score with the default [`Composer`].
pub fn compose(point_win_srv1: f64, point_win_srv2: f64, set_score: &str, game_score: &str) -> Result<Outcome> {
    Ok(Composer::default()
        .forecast(point_win_srv1, point_win_srv2, set_score, game_score)?
        .outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_score_parses_every_live_score() {
        for score in SetScore::ALL {
            assert_eq!(score.label().parse::<SetScore>(), Ok(score));
        }
    }

    #[test]
    fn test_set_score_rejects_finished_and_garbage() {
        for bad in ["2-0", "2-2", "0-2", "", "1:1"] {
            assert_eq!(
                bad.parse::<SetScore>(),
                Err(ChainError::InvalidSetScore(bad.to_string())),
            );
        }
    }

    #[test]
    fn test_successors_follow_the_set_winner() {
        assert_eq!(SetScore::OneZero.successors(), ("2-0", "1-1"));
        assert_eq!(SetScore::ZeroOne.successors(), ("1-1", "0-2"));
    }

    #[test]
    fn test_even_players_split_the_match() {
        let outcome = compose(0.6, 0.6, "0-0", "0-0").unwrap();
        assert!((outcome.first - 0.5).abs() < 1e-9, "{:?}", outcome);
        assert!((outcome.absorbed() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_already_won_in_game_score() {
        // Game score SETv1 means player one has just taken the deciding set.
        let outcome = compose(0.3, 0.9, "1-1", "SETv1").unwrap();
        assert!((outcome.first - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_endless_tiebreak_is_an_error() {
        // Perfect (or hopeless) servers on both sides never leave 6-6 → 7-6 → 7-7 → 5-6.
        for p in [1.0, 0.0] {
            let err = compose(p, p, "0-0", "0-0").unwrap_err();
            assert!(
                matches!(err, ChainError::NoAbsorbingPath { level: "tie-break", .. }),
                "p={}: {:?}",
                p,
                err
            );
        }
    }

    #[test]
    fn test_slow_tiebreak_leak_is_refused_by_power_iteration() {
        let err = Composer::default().tiebreak_outcome(0.99, 0.99, "0-0").unwrap_err();
        assert!(matches!(err, ChainError::NoAbsorbingPath { level: "tie-break", .. }));

        let exact = Composer::new(Absorber::exact()).tiebreak_outcome(0.99, 0.99, "0-0").unwrap();
        assert!((exact.first - 0.5).abs() < 1e-9, "{:?}", exact);
    }

    #[test]
    fn test_one_sided_perfect_server_still_resolves() {
        // Player one wins every point, served or received: the tie-break ends.
        let outcome = compose(1.0, 0.0, "0-0", "0-0").unwrap();
        assert_eq!(outcome.first, 1.0);
    }

    #[test]
    fn test_unknown_game_score() {
        let err = compose(0.6, 0.6, "1-0", "7-3").unwrap_err();
        assert!(matches!(err, ChainError::UnknownState { level: "set", .. }));
    }
}
