//! Serialisable forecast report for persistence and transport.
//!
//! A [`ForecastReport`] records the inputs of a forecast next to every
//! derived probability, so a stored result can be audited without re-running
//! the chains.
//!
//! ```text
//! version  : u16 = 1
//! inputs   : point_win_srv1, point_win_srv2, set_score, game_score
//! levels   : hold1, hold2, tie1, set1
//! current_set, outcome : { first, second, residual }
//! ```
//!
//! # no_std
//!
//! This module requires the `serde` feature. It uses `alloc::string::String`
//! and is compatible with no_std + alloc environments.

use alloc::string::{String, ToString};

use crate::chain::Outcome;
use crate::compose::{Composer, LevelProbabilities, MatchForecast};
use crate::error::Result;

/// Current report format version.
pub const REPORT_VERSION: u16 = 1;

/// Inputs a forecast was computed from.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct ForecastInputs {
    /// Player one wins a point on serve.
    pub point_win_srv1: f64,
    /// Player two wins a point on serve.
    pub point_win_srv2: f64,
    /// Sets won so far ("0-0", "1-0", "0-1" or "1-1").
    pub set_score: String,
    /// Games in the set in progress.
    pub game_score: String,
}

/// A serialisable snapshot of one [`MatchForecast`] and its inputs.
///
/// # Example
///
/// ```rust,ignore
/// use tennis_markov::compose::Composer;
/// use tennis_markov::report::ForecastReport;
///
/// let report = ForecastReport::compute(&Composer::default(), 0.65, 0.60, "1-0", "3-2")?;
/// let json = serde_json::to_string(&report).unwrap();
/// let restored: ForecastReport = serde_json::from_str(&json).unwrap();
/// ```
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct ForecastReport {
    /// Format version, [`REPORT_VERSION`] for new reports.
    pub version: u16,
    /// What the forecast was asked.
    pub inputs: ForecastInputs,
    /// Derived per-level probabilities.
    pub levels: LevelProbabilities,
    /// Outcome of the set in progress.
    pub current_set: Outcome,
    /// Outcome of the match.
    pub outcome: Outcome,
}

impl ForecastReport {
    /// Wrap an already computed forecast with its inputs.
    pub fn from_forecast(forecast: &MatchForecast, inputs: ForecastInputs) -> Self {
        Self {
            version: REPORT_VERSION,
            inputs,
            levels: forecast.levels,
            current_set: forecast.current_set,
            outcome: forecast.outcome,
        }
    }

    /// Run `composer` and record the result.
    pub fn compute(
        composer: &Composer,
        point_win_srv1: f64,
        point_win_srv2: f64,
        set_score: &str,
        game_score: &str,
    ) -> Result<Self> {
        let forecast = composer.forecast(point_win_srv1, point_win_srv2, set_score, game_score)?;
        let inputs = ForecastInputs {
            point_win_srv1,
            point_win_srv2,
            set_score: set_score.to_string(),
            game_score: game_score.to_string(),
        };
        Ok(Self::from_forecast(&forecast, inputs))
    }

    /// Probability player one wins the match.
    pub fn p_win_1(&self) -> f64 {
        self.outcome.first
    }
}
