//! Error taxonomy for chain construction, absorption and level composition.
//!
//! Every failure is detected at a boundary (building a chain, preparing an
//! initial vector, dispatching on a score) and returned to the caller. Nothing
//! is retried and no partial result is produced.

use alloc::string::String;

use thiserror::Error;

/// Errors raised while building, absorbing or composing chains.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ChainError {
    /// A probability parameter lies outside `[0, 1]` (or is NaN).
    #[error("invalid probability for {name}: {value} is outside [0, 1]")]
    InvalidProbability {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A score label is not part of the level's fixed state set.
    #[error("unrecognized state {label:?} for the {level} chain")]
    UnknownState {
        /// Level whose state set was searched.
        level: &'static str,
        /// The label that did not resolve.
        label: String,
    },

    /// A set score other than 0-0, 1-0, 0-1 or 1-1 was supplied.
    #[error("invalid set score {0:?}: expected one of 0-0, 1-0, 0-1, 1-1")]
    InvalidSetScore(String),

    /// Wrong number of scalar parameters for a level.
    #[error("{level} chain expects {expected} parameters, got {got}")]
    ParameterCount {
        /// Level being built.
        level: &'static str,
        /// Number of parameters the level declares.
        expected: usize,
        /// Number of parameters supplied.
        got: usize,
    },

    /// A row of the built transition matrix does not sum to one.
    #[error("{level} chain row {state:?} sums to {sum}, not 1")]
    NotStochastic {
        /// Level being built.
        level: &'static str,
        /// State owning the row.
        state: &'static str,
        /// Actual row sum.
        sum: f64,
    },

    /// The declarative table is malformed: a state is unreachable, missing a
    /// rule, or carries more than one.
    #[error("{level} chain state {state:?} is malformed: {reason}")]
    Topology {
        /// Level being checked.
        level: &'static str,
        /// State at fault.
        state: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Some mass can circulate forever without reaching an absorbing state,
    /// or a composed level left more than a negligible share unabsorbed.
    #[error("{level} chain state {state:?} never reaches an absorbing state")]
    NoAbsorbingPath {
        /// Level being solved.
        level: &'static str,
        /// First state found on a closed transient class.
        state: &'static str,
    },

    /// The initial vector is negative somewhere or does not sum to one.
    #[error("initial vector for the {level} chain is not a distribution (total mass {mass})")]
    InvalidDistribution {
        /// Level being absorbed.
        level: &'static str,
        /// Total mass of the rejected vector.
        mass: f64,
    },
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, ChainError>;

/// Reject anything outside `[0, 1]`, NaN included.
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ChainError::InvalidProbability { name, value })
    }
}
