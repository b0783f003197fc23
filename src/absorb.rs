/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Absorption: from an initial distribution to the limiting distribution over
//! absorbing states.
//!
//! Two strategies are available:
//!
//! - **Power iteration** (default) — `v · Pⁿ` with `Pⁿ` computed by repeated
//!   squaring, `n` = the level's [`ChainLevel::ABSORPTION_POWER`]. Too small
//!   an `n` leaves mass on transient states; that shows up as
//!   [`Outcome::residual`] and a `warn` log line, never as an error.
//! - **Exact solve** — partition into transient and absorbing blocks and solve
//!   `(I − Q) X = R` by Gauss-Jordan elimination with partial pivoting. No
//!   exponent to tune; fails with [`ChainError::NoAbsorbingPath`] when some
//!   mass can circulate forever.
//!
//! # Invariants
//! - **Pure** — same chain and initial vector, same result, bit for bit.
//! - **Mass-preserving** — the result's total equals the initial vector's.

use crate::chain::{ChainLevel, MarkovChain, Outcome};
use crate::error::{ChainError, Result};
use crate::matrix::{abs, TransitionMatrix};
use crate::state::ProbabilityVector;

/// How far an initial vector's total may stray from 1.
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-9;

/// Residual mass above which absorption is logged as incomplete.
pub const RESIDUAL_WARNING: f64 = 1e-6;

/// Absorption strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Raise the matrix to a fixed power and apply it.
    #[default]
    PowerIteration,
    /// Solve the absorbing-chain linear system directly.
    ExactSolve,
}

/// Absorption solver configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Absorber {
    /// Strategy (default: power iteration).
    pub strategy: Strategy,
    /// Exponent used instead of each level's own, when set.
    pub power_override: Option<u32>,
    /// Exact solve: pivots smaller than this mark the system singular (default: 1e-12).
    pub pivot_tolerance: f64,
}

impl Default for Absorber {
    fn default() -> Self {
        Self { strategy: Strategy::PowerIteration, power_override: None, pivot_tolerance: 1e-12 }
    }
}

/// Limiting distribution plus its absorbing masses.
#[derive(Clone, Debug, PartialEq)]
pub struct Absorption<const N: usize> {
    /// Distribution over every state of the level.
    pub distribution: ProbabilityVector<N>,
    /// Masses on the two absorbing states.
    pub outcome: Outcome,
}

impl Absorber {
    /// Solver with the given strategy and default tuning.
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy, ..Self::default() }
    }

    /// Exact-solve solver.
    pub fn exact() -> Self {
        Self::new(Strategy::ExactSolve)
    }

    /// Drive `initial` to absorption on `chain`.
    pub fn absorb<L: ChainLevel<N>, const N: usize>(
        &self,
        chain: &MarkovChain<L, N>,
        initial: &ProbabilityVector<N>,
    ) -> Result<Absorption<N>> {
        if !initial.is_distribution(DISTRIBUTION_TOLERANCE) {
            return Err(ChainError::InvalidDistribution { level: L::NAME, mass: initial.total() });
        }

        let limit = match self.strategy {
            Strategy::PowerIteration => {
                let power = self.power_override.unwrap_or(L::ABSORPTION_POWER);
                chain.matrix().pow(power)
            }
            Strategy::ExactSolve => absorption_matrix(chain, self.pivot_tolerance)?,
        };
        let distribution = ProbabilityVector::from_array(limit.apply(initial.as_array()));
        let outcome = chain.outcome(&distribution);

        if outcome.residual > RESIDUAL_WARNING {
            log::warn!(
                "{} chain left {:.3e} unabsorbed mass ({:?})",
                L::NAME,
                outcome.residual,
                self.strategy
            );
        }
        log::trace!(
            "{} chain absorbed: {} = {:.6}, {} = {:.6}",
            L::NAME,
            L::ABSORBING[0],
            outcome.first,
            L::ABSORBING[1],
            outcome.second
        );

        Ok(Absorption { distribution, outcome })
    }

    /// [`Absorber::absorb`] from the level's natural start state.
    pub fn absorb_from_start<L: ChainLevel<N>, const N: usize>(
        &self,
        chain: &MarkovChain<L, N>,
    ) -> Result<Absorption<N>> {
        self.absorb(chain, &chain.start_vector())
    }
}

/// `X[i][j]` = probability of ending in absorbing state `j` starting from `i`.
///
/// Solves `A X = B` where `A = I − P` on transient rows and the identity on
/// absorbing rows, and `B` is the identity restricted to absorbing rows.
fn absorption_matrix<L: ChainLevel<N>, const N: usize>(
    chain: &MarkovChain<L, N>,
    pivot_tolerance: f64,
) -> Result<TransitionMatrix<N>> {
    let p = chain.matrix();
    let absorbing = chain.absorbing_states();

    let mut a = [[0.0; N]; N];
    let mut x = [[0.0; N]; N];
    for i in 0..N {
        if absorbing.contains(&i) {
            a[i][i] = 1.0;
            x[i][i] = 1.0;
            continue;
        }
        for j in 0..N {
            a[i][j] = -p.get(i, j);
        }
        a[i][i] += 1.0;
    }

    for col in 0..N {
        let pivot = (col..N)
            .max_by(|&r, &s| abs(a[r][col]).total_cmp(&abs(a[s][col])))
            .unwrap_or(col);
        if abs(a[pivot][col]) < pivot_tolerance {
            return Err(ChainError::NoAbsorbingPath {
                level: L::NAME,
                state: chain.index().label(col),
            });
        }
        a.swap(col, pivot);
        x.swap(col, pivot);

        let inv = 1.0 / a[col][col];
        for j in 0..N {
            a[col][j] *= inv;
            x[col][j] *= inv;
        }
        let (pivot_a, pivot_x) = (a[col], x[col]);
        for r in 0..N {
            let factor = a[r][col];
            if r == col || factor == 0.0 {
                continue;
            }
            for j in 0..N {
                a[r][j] -= factor * pivot_a[j];
                x[r][j] -= factor * pivot_x[j];
            }
        }
    }

    Ok(TransitionMatrix::from_rows(x))
}
