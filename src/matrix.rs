/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Dense square transition matrices over a fixed state set.
//!
//! Rows are "from", columns are "to". A valid transition matrix is
//! row-stochastic: nonnegative, every row summing to 1. Absorbing states carry
//! a single 1 on the diagonal.
//!
//! # Invariants
//! - **Fixed order** — row `i` and column `i` name the same state for the
//!   lifetime of a computation.
//! - **no_std** — fixed-size arrays, no heap allocation.

/// `|x|` without relying on `std` float intrinsics.
#[inline]
pub(crate) fn abs(x: f64) -> f64 {
    if x < 0.0 { -x } else { x }
}

/// An N×N transition matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionMatrix<const N: usize> {
    rows: [[f64; N]; N],
}

impl<const N: usize> TransitionMatrix<N> {
    /// All-zero matrix.
    pub fn zeros() -> Self {
        Self { rows: [[0.0; N]; N] }
    }

    /// Identity matrix (every state absorbing).
    pub fn identity() -> Self {
        let mut m = Self::zeros();
        for i in 0..N {
            m.rows[i][i] = 1.0;
        }
        m
    }

    /// Wrap raw rows.
    pub fn from_rows(rows: [[f64; N]; N]) -> Self {
        Self { rows }
    }

    /// Transition probability from state `i` to state `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.rows[i][j]
    }

    /// Overwrite the transition probability from `i` to `j`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, p: f64) {
        self.rows[i][j] = p;
    }

    /// Outgoing distribution of state `i`.
    pub fn row(&self, i: usize) -> &[f64; N] {
        &self.rows[i]
    }

    /// Clear every outgoing transition of state `i`.
    pub fn clear_row(&mut self, i: usize) {
        self.rows[i] = [0.0; N];
    }

    /// Sum of row `i`.
    pub fn row_sum(&self, i: usize) -> f64 {
        self.rows[i].iter().sum()
    }

    /// Maximum absolute deviation from 1.0 across all row sums.
    pub fn max_row_deviation(&self) -> f64 {
        (0..N).map(|i| abs(self.row_sum(i) - 1.0)).fold(0.0, f64::max)
    }

    /// Matrix product `self × other`.
    pub fn mul(&self, other: &Self) -> Self {
        let mut out = Self::zeros();
        for i in 0..N {
            for k in 0..N {
                let a = self.rows[i][k];
                if a == 0.0 {
                    continue;
                }
                for j in 0..N {
                    out.rows[i][j] += a * other.rows[k][j];
                }
            }
        }
        out
    }

    /// `self` raised to the `n`-th power by repeated squaring.
    ///
    /// `pow(0)` is the identity.
    pub fn pow(&self, mut n: u32) -> Self {
        let mut result = Self::identity();
        let mut base = self.clone();
        while n > 0 {
            if n & 1 == 1 {
                result = result.mul(&base);
            }
            n >>= 1;
            if n > 0 {
                base = base.mul(&base);
            }
        }
        result
    }

    /// Row vector × matrix: one step of the chain applied to a distribution.
    pub fn apply(&self, v: &[f64; N]) -> [f64; N] {
        let mut out = [0.0; N];
        for (i, &mass) in v.iter().enumerate() {
            if mass == 0.0 {
                continue;
            }
            for (j, o) in out.iter_mut().enumerate() {
                *o += mass * self.rows[i][j];
            }
        }
        out
    }
}

impl<const N: usize> Default for TransitionMatrix<N> {
    fn default() -> Self {
        Self::zeros()
    }
}
