/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Declarative Markov chain construction.
//!
//! Every level of play (game, tie-break, set, match) is described by a fixed
//! table of [`Rule`]s: one row per non-absorbing state naming the parameter
//! that governs it and the two scores it can lead to. [`MarkovChain`] compiles
//! that table into a [`TransitionMatrix`] for a concrete parameter set.
//!
//! ```text
//! Rule::Split { from: "30-15", param: SERVER, win: "40-15", lose: "30-30(DEUCE)" }
//!   ⇒  P[30-15][40-15] = p,  P[30-15][30-30(DEUCE)] = 1 − p
//! ```
//!
//! # Invariants
//! - **Row-stochastic** — every row of a validated chain sums to 1 (±1e-9).
//! - **Closed topology** — every state is reachable from the start state,
//!   every transient state can reach an absorbing one, and absorbing states
//!   only loop to themselves. Checked by [`check_topology`].
//! - **Stateless** — a chain is built fresh from its parameters and never
//!   mutated behind the caller's back; start vectors are constructed per call.

use core::marker::PhantomData;

use alloc::string::ToString;

use crate::error::{check_probability, ChainError, Result};
use crate::matrix::{abs, TransitionMatrix};
use crate::state::{ProbabilityVector, StateIndex};

/// Tolerance for the row-stochastic check performed by [`MarkovChain::build`].
pub const STOCHASTIC_TOLERANCE: f64 = 1e-9;

// ─── Rule table ──────────────────────────────────────────────────────────────

/// One row of a level's declarative transition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    /// With probability `params[param]` move to `win`, otherwise to `lose`.
    Split {
        /// Source state.
        from: &'static str,
        /// Index into the level's parameter list.
        param: usize,
        /// Destination when the parametrised side takes the point/game/set.
        win: &'static str,
        /// Destination otherwise.
        lose: &'static str,
    },
    /// Move to `to` with probability 1.
    Forced {
        /// Source state.
        from: &'static str,
        /// Destination state.
        to: &'static str,
    },
}

impl Rule {
    /// Source state of this row.
    pub const fn from(&self) -> &'static str {
        match *self {
            Rule::Split { from, .. } | Rule::Forced { from, .. } => from,
        }
    }

    /// Both destinations (repeated for a forced move).
    pub const fn targets(&self) -> [&'static str; 2] {
        match *self {
            Rule::Split { win, lose, .. } => [win, lose],
            Rule::Forced { to, .. } => [to, to],
        }
    }
}

/// Shorthand for [`Rule::Split`] in level tables.
pub const fn split(from: &'static str, param: usize, win: &'static str, lose: &'static str) -> Rule {
    Rule::Split { from, param, win, lose }
}

/// Shorthand for [`Rule::Forced`] in level tables.
pub const fn forced(from: &'static str, to: &'static str) -> Rule {
    Rule::Forced { from, to }
}

// ─── ChainLevel ──────────────────────────────────────────────────────────────

/// Fixed description of one level of play.
///
/// The const generic `N` is the number of states; it must equal
/// `STATES.len()`.
pub trait ChainLevel<const N: usize> {
    /// Human-readable level name, used in errors and logs.
    const NAME: &'static str;
    /// Ordered state labels shared by matrix rows, columns and vectors.
    const STATES: &'static [&'static str];
    /// Natural start state ("0-0").
    const START: &'static str;
    /// The two absorbing states: player one (or the server) first.
    const ABSORBING: [&'static str; 2];
    /// Names of the scalar parameters, in the order [`Rule::Split`] indexes them.
    const PARAMETERS: &'static [&'static str];
    /// One rule per transient state.
    const RULES: &'static [Rule];
    /// Matrix power used by power-iteration absorption; must exceed the
    /// longest path that still carries non-negligible unabsorbed mass.
    const ABSORPTION_POWER: u32;
}

/// Check a level's table for structural defects.
///
/// Independent of parameter values: an edge exists whenever a rule names it.
pub fn check_topology<L: ChainLevel<N>, const N: usize>() -> Result<()> {
    let malformed = |state: &'static str, reason: &'static str| ChainError::Topology {
        level: L::NAME,
        state,
        reason,
    };

    if L::STATES.len() != N {
        return Err(malformed(L::START, "state list length differs from the chain size"));
    }
    let index = StateIndex::new(L::STATES);
    if let Some(i) = (0..N).find(|&i| index.index_of(L::STATES[i]) != Some(i)) {
        return Err(malformed(L::STATES[i], "label is declared twice"));
    }
    let lookup = |label: &'static str| {
        index
            .index_of(label)
            .ok_or_else(|| malformed(label, "label is not a declared state"))
    };

    let mut absorbing = [false; N];
    for label in L::ABSORBING {
        absorbing[lookup(label)?] = true;
    }

    let mut successors = [[false; N]; N];
    let mut rule_count = [0usize; N];
    for rule in L::RULES {
        let from = lookup(rule.from())?;
        if let Rule::Split { param, .. } = *rule {
            if param >= L::PARAMETERS.len() {
                return Err(malformed(rule.from(), "rule refers to an undeclared parameter"));
            }
        }
        rule_count[from] += 1;
        for to in rule.targets() {
            successors[from][lookup(to)?] = true;
        }
    }

    for i in 0..N {
        let reason = match (absorbing[i], rule_count[i]) {
            (true, 0) | (false, 1) => continue,
            (true, _) => "absorbing state has outgoing rules",
            (false, 0) => "transient state has no rule",
            (false, _) => "transient state has more than one rule",
        };
        return Err(malformed(L::STATES[i], reason));
    }

    // Forward closure from the start state.
    let mut reached = [false; N];
    reached[lookup(L::START)?] = true;
    spread(&mut reached, |i, j| successors[i][j]);
    if let Some(i) = (0..N).find(|&i| !reached[i]) {
        return Err(malformed(L::STATES[i], "unreachable from the start state"));
    }

    // Backward closure from the absorbing states.
    let mut absorbs = absorbing;
    spread(&mut absorbs, |i, j| successors[j][i]);
    if let Some(i) = (0..N).find(|&i| !absorbs[i]) {
        return Err(ChainError::NoAbsorbingPath { level: L::NAME, state: L::STATES[i] });
    }
    Ok(())
}

/// Mark every `j` with an edge `i → j` from a marked `i`, until nothing changes.
fn spread<const N: usize>(marked: &mut [bool; N], edge: impl Fn(usize, usize) -> bool) {
    loop {
        let mut changed = false;
        for i in 0..N {
            if !marked[i] {
                continue;
            }
            for j in 0..N {
                if !marked[j] && edge(i, j) {
                    marked[j] = true;
                    changed = true;
                }
            }
        }
        if !changed {
            return;
        }
    }
}

// ─── Outcome / Edge ──────────────────────────────────────────────────────────

/// Mass on a level's two absorbing states.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome {
    /// Player one (or the server, at game level) wins the unit of play.
    pub first: f64,
    /// The other side wins it.
    pub second: f64,
    /// Mass not yet absorbed. Floating-point noise once absorption is complete.
    pub residual: f64,
}

impl Outcome {
    /// `first + second`.
    pub fn absorbed(&self) -> f64 {
        self.first + self.second
    }
}

/// A positive-probability transition, for rendering and inspection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    /// Source label.
    pub from: &'static str,
    /// Destination label.
    pub to: &'static str,
    /// Transition probability.
    pub probability: f64,
}

// ─── MarkovChain ─────────────────────────────────────────────────────────────

/// A level's transition matrix compiled for one parameter set.
#[derive(Clone, Debug)]
pub struct MarkovChain<L: ChainLevel<N>, const N: usize> {
    matrix: TransitionMatrix<N>,
    index: StateIndex,
    start: usize,
    absorbing: [usize; 2],
    _level: PhantomData<L>,
}

impl<L: ChainLevel<N>, const N: usize> MarkovChain<L, N> {
    /// Compile the level's table without range-checking the parameters.
    ///
    /// Labels are still resolved, so a malformed table fails here, but a
    /// parameter outside `[0, 1]` silently yields a non-stochastic matrix.
    pub fn from_parameters(params: &[f64]) -> Result<Self> {
        if params.len() != L::PARAMETERS.len() {
            return Err(ChainError::ParameterCount {
                level: L::NAME,
                expected: L::PARAMETERS.len(),
                got: params.len(),
            });
        }
        if L::STATES.len() != N {
            return Err(ChainError::Topology {
                level: L::NAME,
                state: L::START,
                reason: "state list length differs from the chain size",
            });
        }

        let index = StateIndex::new(L::STATES);
        let resolve = |label: &str| resolve_in::<L, N>(&index, label);

        let mut matrix = TransitionMatrix::zeros();
        for rule in L::RULES {
            let from = resolve(rule.from())?;
            match *rule {
                Rule::Split { param, win, lose, .. } => {
                    let p = params.get(param).copied().ok_or(ChainError::Topology {
                        level: L::NAME,
                        state: rule.from(),
                        reason: "rule refers to an undeclared parameter",
                    })?;
                    let (w, l) = (resolve(win)?, resolve(lose)?);
                    matrix.set(from, w, matrix.get(from, w) + p);
                    matrix.set(from, l, matrix.get(from, l) + (1.0 - p));
                }
                Rule::Forced { to, .. } => {
                    let t = resolve(to)?;
                    matrix.set(from, t, matrix.get(from, t) + 1.0);
                }
            }
        }

        let absorbing = [resolve(L::ABSORBING[0])?, resolve(L::ABSORBING[1])?];
        for a in absorbing {
            matrix.set(a, a, 1.0);
        }
        let start = resolve(L::START)?;

        Ok(Self { matrix, index, start, absorbing, _level: PhantomData })
    }

    /// Validated build: parameter ranges, table topology and row sums.
    pub fn build(params: &[f64]) -> Result<Self> {
        for (&name, &p) in L::PARAMETERS.iter().zip(params) {
            check_probability(name, p)?;
        }
        check_topology::<L, N>()?;
        let chain = Self::from_parameters(params)?;
        chain.check_stochastic(STOCHASTIC_TOLERANCE)?;
        Ok(chain)
    }

    /// Fail with [`ChainError::NotStochastic`] on the first row whose sum is
    /// further than `tolerance` from 1.
    pub fn check_stochastic(&self, tolerance: f64) -> Result<()> {
        for i in 0..N {
            let sum = self.matrix.row_sum(i);
            if abs(sum - 1.0) > tolerance {
                return Err(ChainError::NotStochastic {
                    level: L::NAME,
                    state: self.index.label(i),
                    sum,
                });
            }
        }
        Ok(())
    }

    /// The compiled transition matrix.
    pub fn matrix(&self) -> &TransitionMatrix<N> {
        &self.matrix
    }

    /// The label index shared by this chain's matrix and vectors.
    pub fn index(&self) -> &StateIndex {
        &self.index
    }

    /// Matrix position of `label`.
    pub fn state_index(&self, label: &str) -> Result<usize> {
        resolve_in::<L, N>(&self.index, label)
    }

    /// Positions of the two absorbing states (player one first).
    pub fn absorbing_states(&self) -> [usize; 2] {
        self.absorbing
    }

    /// A fresh one-hot vector at the level's natural start state.
    pub fn start_vector(&self) -> ProbabilityVector<N> {
        ProbabilityVector::one_hot(self.start)
    }

    /// A fresh one-hot vector at `label`, for resuming mid-play.
    pub fn vector_at(&self, label: &str) -> Result<ProbabilityVector<N>> {
        Ok(ProbabilityVector::one_hot(self.state_index(label)?))
    }

    /// Mass that `v` places on `label`.
    pub fn mass(&self, v: &ProbabilityVector<N>, label: &str) -> Result<f64> {
        Ok(v.get(self.state_index(label)?))
    }

    /// Read the absorbing masses out of a distribution.
    pub fn outcome(&self, v: &ProbabilityVector<N>) -> Outcome {
        let first = v.get(self.absorbing[0]);
        let second = v.get(self.absorbing[1]);
        let residual = (v.total() - first - second).max(0.0);
        Outcome { first, second, residual }
    }

    /// Replace the outgoing transitions of `from` with `targets`.
    ///
    /// Used to inject a freshly computed lower-level result into a partially
    /// played chain. Each weight must lie in `[0, 1]`; the row is not forced
    /// to sum to exactly 1 so residual noise from below passes through as is.
    pub fn override_row(&mut self, from: &str, targets: &[(&str, f64)]) -> Result<()> {
        let i = self.state_index(from)?;
        for &(to, p) in targets {
            self.state_index(to)?;
            check_probability("row weight", p)?;
        }
        self.matrix.clear_row(i);
        for &(to, p) in targets {
            let j = self.state_index(to)?;
            self.matrix.set(i, j, self.matrix.get(i, j) + p);
        }
        Ok(())
    }

    /// Every positive-probability transition, in row-major order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..N).flat_map(move |i| {
            self.matrix.row(i).iter().enumerate().filter_map(move |(j, &probability)| {
                (probability > 0.0).then(|| Edge {
                    from: self.index.label(i),
                    to: self.index.label(j),
                    probability,
                })
            })
        })
    }
}

fn resolve_in<L: ChainLevel<N>, const N: usize>(index: &StateIndex, label: &str) -> Result<usize> {
    index.index_of(label).ok_or_else(|| ChainError::UnknownState {
        level: L::NAME,
        label: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── A coin race: first to two heads ─────────────────────────────────────

    #[derive(Clone, Debug)]
    struct Race;

    const HEADS: usize = 0;

    impl ChainLevel<5> for Race {
        const NAME: &'static str = "race";
        const STATES: &'static [&'static str] = &["0-0", "1-0", "0-1", "A", "B"];
        const START: &'static str = "0-0";
        const ABSORBING: [&'static str; 2] = ["A", "B"];
        const PARAMETERS: &'static [&'static str] = &["heads"];
        const RULES: &'static [Rule] = &[
            split("0-0", HEADS, "1-0", "0-1"),
            split("1-0", HEADS, "A", "0-0"),
            split("0-1", HEADS, "0-0", "B"),
        ];
        const ABSORPTION_POWER: u32 = 200;
    }

    #[derive(Clone, Debug)]
    struct Broken;

    impl ChainLevel<3> for Broken {
        const NAME: &'static str = "broken";
        const STATES: &'static [&'static str] = &["start", "A", "B"];
        const START: &'static str = "start";
        const ABSORBING: [&'static str; 2] = ["A", "B"];
        const PARAMETERS: &'static [&'static str] = &[];
        const RULES: &'static [Rule] = &[forced("start", "A"), forced("start", "B")];
        const ABSORPTION_POWER: u32 = 1;
    }

    #[derive(Clone, Debug)]
    struct Orphaned;

    impl ChainLevel<4> for Orphaned {
        const NAME: &'static str = "orphaned";
        const STATES: &'static [&'static str] = &["start", "orphan", "A", "B"];
        const START: &'static str = "start";
        const ABSORBING: [&'static str; 2] = ["A", "B"];
        const PARAMETERS: &'static [&'static str] = &["p"];
        const RULES: &'static [Rule] = &[split("start", 0, "A", "B"), forced("orphan", "A")];
        const ABSORPTION_POWER: u32 = 1;
    }

    #[derive(Clone, Debug)]
    struct LeakyAbsorber;

    impl ChainLevel<3> for LeakyAbsorber {
        const NAME: &'static str = "leaky";
        const STATES: &'static [&'static str] = &["start", "A", "B"];
        const START: &'static str = "start";
        const ABSORBING: [&'static str; 2] = ["A", "B"];
        const PARAMETERS: &'static [&'static str] = &["p"];
        const RULES: &'static [Rule] = &[split("start", 0, "A", "B"), forced("A", "B")];
        const ABSORPTION_POWER: u32 = 1;
    }

    #[derive(Clone, Debug)]
    struct Trap;

    impl ChainLevel<5> for Trap {
        const NAME: &'static str = "trap";
        const STATES: &'static [&'static str] = &["start", "mid", "pit", "A", "B"];
        const START: &'static str = "start";
        const ABSORBING: [&'static str; 2] = ["A", "B"];
        const PARAMETERS: &'static [&'static str] = &["p"];
        const RULES: &'static [Rule] = &[
            split("start", 0, "mid", "pit"),
            split("mid", 0, "A", "B"),
            forced("pit", "pit"),
        ];
        const ABSORPTION_POWER: u32 = 1;
    }

    #[test]
    fn test_race_topology_is_valid() {
        assert_eq!(check_topology::<Race, 5>(), Ok(()));
    }

    #[test]
    fn test_duplicate_rule_is_rejected() {
        let err = check_topology::<Broken, 3>().unwrap_err();
        assert!(matches!(err, ChainError::Topology { state: "start", .. }), "{:?}", err);
    }

    #[test]
    fn test_unreachable_state_is_rejected() {
        assert_eq!(
            check_topology::<Orphaned, 4>(),
            Err(ChainError::Topology {
                level: "orphaned",
                state: "orphan",
                reason: "unreachable from the start state",
            })
        );
    }

    #[test]
    fn test_absorbing_state_with_rule_is_rejected() {
        assert_eq!(
            check_topology::<LeakyAbsorber, 3>(),
            Err(ChainError::Topology {
                level: "leaky",
                state: "A",
                reason: "absorbing state has outgoing rules",
            })
        );
    }

    #[test]
    fn test_closed_transient_class_is_rejected() {
        assert_eq!(
            check_topology::<Trap, 5>(),
            Err(ChainError::NoAbsorbingPath { level: "trap", state: "pit" })
        );
        assert!(MarkovChain::<Trap, 5>::build(&[0.5]).is_err());
    }

    #[test]
    fn test_build_compiles_split_rows() {
        let chain = MarkovChain::<Race, 5>::build(&[0.7]).unwrap();
        let m = chain.matrix();
        assert_eq!(m.get(0, 1), 0.7);
        assert!(abs(m.get(0, 2) - 0.3) < 1e-15);
        assert_eq!(m.get(3, 3), 1.0);
        assert_eq!(m.get(4, 4), 1.0);
        assert!(m.max_row_deviation() < STOCHASTIC_TOLERANCE);
    }

    #[test]
    fn test_build_rejects_out_of_range_probability() {
        let err = MarkovChain::<Race, 5>::build(&[1.2]).unwrap_err();
        assert_eq!(err, ChainError::InvalidProbability { name: "heads", value: 1.2 });
    }

    #[test]
    fn test_from_parameters_skips_range_check() {
        let chain = MarkovChain::<Race, 5>::from_parameters(&[1.2]).unwrap();
        // 1.2 and -0.2 still sum to one, but the matrix is not a valid chain.
        assert!(chain.matrix().get(0, 2) < 0.0);
    }

    #[test]
    fn test_parameter_count_is_checked() {
        let err = MarkovChain::<Race, 5>::build(&[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, ChainError::ParameterCount { expected: 1, got: 2, .. }));
    }

    #[test]
    fn test_unknown_label_is_surfaced() {
        let chain = MarkovChain::<Race, 5>::build(&[0.5]).unwrap();
        assert!(matches!(
            chain.vector_at("3-0"),
            Err(ChainError::UnknownState { level: "race", .. })
        ));
    }

    #[test]
    fn test_override_row_replaces_transitions() {
        let mut chain = MarkovChain::<Race, 5>::build(&[0.5]).unwrap();
        chain.override_row("0-0", &[("A", 0.25), ("B", 0.75)]).unwrap();
        let m = chain.matrix();
        assert_eq!(m.get(0, 1), 0.0);
        assert_eq!(m.get(0, 3), 0.25);
        assert_eq!(m.get(0, 4), 0.75);
        assert!(chain.override_row("0-0", &[("A", -0.1)]).is_err());
    }

    #[test]
    fn test_edges_skip_zero_entries() {
        let chain = MarkovChain::<Race, 5>::build(&[1.0]).unwrap();
        // Three transient rows, each with one live edge at heads = 1, plus two self-loops.
        assert_eq!(chain.edges().count(), 5);
        assert!(chain.edges().all(|e| e.probability > 0.0));
    }

    #[test]
    fn test_outcome_reports_residual() {
        let chain = MarkovChain::<Race, 5>::build(&[0.5]).unwrap();
        let v = ProbabilityVector::from_array([0.1, 0.0, 0.0, 0.6, 0.3]);
        let o = chain.outcome(&v);
        assert_eq!(chain.mass(&v, "A").unwrap(), o.first);
        assert_eq!(chain.mass(&v, "0-0").unwrap(), 0.1);
        assert!(chain.mass(&v, "C").is_err());
        assert_eq!(o.first, 0.6);
        assert_eq!(o.second, 0.3);
        assert!(abs(o.residual - 0.1) < 1e-12);
    }
}
