//! State labels and probability vectors.
//!
//! Each chain level owns a fixed, ordered list of score labels ("30-15",
//! "5-4", "HOLD", ...). The order is shared by matrix rows, matrix columns and
//! every vector over that level. [`StateIndex`] freezes the label→position
//! mapping for the lifetime of one chain.

use hashbrown::HashMap;

use crate::matrix::abs;

/// Stable label→index mapping for one chain level.
#[derive(Clone, Debug)]
pub struct StateIndex {
    labels: &'static [&'static str],
    positions: HashMap<&'static str, usize>,
}

impl StateIndex {
    /// Index the given ordered label list.
    ///
    /// A duplicated label keeps its first position.
    pub fn new(labels: &'static [&'static str]) -> Self {
        let mut positions = HashMap::with_capacity(labels.len());
        for (i, &label) in labels.iter().enumerate() {
            positions.entry(label).or_insert(i);
        }
        Self { labels, positions }
    }

    /// Position of `label`, if it belongs to this level.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Label at position `i`.
    pub fn label(&self, i: usize) -> &'static str {
        self.labels[i]
    }

    /// All labels in matrix order.
    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// `true` when no labels are indexed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A distribution over the N states of one level.
///
/// Used both as a chain's starting condition and as its absorption result.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityVector<const N: usize> {
    mass: [f64; N],
}

impl<const N: usize> ProbabilityVector<N> {
    /// All mass on state `i`.
    pub fn one_hot(i: usize) -> Self {
        let mut mass = [0.0; N];
        mass[i] = 1.0;
        Self { mass }
    }

    /// Wrap raw masses. No validation; see [`ProbabilityVector::is_distribution`].
    pub fn from_array(mass: [f64; N]) -> Self {
        Self { mass }
    }

    /// Mass on state `i`.
    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        self.mass[i]
    }

    /// Raw masses in state order.
    pub fn as_array(&self) -> &[f64; N] {
        &self.mass
    }

    /// Total mass.
    pub fn total(&self) -> f64 {
        self.mass.iter().sum()
    }

    /// Nonnegative everywhere and summing to 1 within `tolerance`.
    pub fn is_distribution(&self, tolerance: f64) -> bool {
        self.mass.iter().all(|&m| m >= 0.0) && abs(self.total() - 1.0) <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static LABELS: [&str; 4] = ["0-0", "1-0", "V1", "V2"];

    #[test]
    fn test_index_round_trips_labels() {
        let index = StateIndex::new(&LABELS);
        assert_eq!(index.len(), 4);
        for (i, label) in LABELS.iter().enumerate() {
            assert_eq!(index.index_of(label), Some(i));
            assert_eq!(index.label(i), *label);
        }
        assert_eq!(index.index_of("2-0"), None);
        assert_eq!(index.labels(), &LABELS[..]);
    }

    #[test]
    fn test_one_hot_is_distribution() {
        let v = ProbabilityVector::<4>::one_hot(2);
        assert_eq!(v.get(2), 1.0);
        assert_eq!(v.total(), 1.0);
        assert!(v.is_distribution(1e-12));
    }

    #[test]
    fn test_negative_mass_is_not_distribution() {
        let v = ProbabilityVector::from_array([1.5, -0.5, 0.0, 0.0]);
        assert_eq!(v.total(), 1.0);
        assert!(!v.is_distribution(1e-9));
    }
}
