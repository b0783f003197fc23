//! Python FFI bindings via PyO3.
//!
//! Exposes the forecast pipeline to Python. Scores are passed as the same
//! labels the Rust API uses ("1-0", "5-4", ...).
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! import tennis_markov as tm
//!
//! f = tm.compose(0.65, 0.60, set_score="1-0", game_score="3-2")
//! print(f.p_win_1, f.p_win_2)        # match
//! print(f.hold1, f.hold2, f.tie1)    # derived levels
//! print(tm.hold_probability(0.6))    # ≈ 0.7357
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::absorb::Absorber;
use crate::compose::{Composer, MatchForecast};
use crate::error::ChainError;

fn to_py_err(e: ChainError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn composer(exact: bool) -> Composer {
    if exact {
        Composer::new(Absorber::exact())
    } else {
        Composer::default()
    }
}

// ── Forecast ──────────────────────────────────────────────────────────────────

/// Result of a match forecast.
///
/// Attributes:
///     p_win_1, p_win_2: match-win probabilities
///     hold1, hold2:     hold probabilities
///     tie1:             player one wins a tie-break
///     set1:             player one wins a set from 0-0
///     current_set_1:    player one wins the set in progress
#[pyclass(name = "Forecast")]
#[derive(Clone)]
pub struct PyForecast {
    inner: MatchForecast,
}

#[pymethods]
impl PyForecast {
    /// Probability player one wins the match.
    #[getter]
    pub fn p_win_1(&self) -> f64 {
        self.inner.p_win_1()
    }
    /// Probability player two wins the match.
    #[getter]
    pub fn p_win_2(&self) -> f64 {
        self.inner.p_win_2()
    }
    /// Probability player one holds serve.
    #[getter]
    pub fn hold1(&self) -> f64 {
        self.inner.levels.hold1
    }
    /// Probability player two holds serve.
    #[getter]
    pub fn hold2(&self) -> f64 {
        self.inner.levels.hold2
    }
    /// Probability player one wins a tie-break.
    #[getter]
    pub fn tie1(&self) -> f64 {
        self.inner.levels.tie1
    }
    /// Probability player one wins a set from 0-0.
    #[getter]
    pub fn set1(&self) -> f64 {
        self.inner.levels.set1
    }
    /// Probability player one wins the set in progress.
    #[getter]
    pub fn current_set_1(&self) -> f64 {
        self.inner.current_set.first
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "Forecast(p_win_1={:.4}, p_win_2={:.4})",
            self.inner.p_win_1(),
            self.inner.p_win_2(),
        )
    }
}

// ── Functions ─────────────────────────────────────────────────────────────────

/// Forecast a best-of-three match from a live score.
///
/// Args:
///     point_win_srv1: player one wins a point on serve, in [0, 1]
///     point_win_srv2: player two wins a point on serve, in [0, 1]
///     set_score:      "0-0", "1-0", "0-1" or "1-1"
///     game_score:     games in the set in progress, e.g. "3-2"
///     exact:          solve the chains exactly instead of by matrix powers
#[pyfunction]
#[pyo3(signature = (point_win_srv1, point_win_srv2, set_score="0-0", game_score="0-0", exact=false))]
pub fn compose(
    point_win_srv1: f64,
    point_win_srv2: f64,
    set_score: &str,
    game_score: &str,
    exact: bool,
) -> PyResult<PyForecast> {
    composer(exact)
        .forecast(point_win_srv1, point_win_srv2, set_score, game_score)
        .map(|inner| PyForecast { inner })
        .map_err(to_py_err)
}

/// Probability a server winning `point_win` of service points holds.
#[pyfunction]
pub fn hold_probability(point_win: f64) -> PyResult<f64> {
    Composer::default().hold_probability(point_win).map_err(to_py_err)
}

/// Probability player one wins a tie-break from 0-0.
#[pyfunction]
pub fn tiebreak_probability(point_win_srv1: f64, point_win_srv2: f64) -> PyResult<f64> {
    Composer::default()
        .tiebreak_outcome(point_win_srv1, point_win_srv2, "0-0")
        .map(|o| o.first)
        .map_err(to_py_err)
}

/// Probability player one wins a set from 0-0.
#[pyfunction]
pub fn set_probability(point_win_srv1: f64, point_win_srv2: f64) -> PyResult<f64> {
    Composer::default()
        .level_probabilities(point_win_srv1, point_win_srv2)
        .map(|levels| levels.set1)
        .map_err(to_py_err)
}

// ── Module entry point ────────────────────────────────────────────────────────

/// tennis-markov Python bindings.
///
/// Match-win probabilities from serve point-win probabilities via nested
/// Markov chains.
#[pymodule]
pub fn tennis_markov(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyForecast>()?;
    m.add_function(wrap_pyfunction!(compose, m)?)?;
    m.add_function(wrap_pyfunction!(hold_probability, m)?)?;
    m.add_function(wrap_pyfunction!(tiebreak_probability, m)?)?;
    m.add_function(wrap_pyfunction!(set_probability, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
