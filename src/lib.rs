//! # tennis-markov
//!
//! Match-win probabilities for tennis from per-point serve-win probabilities,
//! by composing four nested discrete-time Markov chains.
//!
//! ---
//!
//! ## Four chains, one channel between them
//!
//! Each level of play is a small absorbing Markov chain with a fixed,
//! hand-checked topology: the service game (deuce and advantage), the
//! tie-break (seven points, two clear, serve alternating every two points),
//! the set (six games, two clear, tie-break at 6-6) and the best-of-three
//! match. A chain is built fresh from a handful of scalars, driven to
//! absorption, and reduced to the mass on its two absorbing states.
//!
//! That pair of numbers is the only thing handed upward: hold probabilities
//! and the tie-break probability parametrise the set, and the set-win
//! probability parametrises the match.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! point-win (srv1, srv2) → Game ×2, TieBreak → Set → Match → (V1, V2)
//!                              ↑                 ↑       ↑
//!                         MarkovChain       Absorber   SetScore (resume mid-match)
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`matrix`] | [`TransitionMatrix`] | Dense row-stochastic matrices, powers by squaring |
//! | [`state`] | [`StateIndex`], [`ProbabilityVector`] | Stable label→index map; distributions over states |
//! | [`chain`] | [`ChainLevel`], [`MarkovChain`], [`Rule`] | Declarative transition tables compiled per parameter set |
//! | [`levels`] | [`levels::Game`], [`levels::TieBreak`], [`levels::Set`], [`levels::MatchPlay`] | The four fixed topologies |
//! | [`absorb`] | [`Absorber`], [`Strategy`] | Power iteration or exact `(I − Q)⁻¹R` absorption |
//! | [`compose`] | [`Composer`], [`SetScore`], [`MatchForecast`] | Level composition and mid-match resumption |
//! | [`graph`] | [`graph::write_dot`] | Graphviz rendering for diagnostics |
//! | `report` | `ForecastReport` | Serialisable forecast snapshot (requires `serde` feature) |
//!
//! ## Example
//!
//! ```rust
//! use tennis_markov::compose;
//!
//! // Player one wins 65% of points on serve, player two 60%; one set all, 3-2.
//! let outcome = compose(0.65, 0.60, "1-1", "3-2").unwrap();
//! assert!((outcome.first + outcome.second - 1.0).abs() < 1e-9);
//! ```
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` by default and needs only `alloc`. Enable the
//! `std` feature to link the standard library, `serde` for serialisation
//! support, and `python-ffi` for the PyO3 bindings.
//!
//! ## License
//!
//! Business Source License 1.1. Free for evaluation and non-production use.
//! Commercial production use requires a license from Flout Labs (cbyrne@floutlabs.com).

#![cfg_attr(not(any(feature = "std", feature = "python-ffi", test)), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod error;
pub mod matrix;
pub mod state;
pub mod chain;
pub mod levels;
pub mod absorb;
pub mod compose;
pub mod graph;
#[cfg(feature = "serde")]
pub mod report;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use absorb::{Absorber, Absorption, Strategy};
pub use chain::{ChainLevel, MarkovChain, Outcome, Rule};
pub use compose::{compose, Composer, LevelProbabilities, MatchForecast, SetScore};
pub use error::{ChainError, Result};
pub use matrix::TransitionMatrix;
pub use state::{ProbabilityVector, StateIndex};
