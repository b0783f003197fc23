//! The four fixed chain topologies, leaf to root.
//!
//! | Level | States | Parameters | Absorbing | Power |
//! |-------|--------|------------|-----------|-------|
//! | [`Game`] | 17 | server point-win | HOLD / BREAK | 10 000 |
//! | [`TieBreak`] | 54 | srv1, srv2 point-win | SETv1 / SETv2 | 1 000 |
//! | [`Set`] | 41 | hold1, hold2, tie1 | SETv1 / SETv2 | 100 |
//! | [`MatchPlay`] | 10 | set-win1 | V1 / V2 | 5 |
//!
//! Game and tie-break results parametrise the set; the set result
//! parametrises the match. See [`crate::compose`].

pub mod game;
pub mod match_play;
pub mod set;
pub mod tiebreak;

pub use game::{Game, GameChain, GAME_STATES};
pub use match_play::{MatchChain, MatchPlay, MATCH_STATES};
pub use set::{Set, SetChain, SET_STATES};
pub use tiebreak::{TieBreak, TieBreakChain, TIEBREAK_STATES};
