//! Graphviz rendering of a compiled chain, for diagnostics.
//!
//! Every positive-probability transition becomes an edge labelled with its
//! probability to two decimals. Rendering has no effect on any computation.
//!
//! ```text
//! $ dot -Tsvg game.dot > game.svg
//! ```

use core::fmt::{self, Write};

use crate::chain::{ChainLevel, MarkovChain};

/// Write `chain` as a `digraph` to `out`.
///
/// Absorbing states are drawn as double circles.
pub fn write_dot<L, W, const N: usize>(chain: &MarkovChain<L, N>, out: &mut W) -> fmt::Result
where
    L: ChainLevel<N>,
    W: Write,
{
    writeln!(out, "digraph \"{}\" {{", L::NAME)?;
    writeln!(out, "    rankdir=LR;")?;
    for label in L::ABSORBING {
        writeln!(out, "    \"{label}\" [shape=doublecircle];")?;
    }
    for edge in chain.edges() {
        writeln!(
            out,
            "    \"{}\" -> \"{}\" [label=\"{:.2}\"];",
            edge.from, edge.to, edge.probability
        )?;
    }
    writeln!(out, "}}")
}
