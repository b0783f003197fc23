//! # Match Forecast Walkthrough
//!
//! Follows one best-of-three match between a strong server (65% of service
//! points) and a slightly weaker one (60%), printing the match-win
//! probability after a series of live scores, then the derived level
//! probabilities and the match chain as Graphviz.

use tennis_markov::graph::write_dot;
use tennis_markov::levels::MatchChain;
use tennis_markov::{Absorber, Composer, MatchForecast, Result};

const SRV1: f64 = 0.65;
const SRV2: f64 = 0.60;

// ── Scores ───────────────────────────────────────────────────────────────────

const TIMELINE: &[(&str, &str, &str)] = &[
    ("0-0", "0-0", "first ball"),
    ("0-0", "2-4", "player two breaks early"),
    ("0-0", "6-6", "first set into a tie-break"),
    ("0-1", "0-0", "player two takes the tie-break"),
    ("0-1", "3-2", "player one back on serve with a break"),
    ("1-1", "0-0", "one set all"),
    ("1-1", "5-5", "deciding set, five all"),
    ("1-1", "SETv1", "player one serves it out"),
];

fn print_row(sets: &str, games: &str, note: &str, f: &MatchForecast) {
    println!(
        "  {:>4}  {:>6}   set {:>6.2}%   match {:>6.2}%   {}",
        sets,
        games,
        100.0 * f.current_set.first,
        100.0 * f.p_win_1(),
        note
    );
}

fn main() -> Result<()> {
    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║  Match forecast: {:.0}% vs {:.0}% on serve                               ║", SRV1 * 100.0, SRV2 * 100.0);
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    let composer = Composer::default();

    println!("▶  Live scores (player one's chances)\n");
    println!("  sets   games   current set      match");
    for &(sets, games, note) in TIMELINE {
        let forecast = composer.forecast(SRV1, SRV2, sets, games)?;
        print_row(sets, games, note, &forecast);
    }

    println!("\n▶  Derived levels\n");
    let levels = composer.level_probabilities(SRV1, SRV2)?;
    println!("  hold1 = {:.4}   hold2 = {:.4}", levels.hold1, levels.hold2);
    println!("  tie1  = {:.4}   set1  = {:.4}", levels.tie1, levels.set1);

    println!("\n▶  Power iteration vs exact solve\n");
    let power = composer.forecast(SRV1, SRV2, "0-0", "0-0")?;
    let exact = Composer::new(Absorber::exact()).forecast(SRV1, SRV2, "0-0", "0-0")?;
    println!("  power: {:.12}", power.p_win_1());
    println!("  exact: {:.12}", exact.p_win_1());
    println!("  Δ      {:.3e}", (power.p_win_1() - exact.p_win_1()).abs());

    println!("\n▶  Match chain (dot)\n");
    let chain = MatchChain::best_of_three(levels.set1)?;
    let mut dot = String::new();
    if write_dot(&chain, &mut dot).is_ok() {
        print!("{dot}");
    }
    Ok(())
}
