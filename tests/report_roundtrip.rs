//! Forecast reports through serde_json.
#![cfg(feature = "serde")]

use tennis_markov::report::{ForecastReport, REPORT_VERSION};
use tennis_markov::{Absorber, Composer, Outcome};

// ─── helpers ─────────────────────────────────────────────────────────────────

fn assert_outcome_close(a: &Outcome, b: &Outcome) {
    assert!((a.first - b.first).abs() < 1e-15, "{:?} vs {:?}", a, b);
    assert!((a.second - b.second).abs() < 1e-15, "{:?} vs {:?}", a, b);
}

// ─── tests ───────────────────────────────────────────────────────────────────

#[test]
fn test_report_survives_json() {
    let report = ForecastReport::compute(&Composer::default(), 0.65, 0.60, "1-0", "3-2").unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let restored: ForecastReport = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.version, REPORT_VERSION);
    assert_eq!(restored.inputs, report.inputs);
    assert_outcome_close(&restored.outcome, &report.outcome);
    assert_outcome_close(&restored.current_set, &report.current_set);
    assert!((restored.levels.set1 - report.levels.set1).abs() < 1e-15);
}

#[test]
fn test_report_json_shape() {
    let report = ForecastReport::compute(&Composer::default(), 0.6, 0.6, "0-0", "0-0").unwrap();
    let value: serde_json::Value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["version"], 1);
    assert_eq!(value["inputs"]["set_score"], "0-0");
    assert!(value["levels"]["hold1"].is_f64());
    assert!((value["outcome"]["first"].as_f64().unwrap() - 0.5).abs() < 1e-9);
    assert!((report.p_win_1() - 0.5).abs() < 1e-9);
}

#[test]
fn test_report_rejects_bad_score() {
    assert!(ForecastReport::compute(&Composer::default(), 0.6, 0.6, "2-1", "0-0").is_err());
}

#[test]
fn test_composer_config_round_trips() {
    let composer = Composer::new(Absorber::exact());
    let json = serde_json::to_string(&composer).unwrap();
    let restored: Composer = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, composer);
}
