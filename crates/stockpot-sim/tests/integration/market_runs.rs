//! Integration tests for scan-driven market runs.

use stockpot_sim::{GameEnvironment, GoodId, HISTORY_LEN, MarketMode, ShockConfig, Timeseries};

use crate::common::TestHarness;

#[test]
fn test_long_run_respects_invariants() {
    let harness = TestHarness::new();
    let mut market = harness.market();
    let series = market.run(5_000);

    assert_eq!(series.len(), 5_000);
    assert_eq!(series.goods.len(), 18);
    for row in &series.values {
        assert!(row.iter().all(|v| *v >= 1.0 && v.is_finite()));
    }
    for good in &market.state().goods {
        assert_eq!(good.history().len(), HISTORY_LEN);
        assert!(good.duration() >= 1);
    }
}

#[test]
fn test_every_mode_visited_over_long_run() {
    let harness = TestHarness::new();
    let series = harness.market().run(20_000);
    for mode in MarketMode::ALL {
        assert!(
            series.modes.iter().flatten().any(|m| *m == mode),
            "mode {mode} never occurred"
        );
    }
}

#[test]
fn test_higher_bank_level_lifts_prices() {
    let low = TestHarness::with_env(GameEnvironment::new(1, 0)).calm_market().run(3_000);
    let high = TestHarness::with_env(GameEnvironment::new(50, 0)).calm_market().run(3_000);

    let mean = |series: &Timeseries| {
        let column = series.column(GoodId::new(0)).unwrap();
        column.iter().sum::<f64>() / column.len() as f64
    };
    assert!(mean(&high) > mean(&low));
}

#[test]
fn test_frequent_shocks_are_counted() {
    let harness = TestHarness::new();
    let mut market = harness
        .market()
        .with_shocks(ShockConfig {
            chance: 1.0,
            max_magnitude: 1.0,
        })
        .unwrap();
    let series = market.run(100);
    assert_eq!(series.shocks, 100);
}

#[test]
fn test_calm_market_has_no_shocks() {
    let series = TestHarness::new().calm_market().run(1_000);
    assert_eq!(series.shocks, 0);
}

#[test]
fn test_csv_export_to_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("series.csv");
    let series = TestHarness::new().market().with_goods(3).unwrap().run(25);

    let file = std::fs::File::create(&path).unwrap();
    series.write_csv(file).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 26);
    assert_eq!(lines[0], "tick,CRL,CHC,BTR");
    assert!(lines[25].starts_with("25,"));
}

#[test]
fn test_json_roundtrip_of_series() {
    let series = TestHarness::new().market().with_goods(2).unwrap().run(10);
    let json = serde_json::to_string(&series).unwrap();
    let back: Timeseries = serde_json::from_str(&json).unwrap();
    assert_eq!(back.run_id, series.run_id);
    assert_eq!(back.ticks, series.ticks);
    assert_eq!(back.modes, series.modes);
    for (a, b) in back.values.iter().flatten().zip(series.values.iter().flatten()) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn test_state_snapshot_resumes_identically() {
    let harness = TestHarness::new();
    let mut market = harness.market();
    market.run(100);
    let mut fork = market.clone();
    let a = market.run(100);
    let b = fork.run(100);
    assert_eq!(a.values, b.values);
}
