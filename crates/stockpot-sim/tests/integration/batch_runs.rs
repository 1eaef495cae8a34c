//! Integration tests for parallel batches.

use stockpot_sim::{BatchConfig, GameEnvironment, ShockConfig, run_batch};

#[test]
fn test_batch_is_reproducible() {
    let config = BatchConfig {
        runs: 16,
        ticks: 300,
        base_seed: 1_000,
        goods: 6,
        ..BatchConfig::default()
    };
    let a = run_batch(&config).unwrap();
    let b = run_batch(&config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_batch_with_boost_and_no_shocks() {
    let config = BatchConfig {
        runs: 4,
        ticks: 500,
        base_seed: 0,
        goods: 18,
        env: GameEnvironment::new(3, 0).with_dragon_boost(0.5),
        shocks: ShockConfig::disabled(),
    };
    let report = run_batch(&config).unwrap();
    assert_eq!(report.shocks, 0);
    assert_eq!(report.per_good.len(), 18);
    assert_eq!(report.per_good[17].symbol, "YST");
}

#[test]
fn test_batch_rejects_invalid_environment() {
    let config = BatchConfig {
        env: GameEnvironment::new(1, 0).with_dragon_boost(2.0),
        ..BatchConfig::default()
    };
    assert!(run_batch(&config).is_err());
}
