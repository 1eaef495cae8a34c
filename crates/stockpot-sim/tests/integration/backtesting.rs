//! Integration tests for strategy backtests.

use stockpot_sim::{
    GameEnvironment, HoldStrategy, Portfolio, Strategy, ThresholdStrategy, backtest,
};

use crate::common::TestHarness;

#[test]
fn test_hold_strategy_is_neutral() {
    let harness = TestHarness::new();
    let mut market = harness.market();
    let mut portfolio = Portfolio::new(1_000.0).unwrap();

    let report = backtest(&mut market, &mut HoldStrategy, &mut portfolio, 500);

    assert_eq!(report.trades, 0);
    assert_eq!(report.net_worth, 1_000.0);
}

#[test]
fn test_threshold_strategy_trades_in_volatile_market() {
    let harness = TestHarness::with_env(GameEnvironment::new(1, 10).with_dragon_boost(1.0));
    let mut market = harness.market();
    let mut portfolio = Portfolio::new(5_000.0).unwrap();
    let mut strategy = ThresholdStrategy::new(0.9, 1.1).unwrap();

    let report = backtest(&mut market, &mut strategy, &mut portfolio, 5_000);

    assert!(report.trades > 0, "a tight band should trade at least once");
    assert_eq!(report.rejected, 0);
    assert_eq!(report.strategy, "threshold");
    assert!((report.final_cash - portfolio.cash()).abs() < 1e-9);
}

#[test]
fn test_strategies_compared_on_same_seed() {
    let harness = TestHarness::new();
    let strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(HoldStrategy),
        Box::new(ThresholdStrategy::default()),
    ];

    let reports: Vec<_> = strategies
        .into_iter()
        .map(|mut strategy| {
            let mut market = harness.market();
            let mut portfolio = Portfolio::new(1_000.0).unwrap();
            backtest(&mut market, strategy.as_mut(), &mut portfolio, 1_000)
        })
        .collect();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].strategy, "hold");
    assert_eq!(reports[1].strategy, "threshold");
    assert_ne!(reports[0].run_id, reports[1].run_id);
}
