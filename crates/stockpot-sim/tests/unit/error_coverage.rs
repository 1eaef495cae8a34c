//! Tests for error paths reachable through the public API.

use stockpot_sim::{Error, GameEnvironment, GoodId, Market, Portfolio, ShockConfig};

#[test]
fn test_market_rejects_zero_bank_level() {
    let err = Market::new(GameEnvironment::new(0, 0), 1).unwrap_err();
    match &err {
        Error::Validation { field, .. } => assert_eq!(field.as_deref(), Some("bank_level")),
        _ => unreachable!("Expected Validation error"),
    }
    assert!(err.is_user_error());
}

#[test]
fn test_market_rejects_bad_shock_config() {
    let result = Market::new(GameEnvironment::default(), 1)
        .unwrap()
        .with_shocks(ShockConfig {
            chance: f64::NAN,
            max_magnitude: 1.0,
        });
    assert!(matches!(result, Err(Error::Validation { .. })));
}

#[test]
fn test_unknown_good_lookup() {
    let mut market = Market::new(GameEnvironment::default(), 1).unwrap();
    let err = market.good_mut(GoodId::new(99)).unwrap_err();
    assert_eq!(err.to_string(), "Good not found: 99");
}

#[test]
fn test_portfolio_errors_are_user_errors() {
    let env = GameEnvironment::default();
    let mut portfolio = Portfolio::new(1.0).unwrap();
    let good = GoodId::new(0);
    assert!(portfolio.buy(good, 1, 10.0, &env).unwrap_err().is_user_error());
    assert!(portfolio.sell(good, 1, 10.0).unwrap_err().is_user_error());
    assert!(portfolio.buy(good, 1_000, 0.0001, &env).unwrap_err().is_user_error());
}
