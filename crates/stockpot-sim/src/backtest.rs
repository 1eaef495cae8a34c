//! Running a strategy against a simulated market.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockpot_core::{Error, Result, RunId};

use crate::market::Market;
use crate::portfolio::{Portfolio, Side, Trade};
use crate::strategy::{Order, Strategy};

/// Outcome of a backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Market run the strategy traded in
    pub run_id: RunId,
    /// Strategy name
    pub strategy: String,
    /// Ticks simulated
    pub ticks: usize,
    /// Orders filled
    pub trades: usize,
    /// Orders rejected by the portfolio
    pub rejected: usize,
    /// Cash at the end
    pub final_cash: f64,
    /// Cash plus holdings at final prices
    pub net_worth: f64,
    /// Realized profit or loss
    pub realized: f64,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Wall-clock end
    pub finished_at: DateTime<Utc>,
}

impl BacktestReport {
    /// Net worth gained or lost relative to the starting cash.
    pub fn return_on(&self, starting_cash: f64) -> f64 {
        if starting_cash == 0.0 {
            0.0
        } else {
            (self.net_worth - starting_cash) / starting_cash
        }
    }
}

fn execute(
    portfolio: &mut Portfolio,
    order: &Order,
    price: Option<f64>,
    market: &Market,
) -> Result<Trade> {
    let price = price.ok_or(Error::GoodNotFound { id: order.good })?;
    match order.side {
        Side::Buy => portfolio.buy(order.good, order.quantity, price, market.env()),
        Side::Sell => portfolio.sell(order.good, order.quantity, price),
    }
}

/// Ticks `market` `ticks` times, letting `strategy` trade after every tick.
///
/// Rejected orders are logged and counted; they never stop the run.
pub fn backtest<S: Strategy + ?Sized>(
    market: &mut Market,
    strategy: &mut S,
    portfolio: &mut Portfolio,
    ticks: usize,
) -> BacktestReport {
    let started_at = Utc::now();
    tracing::info!(
        run_id = %market.run_id(),
        strategy = strategy.name(),
        ticks,
        cash = portfolio.cash(),
        "Starting backtest"
    );

    let mut trades = 0;
    let mut rejected = 0;
    let mut last_prices = market.snapshot().values;

    for _ in 0..ticks {
        let snapshot = market.tick();
        let orders = strategy.decide(&snapshot, portfolio, market.env());
        for order in &orders {
            match execute(portfolio, order, snapshot.price(order.good), market) {
                Ok(_) => trades += 1,
                Err(e) => {
                    rejected += 1;
                    tracing::warn!(
                        tick = snapshot.tick,
                        good = %order.good,
                        error = %e,
                        "Order rejected"
                    );
                }
            }
        }
        last_prices = snapshot.values;
    }

    let report = BacktestReport {
        run_id: market.run_id(),
        strategy: strategy.name().to_string(),
        ticks,
        trades,
        rejected,
        final_cash: portfolio.cash(),
        net_worth: portfolio.net_worth(&last_prices),
        realized: portfolio.realized(),
        started_at,
        finished_at: Utc::now(),
    };
    tracing::info!(
        run_id = %report.run_id,
        trades = report.trades,
        rejected = report.rejected,
        net_worth = report.net_worth,
        "Backtest finished"
    );
    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::market::MarketSnapshot;
    use crate::strategy::{HoldStrategy, ThresholdStrategy};
    use stockpot_core::{GameEnvironment, GoodId};

    /// Tries to sell stock it never bought.
    struct OversellStrategy;

    impl Strategy for OversellStrategy {
        fn name(&self) -> &str {
            "oversell"
        }

        fn decide(&mut self, _: &MarketSnapshot, _: &Portfolio, _: &GameEnvironment) -> Vec<Order> {
            vec![Order::sell(GoodId::new(0), 1)]
        }
    }

    #[test]
    fn test_hold_keeps_cash() {
        let mut market = Market::new(GameEnvironment::default(), 1).unwrap();
        let mut portfolio = Portfolio::new(500.0).unwrap();
        let report = backtest(&mut market, &mut HoldStrategy, &mut portfolio, 100);
        assert_eq!(report.trades, 0);
        assert_eq!(report.final_cash, 500.0);
        assert_eq!(report.net_worth, 500.0);
        assert_eq!(report.return_on(500.0), 0.0);
        assert_eq!(market.state().tick, 100);
    }

    #[test]
    fn test_rejections_counted_not_fatal() {
        let mut market = Market::new(GameEnvironment::default(), 2).unwrap();
        let mut portfolio = Portfolio::new(50.0).unwrap();
        let report = backtest(&mut market, &mut OversellStrategy, &mut portfolio, 20);
        assert_eq!(report.rejected, 20);
        assert_eq!(report.trades, 0);
        assert_eq!(report.ticks, 20);
    }

    #[test]
    fn test_threshold_backtest_accounts_balance() {
        let mut market = Market::new(GameEnvironment::new(2, 5), 3).unwrap();
        let mut portfolio = Portfolio::new(2_000.0).unwrap();
        let mut strategy = ThresholdStrategy::new(0.8, 1.2).unwrap();
        let report = backtest(&mut market, &mut strategy, &mut portfolio, 2_000);
        assert_eq!(report.rejected, 0);
        assert!(report.final_cash >= 0.0);
        assert!(report.net_worth >= report.final_cash);
        assert!(report.finished_at >= report.started_at);
    }

    #[test]
    fn test_backtest_through_trait_object() {
        let mut market = Market::new(GameEnvironment::default(), 4).unwrap();
        let mut portfolio = Portfolio::new(100.0).unwrap();
        let mut strategy: Box<dyn Strategy> = Box::new(HoldStrategy);
        let report = backtest(&mut market, strategy.as_mut(), &mut portfolio, 5);
        assert_eq!(report.strategy, "hold");
    }
}
