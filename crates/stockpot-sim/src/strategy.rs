//! Trading strategies that turn market snapshots into orders.

use serde::{Deserialize, Serialize};
use stockpot_core::{Error, GameEnvironment, GoodId, Result};

use crate::market::MarketSnapshot;
use crate::portfolio::{Portfolio, Side};

/// A request to trade some quantity of one good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Good to trade
    pub good: GoodId,
    /// Buy or sell
    pub side: Side,
    /// Shares to trade
    pub quantity: u64,
}

impl Order {
    /// Creates a buy order.
    pub fn buy(good: GoodId, quantity: u64) -> Self {
        Self {
            good,
            side: Side::Buy,
            quantity,
        }
    }

    /// Creates a sell order.
    pub fn sell(good: GoodId, quantity: u64) -> Self {
        Self {
            good,
            side: Side::Sell,
            quantity,
        }
    }
}

/// Decides what to trade after each tick.
pub trait Strategy: Send {
    /// Short name used in reports.
    fn name(&self) -> &str;

    /// Returns the orders to place at the prices in `snapshot`.
    fn decide(
        &mut self,
        snapshot: &MarketSnapshot,
        portfolio: &Portfolio,
        env: &GameEnvironment,
    ) -> Vec<Order>;
}

/// Never trades. Baseline for comparisons.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldStrategy;

impl Strategy for HoldStrategy {
    fn name(&self) -> &str {
        "hold"
    }

    fn decide(&mut self, _: &MarketSnapshot, _: &Portfolio, _: &GameEnvironment) -> Vec<Order> {
        Vec::new()
    }
}

/// Buys goods trading well under their resting value and sells them once
/// they trade well over it.
///
/// Thresholds are fractions of each good's resting value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdStrategy {
    buy_below: f64,
    sell_above: f64,
}

impl ThresholdStrategy {
    /// Creates a threshold strategy. `buy_below` must be below `sell_above`.
    pub fn new(buy_below: f64, sell_above: f64) -> Result<Self> {
        if !buy_below.is_finite() || buy_below <= 0.0 {
            return Err(Error::validation_field(
                "buy_below",
                format!("must be a positive number, got {buy_below}"),
            ));
        }
        if !sell_above.is_finite() || sell_above <= buy_below {
            return Err(Error::validation_field(
                "sell_above",
                format!("must be greater than buy_below ({buy_below}), got {sell_above}"),
            ));
        }
        Ok(Self {
            buy_below,
            sell_above,
        })
    }

    /// Fraction of resting value under which goods are bought.
    pub fn buy_below(&self) -> f64 {
        self.buy_below
    }

    /// Fraction of resting value over which goods are sold.
    pub fn sell_above(&self) -> f64 {
        self.sell_above
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self {
            buy_below: 0.5,
            sell_above: 1.5,
        }
    }
}

impl Strategy for ThresholdStrategy {
    fn name(&self) -> &str {
        "threshold"
    }

    fn decide(
        &mut self,
        snapshot: &MarketSnapshot,
        portfolio: &Portfolio,
        env: &GameEnvironment,
    ) -> Vec<Order> {
        let mut orders = Vec::new();
        // Orders are replayed on a scratch copy so that sells fund later buys
        // and no two buys spend the same cash.
        let mut scratch = portfolio.clone();
        for (good, price) in snapshot.prices() {
            let held = scratch.shares(good);
            if held > 0
                && price > env.resting_value(good) * self.sell_above
                && scratch.sell(good, held, price).is_ok()
            {
                orders.push(Order::sell(good, held));
            }
        }
        for (good, price) in snapshot.prices() {
            if price >= env.resting_value(good) * self.buy_below {
                continue;
            }
            let quantity = scratch.max_affordable(good, price, env);
            if quantity > 0 && scratch.buy(good, quantity, price, env).is_ok() {
                orders.push(Order::buy(good, quantity));
            }
        }
        orders
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shock::GlobalShock;
    use stockpot_core::MarketMode;

    fn snapshot(values: Vec<f64>) -> MarketSnapshot {
        let n = values.len();
        MarketSnapshot {
            tick: 1,
            values,
            deltas: vec![0.0; n],
            modes: vec![MarketMode::Stable; n],
            shock: GlobalShock::NONE,
            shocked_goods: 0,
        }
    }

    #[test]
    fn test_threshold_validation() {
        assert!(ThresholdStrategy::new(0.5, 1.5).is_ok());
        assert!(ThresholdStrategy::new(0.0, 1.5).is_err());
        assert!(ThresholdStrategy::new(1.5, 1.0).is_err());
        assert!(ThresholdStrategy::new(0.5, f64::INFINITY).is_err());
    }

    #[test]
    fn test_hold_never_orders() {
        let env = GameEnvironment::default();
        let portfolio = Portfolio::new(1_000.0).unwrap();
        let orders = HoldStrategy.decide(&snapshot(vec![1.0, 500.0]), &portfolio, &env);
        assert!(orders.is_empty());
    }

    #[test]
    fn test_threshold_buys_cheap_goods() {
        let env = GameEnvironment::default();
        let portfolio = Portfolio::new(1_000.0).unwrap();
        let mut strategy = ThresholdStrategy::default();
        // CRL rests at 10 and trades at 4; CHC rests at 20 and trades at 20.
        let orders = strategy.decide(&snapshot(vec![4.0, 20.0]), &portfolio, &env);
        assert_eq!(orders, vec![Order::buy(GoodId::new(0), 10)]);
    }

    #[test]
    fn test_threshold_sells_expensive_holdings() {
        let env = GameEnvironment::default();
        let mut portfolio = Portfolio::new(1_000.0).unwrap();
        portfolio.buy(GoodId::new(1), 3, 10.0, &env).unwrap();
        let mut strategy = ThresholdStrategy::default();
        let orders = strategy.decide(&snapshot(vec![10.0, 35.0]), &portfolio, &env);
        assert_eq!(orders, vec![Order::sell(GoodId::new(1), 3)]);
    }

    #[test]
    fn test_threshold_buys_limited_by_cash() {
        let env = GameEnvironment::default();
        let portfolio = Portfolio::new(10.0).unwrap();
        let mut strategy = ThresholdStrategy::default();
        let orders = strategy.decide(&snapshot(vec![4.0, 8.0]), &portfolio, &env);
        // 10 / 4.8 buys two CRL; the leftover cannot afford CHC at 9.6.
        assert_eq!(orders, vec![Order::buy(GoodId::new(0), 2)]);
    }
}
