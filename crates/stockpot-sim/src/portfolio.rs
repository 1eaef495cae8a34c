//! Cash, holdings and the buy/sell rules of the market.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stockpot_core::{Error, GameEnvironment, GoodId, Result};

/// Rounding slack when comparing order costs to cash on hand.
const CASH_EPSILON: f64 = 1e-9;

/// Warehouse space granted per bank level, for every good.
const STOCK_PER_BANK_LEVEL: u64 = 10;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Acquire shares
    Buy,
    /// Dispose of shares
    Sell,
}

/// Shares of one good and what was paid for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Shares held
    pub shares: u64,
    /// Total paid for the shares held, overhead included
    pub cost_basis: f64,
}

impl Holding {
    /// Average price paid per share, or zero when empty.
    pub fn average_cost(&self) -> f64 {
        if self.shares == 0 {
            0.0
        } else {
            self.cost_basis / self.shares as f64
        }
    }
}

/// A filled trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Good traded
    pub good: GoodId,
    /// Buy or sell
    pub side: Side,
    /// Shares traded
    pub quantity: u64,
    /// Market value per share at the time of the trade
    pub price: f64,
    /// Signed change in cash
    pub cash_delta: f64,
    /// Profit or loss realized by a sale (zero for buys)
    pub realized: f64,
}

/// A trader's cash and stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    cash: f64,
    holdings: BTreeMap<GoodId, Holding>,
    buildings: BTreeMap<GoodId, u32>,
    realized: f64,
}

impl Portfolio {
    /// Creates a portfolio with starting cash and no stock.
    pub fn new(cash: f64) -> Result<Self> {
        if !cash.is_finite() || cash < 0.0 {
            return Err(Error::validation_field(
                "cash",
                format!("must be a non-negative number, got {cash}"),
            ));
        }
        Ok(Self {
            cash,
            holdings: BTreeMap::new(),
            buildings: BTreeMap::new(),
            realized: 0.0,
        })
    }

    /// Records how many of a good's building the player owns.
    pub fn with_buildings(mut self, good: GoodId, count: u32) -> Self {
        self.buildings.insert(good, count);
        self
    }

    /// Cash on hand.
    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Total realized profit or loss.
    pub fn realized(&self) -> f64 {
        self.realized
    }

    /// Holding for a good, if any shares were ever bought.
    pub fn holding(&self, good: GoodId) -> Option<&Holding> {
        self.holdings.get(&good)
    }

    /// Shares held of a good.
    pub fn shares(&self, good: GoodId) -> u64 {
        self.holdings.get(&good).map_or(0, |h| h.shares)
    }

    /// Iterates over non-empty holdings.
    pub fn holdings(&self) -> impl Iterator<Item = (GoodId, &Holding)> {
        self.holdings
            .iter()
            .filter(|(_, h)| h.shares > 0)
            .map(|(id, h)| (*id, h))
    }

    /// Largest holding allowed for a good.
    pub fn max_stock(&self, good: GoodId, env: &GameEnvironment) -> u64 {
        let buildings = u64::from(self.buildings.get(&good).copied().unwrap_or(0));
        buildings + STOCK_PER_BANK_LEVEL * u64::from(env.bank_level)
    }

    /// Largest quantity that is both affordable and within the stock limit.
    pub fn max_affordable(&self, good: GoodId, price: f64, env: &GameEnvironment) -> u64 {
        if !price.is_finite() || price <= 0.0 {
            return 0;
        }
        let unit_cost = price * (1.0 + env.broker_overhead());
        let by_cash = ((self.cash + CASH_EPSILON) / unit_cost).floor() as u64;
        let room = self.max_stock(good, env).saturating_sub(self.shares(good));
        by_cash.min(room)
    }

    fn check_order(quantity: u64, price: f64) -> Result<()> {
        if quantity == 0 {
            return Err(Error::validation_field("quantity", "must be positive"));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(Error::validation_field(
                "price",
                format!("must be a positive number, got {price}"),
            ));
        }
        Ok(())
    }

    /// Buys shares at `price`, paying broker overhead on top.
    pub fn buy(
        &mut self,
        good: GoodId,
        quantity: u64,
        price: f64,
        env: &GameEnvironment,
    ) -> Result<Trade> {
        Self::check_order(quantity, price)?;

        let held = self.shares(good);
        let limit = self.max_stock(good, env);
        let requested = held.saturating_add(quantity);
        if requested > limit {
            return Err(Error::StockLimit {
                good,
                requested,
                limit,
            });
        }

        let cost = quantity as f64 * price * (1.0 + env.broker_overhead());
        if cost > self.cash + CASH_EPSILON {
            return Err(Error::InsufficientFunds {
                needed: cost,
                available: self.cash,
            });
        }

        self.cash = (self.cash - cost).max(0.0);
        let holding = self.holdings.entry(good).or_default();
        holding.shares = requested;
        holding.cost_basis += cost;

        tracing::debug!(%good, quantity, price, cost, "Bought");
        Ok(Trade {
            good,
            side: Side::Buy,
            quantity,
            price,
            cash_delta: -cost,
            realized: 0.0,
        })
    }

    /// Sells shares at `price`. Sales carry no overhead.
    pub fn sell(&mut self, good: GoodId, quantity: u64, price: f64) -> Result<Trade> {
        Self::check_order(quantity, price)?;

        let held = self.shares(good);
        if quantity > held {
            return Err(Error::InsufficientStock {
                good,
                requested: quantity,
                held,
            });
        }

        let holding = self.holdings.entry(good).or_default();
        let basis = holding.average_cost() * quantity as f64;
        let proceeds = quantity as f64 * price;
        let realized = proceeds - basis;

        holding.shares -= quantity;
        holding.cost_basis = if holding.shares == 0 {
            0.0
        } else {
            (holding.cost_basis - basis).max(0.0)
        };
        self.cash += proceeds;
        self.realized += realized;

        tracing::debug!(%good, quantity, price, realized, "Sold");
        Ok(Trade {
            good,
            side: Side::Sell,
            quantity,
            price,
            cash_delta: proceeds,
            realized,
        })
    }

    /// Cash plus holdings valued at `prices` (indexed by good).
    ///
    /// Goods without a price contribute nothing.
    pub fn net_worth(&self, prices: &[f64]) -> f64 {
        self.cash
            + self
                .holdings()
                .map(|(id, h)| prices.get(id.index()).copied().unwrap_or(0.0) * h.shares as f64)
                .sum::<f64>()
    }
}
