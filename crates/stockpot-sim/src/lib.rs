#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Stockpot Simulation Library
//!
//! The tick engine of the stock-market minigame: goods drifting through
//! market modes, market-wide shocks, scan-driven runs that produce
//! timeseries, plus a portfolio, pluggable trading strategies and parallel
//! batch runs built on top of it.

pub mod backtest;
pub mod batch;
pub mod good;
pub mod market;
pub mod portfolio;
mod proptests;
pub mod scan;
pub mod shock;
pub mod strategy;

// Re-export core types
pub use stockpot_core::{Error, GameEnvironment, GoodId, MarketMode, Result};

pub use backtest::{BacktestReport, backtest};
pub use batch::{BatchConfig, BatchReport, run_batch};
pub use good::{Good, HISTORY_LEN};
pub use market::{Market, MarketSnapshot, MarketState};
pub use portfolio::{Holding, Portfolio, Side, Trade};
pub use scan::{GoodSummary, Timeseries, scan};
pub use shock::{GlobalShock, ShockConfig};
pub use strategy::{HoldStrategy, Order, Strategy, ThresholdStrategy};
