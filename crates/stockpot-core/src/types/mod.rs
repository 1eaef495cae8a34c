//! Core types for stockpot markets.

mod catalog;
mod environment;
mod ids;
mod mode;
mod proptests;

pub use catalog::{CATALOG, GoodSpec};
pub use environment::GameEnvironment;
pub use ids::{GoodId, RunId};
pub use mode::MarketMode;
