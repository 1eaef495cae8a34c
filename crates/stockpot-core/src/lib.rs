#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Stockpot Core Library
//!
//! Core types shared by the stockpot simulator: the tradable goods catalog,
//! market modes, the game environment a market runs in, and the error type.

pub mod error;
pub mod types;

// Re-exports for convenience
pub use error::{Error, Result};
pub use types::{CATALOG, GameEnvironment, GoodId, GoodSpec, MarketMode, RunId};
