//! # stockpot-cli
//!
//! Command-line front end for the stockpot market simulator:
//! - Single seeded runs with table, CSV or JSON output
//! - Parallel batches of runs with aggregate statistics
//! - Strategy backtests
//! - Config file management

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod error;

pub use error::{Error, Result};
