//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{OutputFormat, StockpotConfig};

/// Stockpot - stock-market minigame simulator
#[derive(Parser, Debug)]
#[command(name = "stockpot", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "STOCKPOT_CONFIG")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub market: MarketArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Market overrides shared by every command.
///
/// Environment overrides use the config file's names
/// (`STOCKPOT_MARKET_BANK_LEVEL`, ...) and are applied when the config loads.
#[derive(Args, Debug, Default, Clone)]
pub struct MarketArgs {
    /// Bank building level
    #[arg(long, global = true)]
    pub bank_level: Option<u32>,

    /// Brokers hired
    #[arg(long, global = true)]
    pub brokers: Option<u32>,

    /// Dragon aura boost in [0, 1]
    #[arg(long, global = true)]
    pub dragon_boost: Option<f64>,

    /// Number of catalog goods in the market
    #[arg(long, global = true)]
    pub goods: Option<usize>,
}

/// Where and how a report is printed.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputArgs {
    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run-length overrides shared by the simulation commands.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Ticks to simulate
    #[arg(short, long)]
    pub ticks: Option<usize>,

    /// Random seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Report destination
    #[command(flatten)]
    pub report: OutputArgs,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one market and report its timeseries
    Simulate {
        /// Run length, seed and output
        #[command(flatten)]
        run: RunArgs,
    },

    /// Run many seeded markets in parallel and report aggregate statistics
    Batch {
        /// Run length, base seed and output
        #[command(flatten)]
        run: RunArgs,

        /// Number of runs
        #[arg(short, long)]
        runs: Option<usize>,
    },

    /// Trade a strategy against a simulated market
    Backtest {
        /// Run length, seed and output
        #[command(flatten)]
        run: RunArgs,

        /// Strategy to trade with
        #[arg(long, value_enum, default_value_t = StrategyKind::Threshold)]
        strategy: StrategyKind,

        /// Buy when value drops below this fraction of resting value
        #[arg(long, default_value_t = 0.5)]
        buy_below: f64,

        /// Sell when value rises above this fraction of resting value
        #[arg(long, default_value_t = 1.5)]
        sell_above: f64,

        /// Starting cash
        #[arg(long, default_value_t = 1_000.0)]
        cash: f64,
    },

    /// List tradable goods
    Goods {
        /// Output format and destination
        #[command(flatten)]
        report: OutputArgs,
    },

    /// Manage the configuration file
    Config {
        /// Config operation
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Strategies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    /// Never trade
    Hold,
    /// Buy under and sell over fractions of resting value
    Threshold,
}

/// `config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,

    /// Print a value by dotted key (e.g. `market.bank_level`)
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },

    /// Write a default config file
    Init {
        /// Where to write it
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration as environment variables
    Export {
        /// Prefix each line with `export`
        #[arg(long)]
        shell: bool,
    },
}

impl MarketArgs {
    /// Applies flag overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut StockpotConfig) {
        if let Some(level) = self.bank_level {
            config.market.bank_level = level;
        }
        if let Some(brokers) = self.brokers {
            config.market.brokers = brokers;
        }
        if let Some(boost) = self.dragon_boost {
            config.market.dragon_boost = boost;
        }
        if let Some(goods) = self.goods {
            config.market.goods = goods;
        }
    }
}

impl RunArgs {
    /// Applies flag overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut StockpotConfig) {
        if let Some(ticks) = self.ticks {
            config.simulation.ticks = ticks;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        self.report.apply(config);
    }
}

impl OutputArgs {
    /// Applies the format override on top of a loaded configuration.
    pub fn apply(&self, config: &mut StockpotConfig) {
        if let Some(format) = self.format {
            config.output.format = format;
        }
    }
}
