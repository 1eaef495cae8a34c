//! Many independent market runs, fanned out across threads.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use stockpot_core::{CATALOG, Error, GameEnvironment, GoodId, Result};

use crate::market::Market;
use crate::scan::symbol_of;
use crate::shock::ShockConfig;

/// Parameters of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of independent runs
    pub runs: usize,
    /// Ticks per run
    pub ticks: usize,
    /// Seed of the first run; run `i` uses `base_seed + i`
    pub base_seed: u64,
    /// Number of catalog goods listed
    pub goods: usize,
    /// Environment shared by every run
    pub env: GameEnvironment,
    /// Shock settings shared by every run
    pub shocks: ShockConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            ticks: 1_000,
            base_seed: 0,
            goods: CATALOG.len(),
            env: GameEnvironment::default(),
            shocks: ShockConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Checks run and tick counts; the market validates the rest.
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(Error::validation_field("runs", "must be positive"));
        }
        if self.ticks == 0 {
            return Err(Error::validation_field("ticks", "must be positive"));
        }
        Ok(())
    }
}

/// Condensed result of one run in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Seed used
    pub seed: u64,
    /// Value of each good after the last tick
    pub final_values: Vec<f64>,
    /// Mean value of each good over the run
    pub mean_values: Vec<f64>,
    /// Ticks in which a shock fired
    pub shocks: usize,
}

/// Cross-run statistics for one good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchGoodStats {
    /// Good described
    pub id: GoodId,
    /// Ticker symbol
    pub symbol: String,
    /// Mean of final values across runs
    pub mean_final: f64,
    /// Lowest final value across runs
    pub min_final: f64,
    /// Highest final value across runs
    pub max_final: f64,
    /// Mean of per-run mean values
    pub mean_value: f64,
}

/// Result of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Runs completed
    pub runs: usize,
    /// Ticks per run
    pub ticks: usize,
    /// Total shocks across all runs
    pub shocks: usize,
    /// Per-run summaries in seed order
    pub summaries: Vec<RunSummary>,
    /// Per-good statistics in catalog order
    pub per_good: Vec<BatchGoodStats>,
}

fn run_one(config: &BatchConfig, seed: u64) -> Result<RunSummary> {
    let mut market = Market::new(config.env.clone(), seed)?
        .with_goods(config.goods)?
        .with_shocks(config.shocks)?;
    let series = market.run(config.ticks);
    let summary = series.summary();
    Ok(RunSummary {
        seed,
        final_values: summary.iter().map(|s| s.last).collect(),
        mean_values: summary.iter().map(|s| s.mean).collect(),
        shocks: series.shocks,
    })
}

/// Runs the batch in parallel. Results are ordered by seed regardless of
/// which thread finished first.
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    config.validate()?;
    tracing::info!(
        runs = config.runs,
        ticks = config.ticks,
        base_seed = config.base_seed,
        "Starting batch"
    );

    let summaries = (0..config.runs)
        .into_par_iter()
        .map(|i| run_one(config, config.base_seed.wrapping_add(i as u64)))
        .collect::<Result<Vec<_>>>()?;

    let runs = summaries.len() as f64;
    let per_good = (0..config.goods)
        .map(|col| {
            let id = GoodId::new(col as u8);
            let finals = summaries.iter().map(|s| s.final_values[col]);
            BatchGoodStats {
                id,
                symbol: symbol_of(id),
                mean_final: finals.clone().sum::<f64>() / runs,
                min_final: finals.clone().fold(f64::INFINITY, f64::min),
                max_final: finals.fold(f64::NEG_INFINITY, f64::max),
                mean_value: summaries.iter().map(|s| s.mean_values[col]).sum::<f64>() / runs,
            }
        })
        .collect();

    let shocks = summaries.iter().map(|s| s.shocks).sum();
    tracing::info!(runs = config.runs, shocks, "Batch finished");
    Ok(BatchReport {
        runs: config.runs,
        ticks: config.ticks,
        shocks,
        summaries,
        per_good,
    })
}
