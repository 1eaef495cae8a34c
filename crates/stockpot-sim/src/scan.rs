//! Scan-style iteration and the timeseries it produces.
//!
//! [`scan`] threads an owned state through a step function `n` times and
//! collects one output per step. [`Timeseries`] is the stacked output of a
//! market scan: one row per tick, one column per good.

use std::io;

use serde::{Deserialize, Serialize};
use stockpot_core::{Error, GoodId, GoodSpec, MarketMode, Result, RunId};

use crate::market::MarketSnapshot;

/// Applies `step` to `init` `n` times, collecting every output.
///
/// Returns the final state alongside the outputs in step order.
///
/// # Examples
///
/// ```
/// use stockpot_sim::scan::scan;
///
/// let (total, partials) = scan(0, 4, |acc| (acc + 1, acc + 1));
/// assert_eq!(total, 4);
/// assert_eq!(partials, vec![1, 2, 3, 4]);
/// ```
pub fn scan<S, Y, F>(init: S, n: usize, mut step: F) -> (S, Vec<Y>)
where
    F: FnMut(S) -> (S, Y),
{
    let mut state = init;
    let mut outputs = Vec::with_capacity(n);
    for _ in 0..n {
        let (next, output) = step(state);
        state = next;
        outputs.push(output);
    }
    (state, outputs)
}

/// Per-tick values and modes of every good in a market run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    /// Run that produced this series
    pub run_id: RunId,
    /// Seed the run was started with
    pub seed: u64,
    /// Goods in column order
    pub goods: Vec<GoodId>,
    /// Tick number of each row
    pub ticks: Vec<u64>,
    /// `values[row][column]`
    pub values: Vec<Vec<f64>>,
    /// `modes[row][column]`
    pub modes: Vec<Vec<MarketMode>>,
    /// Number of ticks in which a global shock fired
    pub shocks: usize,
}

/// Statistics of one good over a timeseries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodSummary {
    /// Good described
    pub id: GoodId,
    /// Ticker symbol
    pub symbol: String,
    /// Mean value
    pub mean: f64,
    /// Lowest value
    pub min: f64,
    /// Highest value
    pub max: f64,
    /// Value after the first tick
    pub first: f64,
    /// Value after the last tick
    pub last: f64,
    /// Fraction of ticks spent in each mode, indexed by [`MarketMode::index`]
    pub mode_share: [f64; 6],
}

impl Timeseries {
    /// Stacks market snapshots into a timeseries.
    pub fn from_snapshots(
        run_id: RunId,
        seed: u64,
        goods: Vec<GoodId>,
        snapshots: Vec<MarketSnapshot>,
    ) -> Self {
        let mut ticks = Vec::with_capacity(snapshots.len());
        let mut values = Vec::with_capacity(snapshots.len());
        let mut modes = Vec::with_capacity(snapshots.len());
        let mut shocks = 0;
        for snapshot in snapshots {
            if snapshot.shock.is_active() {
                shocks += 1;
            }
            ticks.push(snapshot.tick);
            values.push(snapshot.values);
            modes.push(snapshot.modes);
        }
        Self {
            run_id,
            seed,
            goods,
            ticks,
            values,
            modes,
            shocks,
        }
    }

    /// Number of rows (ticks).
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Returns `true` if no ticks were recorded.
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    fn column_index(&self, good: GoodId) -> Result<usize> {
        self.goods
            .iter()
            .position(|g| *g == good)
            .ok_or(Error::GoodNotFound { id: good })
    }

    /// Returns the value column of one good.
    pub fn column(&self, good: GoodId) -> Result<Vec<f64>> {
        let col = self.column_index(good)?;
        Ok(self.values.iter().map(|row| row[col]).collect())
    }

    /// Returns the last row of values, if any.
    pub fn final_values(&self) -> Option<&[f64]> {
        self.values.last().map(Vec::as_slice)
    }

    /// Summarizes every good. Returns an empty list for an empty series.
    pub fn summary(&self) -> Vec<GoodSummary> {
        if self.is_empty() {
            return Vec::new();
        }
        let rows = self.len() as f64;
        self.goods
            .iter()
            .enumerate()
            .map(|(col, &id)| {
                let mut sum = 0.0;
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                let mut mode_counts = [0usize; 6];
                for (values, modes) in self.values.iter().zip(&self.modes) {
                    let v = values[col];
                    sum += v;
                    min = min.min(v);
                    max = max.max(v);
                    mode_counts[modes[col].index()] += 1;
                }
                let mut mode_share = [0.0; 6];
                for (share, count) in mode_share.iter_mut().zip(mode_counts) {
                    *share = count as f64 / rows;
                }
                GoodSummary {
                    id,
                    symbol: symbol_of(id),
                    mean: sum / rows,
                    min,
                    max,
                    first: self.values[0][col],
                    last: self.values[self.len() - 1][col],
                    mode_share,
                }
            })
            .collect()
    }

    /// Writes the value matrix as CSV with a `tick,SYM,...` header.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let mut header = Vec::with_capacity(self.goods.len() + 1);
        header.push("tick".to_string());
        header.extend(self.goods.iter().map(|&id| symbol_of(id)));
        csv.write_record(&header).map_err(io::Error::from)?;

        for (tick, row) in self.ticks.iter().zip(&self.values) {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(tick.to_string());
            record.extend(row.iter().map(|v| format!("{v:.4}")));
            csv.write_record(&record).map_err(io::Error::from)?;
        }
        csv.flush()?;
        Ok(())
    }
}

pub(crate) fn symbol_of(id: GoodId) -> String {
    GoodSpec::get(id)
        .map(|spec| spec.symbol.to_string())
        .unwrap_or_else(|| format!("G{id}"))
}
