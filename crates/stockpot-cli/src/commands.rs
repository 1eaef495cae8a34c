//! Command execution and report rendering.

use std::fs::File;
use std::io::{self, Write};

use serde::Serialize;
use stockpot_core::{CATALOG, GoodSpec, MarketMode};
use stockpot_sim::{
    BacktestReport, BatchConfig, BatchReport, GoodSummary, HoldStrategy, Market, Portfolio,
    Strategy, ThresholdStrategy, Timeseries, backtest, run_batch,
};

use crate::cli::{Cli, Command, MarketArgs, OutputArgs, RunArgs, StrategyKind};
use crate::config::{OutputFormat, StockpotConfig};
use crate::config_handlers::{effective_config, handle_config_command};
use crate::error::{Error, Result};

/// Runs the parsed command line.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Config { action } => handle_config_command(config_path, &cli.market, action),
        Command::Goods { report } => {
            let mut config = effective_config(config_path, &cli.market)?;
            report.apply(&mut config);
            config.validate()?;
            emit(&report, config.output.format, |out, format| {
                write_goods(&config, format, out)
            })
        }
        Command::Simulate { run } => {
            let config = prepare(config_path, &cli.market, &run)?;
            let seed = resolve_seed(&config);
            let format = config.output.format;
            let series = blocking(move || simulate(&config, seed)).await??;
            emit(&run.report, format, |out, format| {
                write_series(&series, format, out)
            })
        }
        Command::Batch { run, runs } => {
            let mut config = prepare(config_path, &cli.market, &run)?;
            if let Some(runs) = runs {
                config.simulation.runs = runs;
            }
            config.validate()?;
            let batch = batch_config(&config, resolve_seed(&config));
            let report = blocking(move || run_batch(&batch)).await??;
            emit(&run.report, config.output.format, |out, format| {
                write_batch(&report, format, out)
            })
        }
        Command::Backtest {
            run,
            strategy,
            buy_below,
            sell_above,
            cash,
        } => {
            let config = prepare(config_path, &cli.market, &run)?;
            let seed = resolve_seed(&config);
            let mut strategy: Box<dyn Strategy> = match strategy {
                StrategyKind::Hold => Box::new(HoldStrategy),
                StrategyKind::Threshold => Box::new(ThresholdStrategy::new(buy_below, sell_above)?),
            };
            let mut portfolio = Portfolio::new(cash)?;
            let format = config.output.format;
            let report = blocking(move || -> Result<BacktestReport> {
                let mut market = build_market(&config, seed)?;
                Ok(backtest(
                    &mut market,
                    strategy.as_mut(),
                    &mut portfolio,
                    config.simulation.ticks,
                ))
            })
            .await??;
            emit(&run.report, format, |out, format| {
                write_backtest(&report, cash, format, out)
            })
        }
    }
}

/// Loads the config file and layers flag overrides on top.
fn prepare(
    config_path: Option<&str>,
    market: &MarketArgs,
    run: &RunArgs,
) -> Result<StockpotConfig> {
    let mut config = effective_config(config_path, market)?;
    run.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn resolve_seed(config: &StockpotConfig) -> u64 {
    config.simulation.seed.unwrap_or_else(|| {
        let seed = rand::random::<u64>();
        tracing::info!(seed, "No seed configured, drew a random one");
        seed
    })
}

/// Runs CPU-bound work off the async runtime.
async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::task(format!("simulation task failed: {e}")))
}

fn build_market(config: &StockpotConfig, seed: u64) -> Result<Market> {
    Ok(Market::new(config.environment(), seed)?
        .with_goods(config.market.goods)?
        .with_shocks(config.shocks())?)
}

/// Runs a single market for the configured number of ticks.
pub fn simulate(config: &StockpotConfig, seed: u64) -> Result<Timeseries> {
    let mut market = build_market(config, seed)?;
    Ok(market.run(config.simulation.ticks))
}

/// Translates the CLI configuration into a batch configuration.
pub fn batch_config(config: &StockpotConfig, base_seed: u64) -> BatchConfig {
    BatchConfig {
        runs: config.simulation.runs,
        ticks: config.simulation.ticks,
        base_seed,
        goods: config.market.goods,
        env: config.environment(),
        shocks: config.shocks(),
    }
}

/// Sends a report to `--output` or stdout.
fn emit<F>(report: &OutputArgs, format: OutputFormat, render: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write, OutputFormat) -> Result<()>,
{
    match &report.output {
        Some(path) => {
            let mut file = File::create(path).map_err(|e| Error::io_with_path(e, path))?;
            render(&mut file, format).map_err(|e| e.at_path(path))?;
            file.flush().map_err(|e| Error::io_with_path(e, path))?;
            tracing::info!(path = %path.display(), "Report written");
            Ok(())
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            render(&mut lock, format)
        }
    }
}

fn write_json<T: Serialize>(value: &T, out: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out).map_err(Error::Write)
}

fn dominant_mode(summary: &GoodSummary) -> MarketMode {
    let mut best = 0;
    for (i, share) in summary.mode_share.iter().enumerate() {
        if *share > summary.mode_share[best] {
            best = i;
        }
    }
    MarketMode::from_index(best).unwrap_or(MarketMode::Stable)
}

/// Renders a timeseries.
pub fn write_series(series: &Timeseries, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(series, out),
        OutputFormat::Csv => Ok(series.write_csv(out)?),
        OutputFormat::Table => {
            writeln!(
                out,
                "run {} (seed {}): {} ticks, {} shocks",
                series.run_id,
                series.seed,
                series.len(),
                series.shocks
            )
            .map_err(Error::Write)?;
            writeln!(
                out,
                "{:<4} {:>9} {:>9} {:>9} {:>9}  {}",
                "SYM", "mean", "min", "max", "last", "mostly"
            )
            .map_err(Error::Write)?;
            for summary in series.summary() {
                writeln!(
                    out,
                    "{:<4} {:>9.2} {:>9.2} {:>9.2} {:>9.2}  {}",
                    summary.symbol,
                    summary.mean,
                    summary.min,
                    summary.max,
                    summary.last,
                    dominant_mode(&summary)
                )
                .map_err(Error::Write)?;
            }
            Ok(())
        }
    }
}

/// Renders a batch report.
pub fn write_batch(report: &BatchReport, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(report, out),
        OutputFormat::Csv => {
            writeln!(out, "symbol,mean_final,min_final,max_final,mean_value").map_err(Error::Write)?;
            for stats in &report.per_good {
                writeln!(
                    out,
                    "{},{:.4},{:.4},{:.4},{:.4}",
                    stats.symbol, stats.mean_final, stats.min_final, stats.max_final, stats.mean_value
                )
                .map_err(Error::Write)?;
            }
            Ok(())
        }
        OutputFormat::Table => {
            writeln!(
                out,
                "{} runs x {} ticks, {} shocks",
                report.runs, report.ticks, report.shocks
            )
            .map_err(Error::Write)?;
            writeln!(
                out,
                "{:<4} {:>10} {:>10} {:>10} {:>10}",
                "SYM", "mean end", "min end", "max end", "mean"
            )
            .map_err(Error::Write)?;
            for stats in &report.per_good {
                writeln!(
                    out,
                    "{:<4} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
                    stats.symbol, stats.mean_final, stats.min_final, stats.max_final, stats.mean_value
                )
                .map_err(Error::Write)?;
            }
            Ok(())
        }
    }
}

/// Renders a backtest report.
pub fn write_backtest(
    report: &BacktestReport,
    starting_cash: f64,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(report, out),
        OutputFormat::Csv => {
            writeln!(out, "strategy,ticks,trades,rejected,final_cash,net_worth,realized,return")
                .map_err(Error::Write)?;
            writeln!(
                out,
                "{},{},{},{},{:.4},{:.4},{:.4},{:.6}",
                report.strategy,
                report.ticks,
                report.trades,
                report.rejected,
                report.final_cash,
                report.net_worth,
                report.realized,
                report.return_on(starting_cash)
            )
            .map_err(Error::Write)
        }
        OutputFormat::Table => {
            writeln!(out, "strategy   {}", report.strategy).map_err(Error::Write)?;
            writeln!(out, "ticks      {}", report.ticks).map_err(Error::Write)?;
            writeln!(out, "trades     {} ({} rejected)", report.trades, report.rejected)
                .map_err(Error::Write)?;
            writeln!(out, "cash       ${:.2}", report.final_cash).map_err(Error::Write)?;
            writeln!(out, "net worth  ${:.2}", report.net_worth).map_err(Error::Write)?;
            writeln!(out, "realized   ${:.2}", report.realized).map_err(Error::Write)?;
            writeln!(
                out,
                "return     {:+.2}%",
                report.return_on(starting_cash) * 100.0
            )
            .map_err(Error::Write)
        }
    }
}

/// A catalog entry with its resting value under the configured environment.
#[derive(Debug, Serialize)]
struct GoodRow<'a> {
    #[serde(flatten)]
    spec: &'a GoodSpec,
    resting_value: f64,
}

/// Lists the goods a configured market would contain.
pub fn write_goods(
    config: &StockpotConfig,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let env = config.environment();
    let rows: Vec<GoodRow<'_>> = CATALOG
        .iter()
        .take(config.market.goods)
        .map(|spec| GoodRow {
            spec,
            resting_value: env.resting_value(spec.id),
        })
        .collect();

    match format {
        OutputFormat::Json => write_json(&rows, out),
        OutputFormat::Csv => {
            writeln!(out, "id,symbol,name,company,building,resting_value").map_err(Error::Write)?;
            for row in &rows {
                writeln!(
                    out,
                    "{},{},{},{},{},{:.4}",
                    row.spec.id.get(),
                    row.spec.symbol,
                    row.spec.name,
                    row.spec.company,
                    row.spec.building,
                    row.resting_value
                )
                .map_err(Error::Write)?;
            }
            Ok(())
        }
        OutputFormat::Table => {
            writeln!(
                out,
                "{:>2} {:<4} {:<16} {:<20} {:<21} {:>7}",
                "ID", "SYM", "NAME", "COMPANY", "BUILDING", "RESTING"
            )
            .map_err(Error::Write)?;
            for row in &rows {
                writeln!(
                    out,
                    "{:>2} {:<4} {:<16} {:<20} {:<21} {:>7.2}",
                    row.spec.id.get(),
                    row.spec.symbol,
                    row.spec.name,
                    row.spec.company,
                    row.spec.building,
                    row.resting_value
                )
                .map_err(Error::Write)?;
            }
            Ok(())
        }
    }
}
