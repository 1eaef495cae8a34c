mod backtesting;
mod batch_runs;
mod market_runs;
