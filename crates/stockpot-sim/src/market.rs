//! A market of goods advanced in lockstep.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use stockpot_core::{CATALOG, Error, GameEnvironment, GoodId, MarketMode, Result, RunId};

use crate::good::Good;
use crate::scan::{Timeseries, scan};
use crate::shock::{GlobalShock, ShockConfig};

/// Everything that evolves from tick to tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// Ticks elapsed
    pub tick: u64,
    /// Goods in catalog order
    pub goods: Vec<Good>,
}

/// The observable result of one market tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Tick number (1 for the first tick)
    pub tick: u64,
    /// Value of each good, in catalog order
    pub values: Vec<f64>,
    /// Delta of each good
    pub deltas: Vec<f64>,
    /// Mode of each good
    pub modes: Vec<MarketMode>,
    /// Shock rolled for this tick
    pub shock: GlobalShock,
    /// Number of goods the shock hit
    pub shocked_goods: usize,
}

impl MarketSnapshot {
    fn capture(state: &MarketState, shock: GlobalShock, shocked_goods: usize) -> Self {
        Self {
            tick: state.tick,
            values: state.goods.iter().map(Good::value).collect(),
            deltas: state.goods.iter().map(Good::delta).collect(),
            modes: state.goods.iter().map(Good::mode).collect(),
            shock,
            shocked_goods,
        }
    }

    /// Returns the value of a good at this tick.
    pub fn price(&self, id: GoodId) -> Option<f64> {
        self.values.get(id.index()).copied()
    }

    /// Iterates over `(good, value)` pairs.
    pub fn prices(&self) -> impl Iterator<Item = (GoodId, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (GoodId::new(i as u8), v))
    }
}

/// Advances every good by one tick under a single shared shock.
fn advance(
    state: &mut MarketState,
    rng: &mut StdRng,
    env: &GameEnvironment,
    shocks: &ShockConfig,
) -> MarketSnapshot {
    let shock = shocks.roll(rng);
    let mut shocked_goods = 0;
    for good in &mut state.goods {
        if good.tick(rng, &shock, env).shocked {
            shocked_goods += 1;
        }
    }
    state.tick += 1;
    MarketSnapshot::capture(state, shock, shocked_goods)
}

/// A seeded, self-contained market simulation.
#[derive(Debug, Clone)]
pub struct Market {
    run_id: RunId,
    seed: u64,
    env: GameEnvironment,
    shocks: ShockConfig,
    state: MarketState,
    rng: StdRng,
}

impl Market {
    /// Creates a market listing every catalog good.
    pub fn new(env: GameEnvironment, seed: u64) -> Result<Self> {
        env.validate()?;
        let goods = CATALOG.iter().map(|spec| Good::new(spec.id, &env)).collect();
        Ok(Self {
            run_id: RunId::new(),
            seed,
            env,
            shocks: ShockConfig::default(),
            state: MarketState { tick: 0, goods },
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Restricts the market to the first `count` catalog goods.
    pub fn with_goods(mut self, count: usize) -> Result<Self> {
        if count == 0 || count > CATALOG.len() {
            return Err(Error::validation_field(
                "goods",
                format!("must be between 1 and {}, got {count}", CATALOG.len()),
            ));
        }
        self.state.goods.truncate(count);
        Ok(self)
    }

    /// Replaces the shock configuration.
    pub fn with_shocks(mut self, shocks: ShockConfig) -> Result<Self> {
        shocks.validate()?;
        self.shocks = shocks;
        Ok(self)
    }

    /// Returns the run id.
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Returns the seed the market was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the game environment.
    pub fn env(&self) -> &GameEnvironment {
        &self.env
    }

    /// Returns the current state.
    pub fn state(&self) -> &MarketState {
        &self.state
    }

    /// Returns the ids of the listed goods.
    pub fn good_ids(&self) -> Vec<GoodId> {
        self.state.goods.iter().map(Good::id).collect()
    }

    /// Looks up a listed good.
    pub fn good(&self, id: GoodId) -> Result<&Good> {
        self.state
            .goods
            .get(id.index())
            .ok_or(Error::GoodNotFound { id })
    }

    /// Mutable access to a listed good.
    pub fn good_mut(&mut self, id: GoodId) -> Result<&mut Good> {
        self.state
            .goods
            .get_mut(id.index())
            .ok_or(Error::GoodNotFound { id })
    }

    /// Captures the current state without advancing it.
    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot::capture(&self.state, GlobalShock::NONE, 0)
    }

    /// Advances the market by one tick.
    pub fn tick(&mut self) -> MarketSnapshot {
        advance(&mut self.state, &mut self.rng, &self.env, &self.shocks)
    }

    /// Advances the market by `ticks` ticks and returns every snapshot.
    pub fn run(&mut self, ticks: usize) -> Timeseries {
        tracing::info!(
            run_id = %self.run_id,
            seed = self.seed,
            ticks,
            goods = self.state.goods.len(),
            "Starting market run"
        );

        let init = std::mem::take(&mut self.state);
        let rng = &mut self.rng;
        let env = &self.env;
        let shocks = &self.shocks;
        let (state, snapshots) = scan(init, ticks, |mut state| {
            let snapshot = advance(&mut state, rng, env, shocks);
            (state, snapshot)
        });
        self.state = state;

        let series = Timeseries::from_snapshots(self.run_id, self.seed, self.good_ids(), snapshots);
        tracing::info!(
            run_id = %self.run_id,
            ticks = series.len(),
            shocks = series.shocks,
            "Market run finished"
        );
        series
    }
}
