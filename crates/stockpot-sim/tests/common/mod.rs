//! Common test utilities for stockpot integration tests.

use stockpot_sim::{GameEnvironment, Market, ShockConfig};

/// Seed used by tests that only need "some" deterministic run.
pub const SEED: u64 = 0x5eed;

/// Test harness bundling an environment and a seed.
pub struct TestHarness {
    /// Environment every market is built with
    pub env: GameEnvironment,
    /// Seed every market is built with
    pub seed: u64,
}

impl TestHarness {
    /// Creates a harness with a level-1 bank and no brokers.
    pub fn new() -> Self {
        Self {
            env: GameEnvironment::default(),
            seed: SEED,
        }
    }

    /// Creates a harness with a custom environment.
    pub fn with_env(env: GameEnvironment) -> Self {
        Self { env, seed: SEED }
    }

    /// Builds a fresh market listing every good.
    pub fn market(&self) -> Market {
        Market::new(self.env.clone(), self.seed).expect("valid environment")
    }

    /// Builds a fresh market with shocks disabled.
    pub fn calm_market(&self) -> Market {
        self.market()
            .with_shocks(ShockConfig::disabled())
            .expect("valid shock config")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
