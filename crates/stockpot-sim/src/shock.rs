//! Market-wide shocks that hit many goods in the same tick.

use rand::Rng;
use serde::{Deserialize, Serialize};
use stockpot_core::{Error, Result};

/// A shock rolled for one market tick.
///
/// Every good sees the same shock; each good independently gets hit with
/// `probability`. A positive magnitude knocks values down and pushes deltas
/// up, so a crash is followed by a rebound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalShock {
    /// Size of the shock; zero means no shock this tick.
    pub magnitude: f64,
    /// Chance that a given good is hit.
    pub probability: f64,
}

impl GlobalShock {
    /// The calm tick.
    pub const NONE: GlobalShock = GlobalShock {
        magnitude: 0.0,
        probability: 0.0,
    };

    /// Returns `true` if this shock can hit anything.
    pub fn is_active(&self) -> bool {
        self.magnitude != 0.0
    }
}

/// How often shocks happen and how large they get.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShockConfig {
    /// Per-tick chance of a shock.
    pub chance: f64,
    /// Largest absolute magnitude a shock can have.
    pub max_magnitude: f64,
}

impl Default for ShockConfig {
    fn default() -> Self {
        Self {
            chance: 0.01,
            max_magnitude: 1.0,
        }
    }
}

impl ShockConfig {
    /// Disables shocks entirely.
    pub fn disabled() -> Self {
        Self {
            chance: 0.0,
            max_magnitude: 0.0,
        }
    }

    /// Checks that the chance is a probability and the magnitude is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.chance.is_finite() || !(0.0..=1.0).contains(&self.chance) {
            return Err(Error::validation_field(
                "shock_chance",
                format!("must be within [0, 1], got {}", self.chance),
            ));
        }
        if !self.max_magnitude.is_finite() || self.max_magnitude < 0.0 {
            return Err(Error::validation_field(
                "shock_magnitude",
                format!("must be a non-negative number, got {}", self.max_magnitude),
            ));
        }
        Ok(())
    }

    /// Rolls the shock for one tick.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> GlobalShock {
        if rng.r#gen::<f64>() >= self.chance {
            return GlobalShock::NONE;
        }
        let shock = GlobalShock {
            magnitude: (rng.r#gen::<f64>() * 2.0 - 1.0) * self.max_magnitude,
            probability: rng.r#gen::<f64>(),
        };
        tracing::debug!(
            magnitude = shock.magnitude,
            probability = shock.probability,
            "Global shock"
        );
        shock
    }
}
