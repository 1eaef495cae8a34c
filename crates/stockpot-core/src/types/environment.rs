//! The game environment a market runs in.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::GoodId;

/// Fraction of a purchase charged as overhead with no brokers hired.
const BASE_OVERHEAD: f64 = 0.2;

/// Each broker multiplies the overhead by this factor.
const BROKER_DISCOUNT: f64 = 0.95;

/// Player-side parameters that shape prices and trading costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEnvironment {
    /// Level of the bank building; raises resting values and the soft cap.
    pub bank_level: u32,

    /// Number of hired brokers; lowers buy overhead.
    pub num_brokers: u32,

    /// Dragon aura boost in `[0, 1]`; adds upward drift and volatility.
    pub dragon_boost: f64,
}

impl Default for GameEnvironment {
    fn default() -> Self {
        Self {
            bank_level: 1,
            num_brokers: 0,
            dragon_boost: 0.0,
        }
    }
}

impl GameEnvironment {
    /// Creates an environment with no dragon boost.
    pub fn new(bank_level: u32, num_brokers: u32) -> Self {
        Self {
            bank_level,
            num_brokers,
            dragon_boost: 0.0,
        }
    }

    /// Sets the dragon boost.
    pub fn with_dragon_boost(mut self, boost: f64) -> Self {
        self.dragon_boost = boost;
        self
    }

    /// Checks that the environment is usable by the simulator.
    pub fn validate(&self) -> Result<()> {
        if self.bank_level == 0 {
            return Err(Error::validation_field(
                "bank_level",
                "must be at least 1",
            ));
        }
        if !self.dragon_boost.is_finite() || !(0.0..=1.0).contains(&self.dragon_boost) {
            return Err(Error::validation_field(
                "dragon_boost",
                format!("must be within [0, 1], got {}", self.dragon_boost),
            ));
        }
        Ok(())
    }

    /// Fraction added to the price of every purchase.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockpot_core::GameEnvironment;
    ///
    /// let env = GameEnvironment::new(1, 0);
    /// assert!((env.broker_overhead() - 0.2).abs() < 1e-12);
    /// ```
    pub fn broker_overhead(&self) -> f64 {
        BASE_OVERHEAD * BROKER_DISCOUNT.powi(self.num_brokers.min(i32::MAX as u32) as i32)
    }

    /// Value above which a rising good's delta is damped.
    pub fn value_soft_cap(&self) -> f64 {
        100.0 + f64::from(self.bank_level.saturating_sub(1)) * 3.0
    }

    /// Value a good is pulled back toward on every tick.
    pub fn resting_value(&self, id: GoodId) -> f64 {
        10.0 + 10.0 * f64::from(id.get()) + f64::from(self.bank_level.saturating_sub(1))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameEnvironment::default().validate().is_ok());
    }

    #[test]
    fn test_zero_bank_level_rejected() {
        let env = GameEnvironment::new(0, 0);
        let err = env.validate().unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_dragon_boost_bounds() {
        assert!(GameEnvironment::default().with_dragon_boost(1.0).validate().is_ok());
        assert!(GameEnvironment::default().with_dragon_boost(1.5).validate().is_err());
        assert!(GameEnvironment::default().with_dragon_boost(-0.1).validate().is_err());
        assert!(GameEnvironment::default().with_dragon_boost(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_broker_overhead_decreases() {
        let none = GameEnvironment::new(1, 0).broker_overhead();
        let some = GameEnvironment::new(1, 10).broker_overhead();
        assert!((none - 0.2).abs() < 1e-12);
        assert!((some - 0.2 * 0.95f64.powi(10)).abs() < 1e-12);
        assert!(some < none);
    }

    #[test]
    fn test_resting_value() {
        let env = GameEnvironment::new(1, 0);
        assert_eq!(env.resting_value(GoodId::new(0)), 10.0);
        assert_eq!(env.resting_value(GoodId::new(3)), 40.0);
        let env = GameEnvironment::new(4, 0);
        assert_eq!(env.resting_value(GoodId::new(3)), 43.0);
    }

    #[test]
    fn test_soft_cap_scales_with_bank_level() {
        assert_eq!(GameEnvironment::new(1, 0).value_soft_cap(), 100.0);
        assert_eq!(GameEnvironment::new(5, 0).value_soft_cap(), 112.0);
    }
}
