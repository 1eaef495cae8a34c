//! Market modes: the regime a good's price is currently in.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// The regime a good is in. Each mode biases how the good's delta drifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketMode {
    /// Delta decays toward zero with small symmetric noise.
    Stable,

    /// Delta slowly drifts upward.
    SlowRise,

    /// Delta slowly drifts downward.
    SlowFall,

    /// Strong upward pressure; may collapse into `FastFall`.
    FastRise,

    /// Strong downward pressure.
    FastFall,

    /// Large random jumps in both value and delta.
    Chaotic,
}

/// Weighted table used when a good's mode duration runs out.
const MODE_TABLE: [MarketMode; 8] = [
    MarketMode::Stable,
    MarketMode::SlowRise,
    MarketMode::SlowRise,
    MarketMode::SlowFall,
    MarketMode::SlowFall,
    MarketMode::FastRise,
    MarketMode::FastFall,
    MarketMode::Chaotic,
];

impl MarketMode {
    /// All modes, in index order.
    pub const ALL: [MarketMode; 6] = [
        MarketMode::Stable,
        MarketMode::SlowRise,
        MarketMode::SlowFall,
        MarketMode::FastRise,
        MarketMode::FastFall,
        MarketMode::Chaotic,
    ];

    /// Returns the numeric index of this mode (0..=5).
    pub const fn index(&self) -> usize {
        match self {
            MarketMode::Stable => 0,
            MarketMode::SlowRise => 1,
            MarketMode::SlowFall => 2,
            MarketMode::FastRise => 3,
            MarketMode::FastFall => 4,
            MarketMode::Chaotic => 5,
        }
    }

    /// Looks up a mode by numeric index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns `true` for the fast modes (`FastRise`, `FastFall`).
    pub fn is_fast(&self) -> bool {
        matches!(self, MarketMode::FastRise | MarketMode::FastFall)
    }

    /// Draws a new mode from the weighted table.
    ///
    /// Slow modes are twice as likely as the others.
    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        MODE_TABLE[rng.gen_range(0..MODE_TABLE.len())]
    }
}

impl fmt::Display for MarketMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketMode::Stable => write!(f, "stable"),
            MarketMode::SlowRise => write!(f, "slow_rise"),
            MarketMode::SlowFall => write!(f, "slow_fall"),
            MarketMode::FastRise => write!(f, "fast_rise"),
            MarketMode::FastFall => write!(f, "fast_fall"),
            MarketMode::Chaotic => write!(f, "chaotic"),
        }
    }
}

impl std::str::FromStr for MarketMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stable" => Ok(MarketMode::Stable),
            "slow_rise" => Ok(MarketMode::SlowRise),
            "slow_fall" => Ok(MarketMode::SlowFall),
            "fast_rise" => Ok(MarketMode::FastRise),
            "fast_fall" => Ok(MarketMode::FastFall),
            "chaotic" => Ok(MarketMode::Chaotic),
            other => Err(Error::validation_field(
                "mode",
                format!("unknown market mode '{other}'"),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_index_roundtrip() {
        for mode in MarketMode::ALL {
            assert_eq!(MarketMode::from_index(mode.index()), Some(mode));
        }
        assert_eq!(MarketMode::from_index(6), None);
    }

    #[test]
    fn test_is_fast() {
        assert!(MarketMode::FastRise.is_fast());
        assert!(MarketMode::FastFall.is_fast());
        assert!(!MarketMode::Stable.is_fast());
        assert!(!MarketMode::Chaotic.is_fast());
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(MarketMode::SlowRise.to_string(), "slow_rise");
        assert_eq!(
            "Fast_Fall".parse::<MarketMode>().unwrap(),
            MarketMode::FastFall
        );
        assert!("sideways".parse::<MarketMode>().is_err());
    }

    #[test]
    fn test_choose_weights_slow_modes_double() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0usize; 6];
        for _ in 0..80_000 {
            counts[MarketMode::choose(&mut rng).index()] += 1;
        }
        // Expected shares: 1/8 for single-weight modes, 2/8 for slow modes.
        let share = |i: usize| counts[i] as f64 / 80_000.0;
        assert!((share(0) - 0.125).abs() < 0.01);
        assert!((share(1) - 0.25).abs() < 0.01);
        assert!((share(2) - 0.25).abs() < 0.01);
        assert!((share(5) - 0.125).abs() < 0.01);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&MarketMode::FastRise).unwrap();
        assert_eq!(json, "\"fast_rise\"");
    }
}
