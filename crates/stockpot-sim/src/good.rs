//! Per-good price state and the tick function that evolves it.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};
use stockpot_core::{GameEnvironment, GoodId, MarketMode};

use crate::shock::GlobalShock;

/// Number of past values kept per good, newest first.
pub const HISTORY_LEN: usize = 65;

/// Values below this floor are pulled back up.
const VALUE_FLOOR: f64 = 5.0;

/// Absolute minimum value of any good.
const VALUE_MIN: f64 = 1.0;

/// Price state of a single good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Good {
    id: GoodId,
    value: f64,
    previous: f64,
    delta: f64,
    mode: MarketMode,
    duration: i64,
    history: VecDeque<f64>,
}

/// What happened to a good during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickEvents {
    /// The global shock hit this good.
    pub shocked: bool,
    /// The good ended the tick in a different mode.
    pub mode_changed: bool,
}

#[inline]
fn roll<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.r#gen::<f64>()
}

impl Good {
    /// Creates a good sitting at its resting value.
    ///
    /// The mode duration starts at zero, so the first tick always rolls a
    /// fresh mode.
    pub fn new(id: GoodId, env: &GameEnvironment) -> Self {
        let value = env.resting_value(id);
        let mut history = VecDeque::with_capacity(HISTORY_LEN + 1);
        history.push_front(value);
        Self {
            id,
            value,
            previous: value,
            delta: 0.0,
            mode: MarketMode::Stable,
            duration: 0,
            history,
        }
    }

    /// Returns the good's id.
    pub fn id(&self) -> GoodId {
        self.id
    }

    /// Returns the current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the value before the last tick.
    pub fn previous(&self) -> f64 {
        self.previous
    }

    /// Returns the value change over the last tick.
    pub fn change(&self) -> f64 {
        self.value - self.previous
    }

    /// Returns the current per-tick drift.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Returns the current mode.
    pub fn mode(&self) -> MarketMode {
        self.mode
    }

    /// Returns the ticks left before the mode is re-rolled.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Returns past values, newest first.
    pub fn history(&self) -> &VecDeque<f64> {
        &self.history
    }

    /// Forces a mode and duration, e.g. to start a scenario in a known regime.
    pub fn set_mode(&mut self, mode: MarketMode, duration: i64) {
        self.mode = mode;
        self.duration = duration;
    }

    /// Advances the good by one tick.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        shock: &GlobalShock,
        env: &GameEnvironment,
    ) -> TickEvents {
        let boost = env.dragon_boost;
        let resting = env.resting_value(self.id);
        let start_mode = self.mode;
        let mut events = TickEvents::default();

        self.previous = self.value;
        self.delta = self.delta * 0.97 + 0.01 * boost;

        match self.mode {
            MarketMode::Stable => {
                self.delta *= 0.95;
                self.delta += 0.05 * (roll(rng) - 0.5);
            }
            MarketMode::SlowRise => {
                self.delta *= 0.99;
                self.delta += 0.05 * (roll(rng) - 0.1);
            }
            MarketMode::SlowFall => {
                self.delta *= 0.99;
                self.delta -= 0.05 * (roll(rng) - 0.1);
            }
            MarketMode::FastRise => {
                self.delta += 0.15 * (roll(rng) - 0.1);
                self.value += roll(rng) * 5.0;
            }
            MarketMode::FastFall => {
                self.delta -= 0.15 * (roll(rng) - 0.1);
                self.value -= roll(rng);
            }
            MarketMode::Chaotic => {
                self.delta += 0.3 * (roll(rng) - 0.5);
            }
        }

        self.value += (resting - self.value) * 0.01;

        if shock.is_active() && roll(rng) < shock.probability {
            let d = shock.magnitude;
            self.value -= (1.0 + self.delta * roll(rng).powi(3) * 7.0) * d;
            self.value -= d * (1.0 + roll(rng).powi(3) * 7.0);
            self.delta += d * (1.0 + roll(rng) * 4.0);
            self.duration = 0;
            events.shocked = true;
        }

        self.value += (roll(rng) - 0.5).powi(2) * 3.0;
        self.delta += 0.1 * (roll(rng) - 0.5);
        if roll(rng) < 0.15 {
            self.value += (roll(rng) - 0.5) * 3.0;
        }
        if roll(rng) < 0.03 {
            self.value += (roll(rng) - 0.5) * (10.0 + 10.0 * boost);
        }
        if roll(rng) < 0.1 {
            self.delta += (roll(rng) - 0.5) * (0.3 + 0.2 * boost);
        }

        if self.mode == MarketMode::Chaotic {
            if roll(rng) < 0.5 {
                self.value += (roll(rng) - 0.5) * 10.0;
            }
            if roll(rng) < 0.2 {
                self.delta = (roll(rng) - 0.5) * (2.0 + 6.0 * boost);
            }
        }
        if self.mode == MarketMode::FastRise && roll(rng) < 0.3 {
            self.delta += (roll(rng) - 0.5) * 0.1;
            self.value += (roll(rng) - 0.7) * 10.0;
        }
        if self.mode == MarketMode::FastRise && roll(rng) < 0.03 {
            self.mode = MarketMode::FastFall;
        }
        if self.mode == MarketMode::FastFall && roll(rng) < 0.3 {
            self.delta += (roll(rng) - 0.5) * 0.1;
            self.value += (roll(rng) - 0.3) * 10.0;
        }

        if self.value > env.value_soft_cap() && self.delta > 0.0 {
            self.delta *= 0.9;
        }

        self.value += self.delta;

        if self.value < VALUE_FLOOR {
            self.value += (VALUE_FLOOR - self.value) * 0.5;
        }
        if self.value < VALUE_FLOOR && self.delta < 0.0 {
            self.delta *= 0.95;
        }
        self.value = self.value.max(VALUE_MIN);

        self.history.push_front(self.value);
        self.history.truncate(HISTORY_LEN);

        self.duration -= 1;
        if self.duration <= 0 {
            self.reroll_mode(rng, boost);
        }

        if self.mode != start_mode {
            events.mode_changed = true;
            tracing::debug!(
                good = %self.id,
                from = %start_mode,
                to = %self.mode,
                duration = self.duration,
                "Mode change"
            );
        }

        events
    }

    fn reroll_mode<R: Rng + ?Sized>(&mut self, rng: &mut R, boost: f64) {
        self.duration = (10.0 + roll(rng) * (690.0 - 200.0 * boost)).floor() as i64;
        self.mode = if roll(rng) < boost && roll(rng) < 0.5 {
            MarketMode::Chaotic
        } else if roll(rng) < 0.7 && self.mode.is_fast() {
            MarketMode::Chaotic
        } else {
            MarketMode::choose(rng)
        };
    }
}
