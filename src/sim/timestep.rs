//! Fixed timestep loop
//!
//! Converts variable real-time frame deltas into a whole number of fixed
//! simulation steps. Each delta is rounded to whole sub-step units (a
//! millionth of a step) before it is accumulated. Slicing that lands on unit
//! boundaries, such as whole or quarter steps, gives exactly the same step
//! count as one frame covering the same time. Other slicings drift by up to
//! half a unit per frame, so a step can land one frame early or late.

use crate::consts::{FIXED_DT, MAX_DT, TICKS_PER_SECOND};

/// Integer resolution of one fixed step
const UNITS_PER_STEP: u64 = 1_000_000;
const UNITS_PER_SECOND: f64 = (UNITS_PER_STEP * TICKS_PER_SECOND as u64) as f64;

/// Accumulator-driven stepper
#[derive(Debug, Clone, Default)]
pub struct FixedTimestep {
    /// Unspent time, in units (always < UNITS_PER_STEP between calls)
    accumulator: u64,
    total_steps: u64,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_units(seconds: f32) -> u64 {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0;
        }
        let clamped = seconds.min(MAX_DT) as f64;
        (clamped * UNITS_PER_SECOND).round() as u64
    }

    /// Feed one real frame delta; runs `step(FIXED_DT)` once per whole step.
    ///
    /// Returns the number of steps run. Non-finite or negative deltas count
    /// as zero; deltas above `MAX_DT` are clamped.
    pub fn update(&mut self, real_dt: f32, mut step: impl FnMut(f32)) -> u32 {
        self.accumulator += Self::to_units(real_dt);

        let mut steps = 0;
        while self.accumulator >= UNITS_PER_STEP {
            step(FIXED_DT);
            self.accumulator -= UNITS_PER_STEP;
            steps += 1;
        }
        self.total_steps += steps as u64;
        steps
    }

    /// Unspent time in seconds, in `[0, FIXED_DT)`
    pub fn accumulator(&self) -> f32 {
        (self.accumulator as f64 / UNITS_PER_SECOND) as f32
    }

    /// Fraction of a step left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator as f32 / UNITS_PER_STEP as f32
    }

    /// Steps run since creation or the last reset
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0;
        self.total_steps = 0;
    }
}
