// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fixed-timestep accounting.
//!
//! The accumulator is the orchestrator's private ledger of wall time not yet
//! simulated. Each iteration pushes the elapsed wall-clock delta in, then
//! drains whole timesteps out: zero, one, or many, depending on how far
//! presentation fell behind. Whatever remains is less than one timestep and
//! becomes the render interpolation fraction.
//!
//! Kept free of any clock so the arithmetic is testable sample by sample;
//! the orchestrator owns the `Instant` handling.

/// Leftover-time ledger for a fixed timestep `dt`.
#[derive(Debug, Clone)]
pub(crate) struct Accumulator {
    fixed_dt: f64,
    leftover: f64,
}

impl Accumulator {
    /// Creates an empty accumulator for a positive timestep.
    pub(crate) fn new(fixed_dt: f64) -> Self {
        debug_assert!(fixed_dt > 0.0);
        Self {
            fixed_dt,
            leftover: 0.0,
        }
    }

    /// Adds elapsed wall time, in seconds.
    pub(crate) fn push(&mut self, elapsed_secs: f64) {
        self.leftover += elapsed_secs.max(0.0);
    }

    /// True while at least one whole timestep is pending.
    pub(crate) fn tick_ready(&self) -> bool {
        self.leftover >= self.fixed_dt
    }

    /// Consumes one timestep after its logic stages have run.
    pub(crate) fn complete_tick(&mut self) {
        self.leftover -= self.fixed_dt;
    }

    /// Discards all pending backlog, returning the seconds dropped.
    ///
    /// Used by the catch-up safety valve; afterwards `alpha()` is zero.
    pub(crate) fn discard_backlog(&mut self) -> f64 {
        std::mem::take(&mut self.leftover)
    }

    /// Interpolation fraction of the remaining partial timestep.
    ///
    /// Guaranteed in `[0, 1)` once every pending tick has been drained.
    pub(crate) fn alpha(&self) -> f32 {
        ((self.leftover / self.fixed_dt).clamp(0.0, 1.0) as f32).min(0.999_999)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT_60HZ: f64 = 1.0 / 60.0;

    /// Pushes `elapsed` and drains every pending tick, returning the count.
    fn drain(acc: &mut Accumulator, elapsed: f64) -> u32 {
        acc.push(elapsed);
        let mut ticks = 0;
        while acc.tick_ready() {
            acc.complete_tick();
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn no_tick_before_a_full_timestep() {
        let mut acc = Accumulator::new(DT_60HZ);
        assert_eq!(drain(&mut acc, DT_60HZ * 0.9), 0);
        assert!(acc.alpha() > 0.0);
    }

    #[test]
    fn constant_advance_converges_to_floor_of_total_over_dt() {
        // M iterations of constant elapsed time E must execute
        // floor(M * E / dt) ticks, within one.
        for &elapsed in &[0.004, 1.0 / 30.0, 0.0213, 0.1] {
            let mut acc = Accumulator::new(DT_60HZ);
            let iterations = 1000u32;
            let mut ticks = 0u64;
            for _ in 0..iterations {
                ticks += u64::from(drain(&mut acc, elapsed));
                let alpha = acc.alpha();
                assert!((0.0..1.0).contains(&alpha), "alpha out of range: {alpha}");
            }
            let expected = (f64::from(iterations) * elapsed / DT_60HZ).floor() as u64;
            assert!(
                ticks.abs_diff(expected) <= 1,
                "elapsed {elapsed}: {ticks} ticks, expected about {expected}"
            );
        }
    }

    #[test]
    fn double_rate_advance_runs_two_ticks_per_iteration() {
        // dt = 1/60 s, elapsed = 1/30 s: exactly two ticks every iteration
        // and a vanishing alpha at iteration end.
        let mut acc = Accumulator::new(DT_60HZ);
        for _ in 0..100 {
            assert_eq!(drain(&mut acc, 1.0 / 30.0), 2);
            assert_relative_eq!(f64::from(acc.alpha()), 0.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn backlog_drains_in_catch_up_burst() {
        let mut acc = Accumulator::new(DT_60HZ);
        // A 250 ms stall at 60 Hz owes 15 whole ticks.
        assert_eq!(drain(&mut acc, 0.25), 15);
    }

    #[test]
    fn discard_backlog_zeroes_alpha() {
        let mut acc = Accumulator::new(DT_60HZ);
        acc.push(0.5);
        let dropped = acc.discard_backlog();
        assert_relative_eq!(dropped, 0.5);
        assert!(!acc.tick_ready());
        assert_eq!(acc.alpha(), 0.0);
    }

    #[test]
    fn negative_elapsed_is_ignored() {
        // A non-monotonic host clock must not drain the ledger.
        let mut acc = Accumulator::new(DT_60HZ);
        acc.push(DT_60HZ * 0.5);
        acc.push(-1.0);
        assert!(acc.alpha() > 0.0);
    }

    #[test]
    fn alpha_stays_below_one() {
        let mut acc = Accumulator::new(DT_60HZ);
        // Push just under a whole timestep repeatedly; rounding must never
        // let alpha reach 1.0 once pending ticks are drained.
        for _ in 0..10_000 {
            drain(&mut acc, DT_60HZ * 0.999);
            assert!(acc.alpha() < 1.0);
        }
    }
}
