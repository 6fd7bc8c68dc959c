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

//! Smoothed wall-clock diagnostics for logic ticks.
//!
//! This timer is independent of the orchestrator's accumulator clock: it
//! exists purely so hosts and observers can report how long ticks take and
//! how often they happen, without a single hitchy tick whipsawing the
//! numbers.

use std::time::Instant;

/// Weight kept from the previous smoothed value on each new sample.
const SMOOTHING: f64 = 0.9;

/// Lower clamp for the start-to-start interval used as the FPS divisor.
const MIN_INTERVAL_SECS: f64 = 1e-6;

/// Measures logic-tick duration and rate as exponential moving averages.
///
/// [`start`](LogicFrameTimer::start) must be called exactly once at the
/// beginning of each measured interval and [`end`](LogicFrameTimer::end)
/// exactly once at its end, strictly alternating. The instantaneous
/// frame-time sample is the start-to-end duration; the instantaneous FPS
/// sample comes from the interval between successive starts. Both are folded
/// into moving averages as `smoothed = smoothed * 0.9 + instantaneous * 0.1`,
/// and only the smoothed values are ever exposed.
///
/// Misuse is not an error: an `end` with no baseline interval produces a
/// degenerate sample with the divisor clamped to a small positive epsilon,
/// and an `end` without a matching `start` is ignored.
#[derive(Debug, Clone, Default)]
pub struct LogicFrameTimer {
    current_start: Option<Instant>,
    previous_start: Option<Instant>,
    smoothed_frame_ms: f64,
    smoothed_fps: f64,
}

impl LogicFrameTimer {
    /// Creates a timer with both averages at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the beginning of a measured interval.
    #[inline]
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Marks the end of the interval opened by the last [`start`](Self::start)
    /// and folds the samples into the moving averages.
    #[inline]
    pub fn end(&mut self) {
        self.end_at(Instant::now());
    }

    /// Smoothed duration of a logic tick, in milliseconds.
    #[inline]
    #[must_use]
    pub fn frame_time_ms(&self) -> f64 {
        self.smoothed_frame_ms
    }

    /// Smoothed tick rate, in ticks per second.
    #[inline]
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.smoothed_fps
    }

    fn start_at(&mut self, now: Instant) {
        self.previous_start = self.current_start.replace(now);
    }

    fn end_at(&mut self, now: Instant) {
        let Some(start) = self.current_start else {
            // end() without start(): nothing to measure.
            return;
        };

        let frame_ms = now.duration_since(start).as_secs_f64() * 1000.0;

        let interval_secs = self
            .previous_start
            .map(|prev| start.duration_since(prev).as_secs_f64())
            .unwrap_or(0.0)
            .max(MIN_INTERVAL_SECS);
        let fps = 1.0 / interval_secs;

        self.smoothed_frame_ms = self.smoothed_frame_ms * SMOOTHING + frame_ms * (1.0 - SMOOTHING);
        self.smoothed_fps = self.smoothed_fps * SMOOTHING + fps * (1.0 - SMOOTHING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    /// Drives the timer with synthetic instants starting at `base`: ticks
    /// start every `period` and each tick's body lasts `work`.
    fn run_constant_ticks(
        timer: &mut LogicFrameTimer,
        base: Instant,
        samples: u32,
        period: Duration,
        work: Duration,
    ) {
        for i in 0..samples {
            let start = base + period * i;
            timer.start_at(start);
            timer.end_at(start + work);
        }
    }

    #[test]
    fn fresh_timer_reports_zero() {
        let timer = LogicFrameTimer::new();
        assert_eq!(timer.fps(), 0.0);
        assert_eq!(timer.frame_time_ms(), 0.0);
    }

    #[test]
    fn end_without_start_is_ignored() {
        let mut timer = LogicFrameTimer::new();
        timer.end_at(Instant::now());
        assert_eq!(timer.fps(), 0.0);
        assert_eq!(timer.frame_time_ms(), 0.0);
    }

    #[test]
    fn smoothed_fps_converges_to_inverse_period() {
        let mut timer = LogicFrameTimer::new();
        // 60 Hz cadence, 2 ms of work per tick. The first sample has no
        // baseline interval and spikes against the epsilon clamp; the decay
        // of 0.9^n buries it well before 400 samples.
        run_constant_ticks(
            &mut timer,
            Instant::now(),
            400,
            Duration::from_micros(16_667),
            Duration::from_millis(2),
        );
        assert_relative_eq!(timer.fps(), 60.0, max_relative = 1e-2);
        assert_relative_eq!(timer.frame_time_ms(), 2.0, max_relative = 1e-2);
    }

    #[test]
    fn first_sample_divisor_is_clamped() {
        let mut timer = LogicFrameTimer::new();
        let base = Instant::now();
        timer.start_at(base);
        timer.end_at(base + Duration::from_millis(1));
        // Degenerate but finite: 10% of 1/MIN_INTERVAL_SECS.
        assert!(timer.fps().is_finite());
        assert!(timer.fps() > 0.0);
    }

    #[test]
    fn getters_never_reflect_a_single_noisy_sample() {
        let mut timer = LogicFrameTimer::new();
        let base = Instant::now();
        let period = Duration::from_micros(16_667);
        run_constant_ticks(&mut timer, base, 400, period, Duration::from_millis(2));
        let settled_fps = timer.fps();
        let settled_ms = timer.frame_time_ms();

        // One pathological 100 ms stall on the next tick of the cadence.
        let stall_start = base + period * 400;
        timer.start_at(stall_start);
        timer.end_at(stall_start + Duration::from_millis(100));

        // The smoothed frame time moves by at most 10% of the outlier's
        // distance from the settled value.
        let moved = timer.frame_time_ms() - settled_ms;
        assert!(
            moved <= (100.0 - settled_ms) * 0.1 + 1e-9,
            "single sample moved the average too far: {moved}"
        );
        assert_relative_eq!(timer.fps(), settled_fps, max_relative = 1e-6);
    }

    #[test]
    fn zero_length_interval_between_starts_is_guarded() {
        let mut timer = LogicFrameTimer::new();
        let base = Instant::now();
        timer.start_at(base);
        timer.end_at(base);
        timer.start_at(base);
        timer.end_at(base);
        assert!(timer.fps().is_finite());
    }
}
