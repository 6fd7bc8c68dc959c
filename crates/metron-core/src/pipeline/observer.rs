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

//! Pipeline observability.
//!
//! The orchestrator never logs directly; it emits [`PipelineEvent`]s to an
//! observer injected at construction. Hosts pick [`LogObserver`] for the
//! engine's standard `log`-facade reporting, [`NullObserver`] to run silent,
//! or their own implementation to feed a metrics registry.

use std::time::{Duration, Instant};

use crate::pipeline::stage::StagePhase;

/// Per-iteration diagnostics snapshot.
#[derive(Debug, Clone, Copy)]
pub struct FrameMetrics {
    /// Zero-based loop iteration index.
    pub iteration: u64,
    /// Logic ticks drained by this iteration.
    pub ticks: u32,
    /// Logic ticks drained since the loop started.
    pub total_ticks: u64,
    /// Interpolation fraction handed to this iteration's render stages.
    pub alpha: f32,
    /// Smoothed logic tick rate, in ticks per second.
    pub fps: f64,
    /// Smoothed logic tick duration, in milliseconds.
    pub frame_time_ms: f64,
}

/// A notable moment in the life of the run loop.
#[derive(Debug, Clone, Copy)]
pub enum PipelineEvent {
    /// `run_loop` entered its first iteration.
    LoopStarted,
    /// An iteration completed; carries its diagnostics.
    FrameMetrics(FrameMetrics),
    /// The catch-up safety valve tripped and backlog was discarded.
    CatchUpClamped {
        /// The iteration that tripped the valve.
        iteration: u64,
        /// Seconds of simulation backlog dropped.
        dropped_secs: f64,
    },
    /// A stage raised a fatal error; the loop is about to return it.
    StageFailed {
        /// The stage family that failed.
        phase: StagePhase,
        /// Declaration-order index of the failed stage.
        slot: usize,
    },
    /// The loop observed a stop request and is returning cleanly.
    LoopStopped {
        /// Iterations completed over the loop's lifetime.
        iterations: u64,
        /// Logic ticks executed over the loop's lifetime.
        ticks: u64,
    },
}

/// Receiver for [`PipelineEvent`]s.
///
/// Called from inside the orchestrator's bookkeeping, between stages; an
/// implementation must be cheap and must never block.
pub trait PipelineObserver {
    /// Delivers one event.
    fn notify(&mut self, event: PipelineEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {
    fn notify(&mut self, _event: PipelineEvent) {}
}

/// Routes events to the `log` facade.
///
/// Lifecycle events log at info, stage failures at error, catch-up clamps at
/// warn. Per-iteration metrics would swamp the log at presentation rate, so
/// they are throttled to one info line per period.
#[derive(Debug)]
pub struct LogObserver {
    metrics_period: Duration,
    last_metrics: Option<Instant>,
}

impl LogObserver {
    /// Creates an observer that logs metrics once per second.
    #[must_use]
    pub fn new() -> Self {
        Self::with_metrics_period(Duration::from_secs(1))
    }

    /// Creates an observer with a custom metrics period.
    #[must_use]
    pub fn with_metrics_period(period: Duration) -> Self {
        Self {
            metrics_period: period,
            last_metrics: None,
        }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineObserver for LogObserver {
    fn notify(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::LoopStarted => log::info!("pipeline loop started"),
            PipelineEvent::FrameMetrics(metrics) => {
                let now = Instant::now();
                let due = self
                    .last_metrics
                    .map_or(true, |last| now.duration_since(last) >= self.metrics_period);
                if due {
                    self.last_metrics = Some(now);
                    log::info!(
                        "tick_fps={:.1} tick_ms={:.2} alpha={:.2} ticks={}",
                        metrics.fps,
                        metrics.frame_time_ms,
                        metrics.alpha,
                        metrics.total_ticks
                    );
                }
            }
            PipelineEvent::CatchUpClamped {
                iteration,
                dropped_secs,
            } => {
                log::warn!(
                    "catch-up clamped at iteration {iteration}, dropped {dropped_secs:.3}s of backlog"
                );
            }
            PipelineEvent::StageFailed { phase, slot } => {
                log::error!("{phase} stage in slot {slot} failed, stopping pipeline");
            }
            PipelineEvent::LoopStopped { iterations, ticks } => {
                log::info!("pipeline loop stopped after {iterations} iterations, {ticks} ticks");
            }
        }
    }
}
