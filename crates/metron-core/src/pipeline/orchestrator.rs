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

//! The run loop.

use std::time::Instant;

use crate::control::ShutdownToken;
use crate::error::PipelineError;
use crate::frame::ring::FrameRing;
use crate::frame::timer::LogicFrameTimer;
use crate::pipeline::accumulator::Accumulator;
use crate::pipeline::builder::PipelineBuilder;
use crate::pipeline::observer::{FrameMetrics, PipelineEvent, PipelineObserver};
use crate::pipeline::stage::{LogicStage, RenderStage, StagePhase, SyncStage};

/// A fully assembled frame pipeline.
///
/// Owns the frame ring, the shared state, and every registered stage for
/// the lifetime of the run loop. Built through [`Pipeline::builder`]; see
/// the [module docs](crate::pipeline) for the execution model.
pub struct Pipeline<F, S> {
    pub(super) fixed_dt_secs: f64,
    pub(super) max_catch_up_ticks: Option<u32>,
    pub(super) ring: FrameRing<F>,
    pub(super) state: S,
    pub(super) logic: Vec<Box<dyn LogicStage<F, S>>>,
    pub(super) render: Vec<Box<dyn RenderStage<F>>>,
    pub(super) sync: Box<dyn SyncStage<S>>,
    pub(super) timer: LogicFrameTimer,
    pub(super) observer: Box<dyn PipelineObserver>,
}

impl<F, S> std::fmt::Debug for Pipeline<F, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("fixed_dt_secs", &self.fixed_dt_secs)
            .field("max_catch_up_ticks", &self.max_catch_up_ticks)
            .field("frame_capacity", &self.ring.capacity())
            .field("logic_stages", &self.logic.len())
            .field("render_stages", &self.render.len())
            .finish_non_exhaustive()
    }
}

impl<F: Clone, S> Pipeline<F, S> {
    /// Starts assembling a pipeline from a configuration, a seed frame, and
    /// the application's shared state.
    pub fn builder(config: crate::PipelineConfig, seed: F, state: S) -> PipelineBuilder<F, S> {
        PipelineBuilder::new(config, seed, state)
    }
}

impl<F, S> Pipeline<F, S> {
    /// The application's shared state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable access to the shared state, for host inspection between runs.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// The frame ring.
    pub fn frames(&self) -> &FrameRing<F> {
        &self.ring
    }

    /// The tick timing diagnostics.
    pub fn timer(&self) -> &LogicFrameTimer {
        &self.timer
    }

    /// Runs the pipeline until the token requests stop or a stage fails.
    ///
    /// This is the sole entry point. Each iteration: the elapsed wall time
    /// is accumulated; whole logic ticks are drained from the accumulator
    /// (rotating the ring after each); the interpolation fraction
    /// `alpha = leftover / dt` is computed; every render stage runs with
    /// the previous and current frames plus `alpha`; the sync stage runs
    /// last. The token is checked at the top of every iteration and before
    /// every stage invocation.
    ///
    /// Returns `Ok(())` on cooperative cancellation. A stage error is fatal:
    /// the loop stops immediately and the error is returned, untouched, as
    /// [`PipelineError::Stage`]. The host decides whether that means
    /// restart or exit.
    pub async fn run_loop(&mut self, token: ShutdownToken) -> Result<(), PipelineError> {
        let fixed_dt = self.fixed_dt_secs as f32;
        let mut acc = Accumulator::new(self.fixed_dt_secs);
        let mut last = Instant::now();
        let mut iterations: u64 = 0;
        let mut total_ticks: u64 = 0;

        self.observer.notify(PipelineEvent::LoopStarted);

        'run: loop {
            if token.is_stop_requested() {
                break 'run;
            }

            let now = Instant::now();
            acc.push(now.duration_since(last).as_secs_f64());
            last = now;

            // Drain pending logic ticks: zero on a fast iteration, many
            // when presentation fell behind.
            let mut ticks: u32 = 0;
            while acc.tick_ready() {
                if let Some(max) = self.max_catch_up_ticks {
                    if ticks >= max {
                        let dropped_secs = acc.discard_backlog();
                        self.observer.notify(PipelineEvent::CatchUpClamped {
                            iteration: iterations,
                            dropped_secs,
                        });
                        break;
                    }
                }

                self.timer.start();
                for (slot, stage) in self.logic.iter_mut().enumerate() {
                    if token.is_stop_requested() {
                        break 'run;
                    }
                    if let Err(source) = stage
                        .tick(&token, fixed_dt, self.ring.current_mut(), &mut self.state)
                        .await
                    {
                        self.observer.notify(PipelineEvent::StageFailed {
                            phase: StagePhase::Logic,
                            slot,
                        });
                        return Err(PipelineError::Stage {
                            phase: StagePhase::Logic,
                            slot,
                            source,
                        });
                    }
                }
                self.ring.rotate();
                self.timer.end();
                acc.complete_tick();
                ticks += 1;
                total_ticks += 1;
            }

            let alpha = acc.alpha();
            for (slot, stage) in self.render.iter_mut().enumerate() {
                if token.is_stop_requested() {
                    break 'run;
                }
                if let Err(source) = stage
                    .render(&token, alpha, self.ring.previous(), self.ring.current())
                    .await
                {
                    self.observer.notify(PipelineEvent::StageFailed {
                        phase: StagePhase::Render,
                        slot,
                    });
                    return Err(PipelineError::Stage {
                        phase: StagePhase::Render,
                        slot,
                        source,
                    });
                }
            }

            if token.is_stop_requested() {
                break 'run;
            }
            if let Err(source) = self.sync.sync(&token, &mut self.state).await {
                self.observer.notify(PipelineEvent::StageFailed {
                    phase: StagePhase::Sync,
                    slot: 0,
                });
                return Err(PipelineError::Stage {
                    phase: StagePhase::Sync,
                    slot: 0,
                    source,
                });
            }

            self.observer.notify(PipelineEvent::FrameMetrics(FrameMetrics {
                iteration: iterations,
                ticks,
                total_ticks,
                alpha,
                fps: self.timer.fps(),
                frame_time_ms: self.timer.frame_time_ms(),
            }));
            iterations += 1;
        }

        self.observer.notify(PipelineEvent::LoopStopped {
            iterations,
            ticks: total_ticks,
        });
        Ok(())
    }
}
