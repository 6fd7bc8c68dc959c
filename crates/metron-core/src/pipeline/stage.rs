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

//! Stage contracts for the frame pipeline.
//!
//! Stages are the pipeline's units of work. They are async so a stage can
//! suspend while awaiting a collaborator's I/O-bound operation, but the
//! orchestrator awaits each stage to completion before touching the next
//! one, so stages never run concurrently with each other. The futures are
//! deliberately `?Send`: the whole pipeline lives on one logical thread of
//! control, and hosts that map it onto OS threads must keep it on a
//! single-threaded executor.
//!
//! A stage that raises an error kills the run loop; the error is not
//! retried or swallowed. A stage that observes a stop request on its token
//! should return `Ok` promptly and leave shutdown to the orchestrator.

use async_trait::async_trait;

use crate::control::ShutdownToken;

/// Which family of the pipeline a stage belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StagePhase {
    /// Fixed-timestep simulation stages.
    Logic,
    /// Interpolated presentation stages.
    Render,
    /// The end-of-iteration synchronization stage.
    Sync,
}

impl std::fmt::Display for StagePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StagePhase::Logic => write!(f, "logic"),
            StagePhase::Render => write!(f, "render"),
            StagePhase::Sync => write!(f, "sync"),
        }
    }
}

/// A fixed-timestep simulation stage.
///
/// Runs zero or more times per loop iteration, once per drained logic tick,
/// always in declaration order. `frame` is the ring buffer's current write
/// slot; `state` is the application-owned shared state, opaque to the
/// pipeline.
#[async_trait(?Send)]
pub trait LogicStage<F, S> {
    /// Advances the simulation by one fixed timestep of `fixed_dt` seconds.
    async fn tick(
        &mut self,
        token: &ShutdownToken,
        fixed_dt: f32,
        frame: &mut F,
        state: &mut S,
    ) -> anyhow::Result<()>;
}

/// An interpolated presentation stage.
///
/// Runs exactly once per loop iteration (unless the loop is stopping),
/// always in declaration order, after every logic tick of the iteration has
/// completed. `alpha` is the fraction of a logic timestep left in the
/// accumulator, in `[0, 1)`; render code blends `previous` toward `current`
/// by `alpha` to place motion between the two discrete simulation states.
#[async_trait(?Send)]
pub trait RenderStage<F> {
    /// Presents one frame interpolated between two simulation states.
    async fn render(
        &mut self,
        token: &ShutdownToken,
        alpha: f32,
        previous: &F,
        current: &F,
    ) -> anyhow::Result<()>;
}

/// The end-of-iteration synchronization stage.
///
/// Runs exactly once per loop iteration, after all render stages,
/// regardless of how many logic ticks the iteration drained. This is the
/// conventional place to present/swap buffers and to pace the loop.
#[async_trait(?Send)]
pub trait SyncStage<S> {
    /// Finalizes the iteration.
    async fn sync(&mut self, token: &ShutdownToken, state: &mut S) -> anyhow::Result<()>;
}
