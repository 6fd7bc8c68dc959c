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

//! Stage registration and validation.
//!
//! Slot counts are fixed by the configuration when the builder is created;
//! registration fills slots by declaration-order index, and the index order
//! is the execution order, never reordered at runtime. The "every slot
//! registered" invariant is enforced by an explicit validation step in
//! [`build`](PipelineBuilder::build), which fails fast with a
//! [`ConfigError`] instead of deferring the problem to the first iteration.

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::frame::ring::FrameRing;
use crate::frame::timer::LogicFrameTimer;
use crate::pipeline::observer::{NullObserver, PipelineObserver};
use crate::pipeline::stage::{LogicStage, RenderStage, StagePhase, SyncStage};
use crate::pipeline::Pipeline;

/// Assembles a [`Pipeline`] from a validated configuration.
///
/// Re-registering a slot before `build()` replaces its stage; registration
/// has no effect on a pipeline that is already running because the builder
/// is consumed by `build()`.
pub struct PipelineBuilder<F, S> {
    config: PipelineConfig,
    seed: F,
    state: S,
    logic: Vec<Option<Box<dyn LogicStage<F, S>>>>,
    render: Vec<Option<Box<dyn RenderStage<F>>>>,
    sync: Option<Box<dyn SyncStage<S>>>,
    observer: Box<dyn PipelineObserver>,
    out_of_range: Option<ConfigError>,
}

impl<F: Clone, S> PipelineBuilder<F, S> {
    /// Creates a builder with every slot empty.
    ///
    /// `seed` initializes all `frame_history` ring slots; `state` is the
    /// shared state handed to logic and sync stages for the loop lifetime.
    pub fn new(config: PipelineConfig, seed: F, state: S) -> Self {
        let logic = (0..config.logic_slots).map(|_| None).collect();
        let render = (0..config.render_slots).map(|_| None).collect();
        Self {
            config,
            seed,
            state,
            logic,
            render,
            sync: None,
            observer: Box::new(NullObserver),
            out_of_range: None,
        }
    }

    /// Registers the logic stage for declaration-order slot `slot`.
    #[must_use]
    pub fn logic_slot(mut self, slot: usize, stage: impl LogicStage<F, S> + 'static) -> Self {
        match self.logic.get_mut(slot) {
            Some(entry) => *entry = Some(Box::new(stage)),
            None => self.record_out_of_range(StagePhase::Logic, slot),
        }
        self
    }

    /// Registers the render stage for declaration-order slot `slot`.
    #[must_use]
    pub fn render_slot(mut self, slot: usize, stage: impl RenderStage<F> + 'static) -> Self {
        match self.render.get_mut(slot) {
            Some(entry) => *entry = Some(Box::new(stage)),
            None => self.record_out_of_range(StagePhase::Render, slot),
        }
        self
    }

    /// Registers the single sync stage.
    #[must_use]
    pub fn sync_stage(mut self, stage: impl SyncStage<S> + 'static) -> Self {
        self.sync = Some(Box::new(stage));
        self
    }

    /// Injects the observer that receives pipeline events.
    ///
    /// Defaults to [`NullObserver`].
    #[must_use]
    pub fn observer(mut self, observer: impl PipelineObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Validates the configuration and every slot, then builds the pipeline.
    pub fn build(self) -> Result<Pipeline<F, S>, ConfigError> {
        self.config.validate()?;
        if let Some(err) = self.out_of_range {
            return Err(err);
        }

        let mut logic = Vec::with_capacity(self.logic.len());
        for (slot, entry) in self.logic.into_iter().enumerate() {
            logic.push(entry.ok_or(ConfigError::UnregisteredSlot {
                phase: StagePhase::Logic,
                slot,
            })?);
        }

        let mut render = Vec::with_capacity(self.render.len());
        for (slot, entry) in self.render.into_iter().enumerate() {
            render.push(entry.ok_or(ConfigError::UnregisteredSlot {
                phase: StagePhase::Render,
                slot,
            })?);
        }

        let sync = self.sync.ok_or(ConfigError::MissingSyncStage)?;
        let ring = FrameRing::filled(self.config.frame_history, self.seed)?;

        Ok(Pipeline {
            fixed_dt_secs: self.config.fixed_dt_secs(),
            max_catch_up_ticks: self.config.max_catch_up_ticks,
            ring,
            state: self.state,
            logic,
            render,
            sync,
            timer: LogicFrameTimer::new(),
            observer: self.observer,
        })
    }

    fn record_out_of_range(&mut self, phase: StagePhase, slot: usize) {
        let declared = match phase {
            StagePhase::Logic => self.logic.len(),
            StagePhase::Render => self.render.len(),
            StagePhase::Sync => 1,
        };
        // First offence wins; build() surfaces it.
        self.out_of_range.get_or_insert(ConfigError::SlotOutOfRange {
            phase,
            slot,
            declared,
        });
    }
}
