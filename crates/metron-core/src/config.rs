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

//! Pipeline configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Shape of a pipeline, fixed before the first iteration.
///
/// Slot counts declared here are the registry's capacity: the builder
/// accepts exactly one stage per slot and refuses to build until every slot
/// is filled. Loading from JSON follows the engine's config convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Logic tick rate in Hz; the fixed timestep is `1 / fixed_hz`.
    pub fixed_hz: u32,

    /// Frame ring capacity. Must be at least 2; use 3 or more when stages
    /// read `before_previous()` and need it distinct from the write slot.
    pub frame_history: usize,

    /// Number of logic stage slots.
    pub logic_slots: usize,

    /// Number of render stage slots.
    pub render_slots: usize,

    /// Upper bound on catch-up logic ticks within a single loop iteration.
    ///
    /// `None` imposes no bound: when the host stalls, the pipeline runs as
    /// many ticks as it takes to drain the backlog, even if that starves
    /// rendering. With a bound, the residual backlog is discarded once the
    /// bound is hit and the clamp is reported to the observer.
    pub max_catch_up_ticks: Option<u32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fixed_hz: 60,
            frame_history: 3,
            logic_slots: 1,
            render_slots: 1,
            max_catch_up_ticks: None,
        }
    }
}

impl PipelineConfig {
    /// Loads a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Checks the construction-time invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixed_hz == 0 {
            return Err(ConfigError::InvalidFixedRate { got: self.fixed_hz });
        }
        if self.frame_history < 2 {
            return Err(ConfigError::FrameHistoryTooShort {
                got: self.frame_history,
            });
        }
        Ok(())
    }

    /// The fixed logic timestep in seconds.
    #[must_use]
    pub fn fixed_dt_secs(&self) -> f64 {
        1.0 / f64::from(self.fixed_hz)
    }

    /// The fixed logic timestep as a [`Duration`].
    #[must_use]
    pub fn fixed_dt(&self) -> Duration {
        Duration::from_secs_f64(self.fixed_dt_secs())
    }
}
