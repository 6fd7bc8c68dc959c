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

//! Error hierarchy for the frame pipeline.
//!
//! Two families: [`ConfigError`] for contract violations caught while the
//! pipeline is being assembled (these fail fast, before the first
//! iteration), and [`PipelineError`] for fatal failures raised while the
//! loop is running. Cancellation is not an error and is not represented
//! here; a cancelled loop returns `Ok`.

use thiserror::Error;

use crate::pipeline::stage::StagePhase;

/// A construction-time contract violation.
///
/// Raised by [`FrameRing`](crate::FrameRing) constructors, by
/// [`PipelineConfig`](crate::PipelineConfig) validation and loading, and by
/// [`PipelineBuilder::build`](crate::PipelineBuilder::build). None of these
/// conditions can appear for the first time after the loop has started.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The frame ring must hold at least two slots so render stages can see
    /// a previous and a current frame.
    #[error("frame history must hold at least 2 slots, got {got}")]
    FrameHistoryTooShort {
        /// The rejected capacity.
        got: usize,
    },

    /// The logic rate must be a positive frequency.
    #[error("fixed logic rate must be positive, got {got} Hz")]
    InvalidFixedRate {
        /// The rejected rate in Hz.
        got: u32,
    },

    /// A stage was registered into a slot index outside the declared range.
    #[error("{phase} slot {slot} is out of range, {declared} slots declared")]
    SlotOutOfRange {
        /// Which stage family the slot belongs to.
        phase: StagePhase,
        /// The rejected slot index.
        slot: usize,
        /// The number of slots declared in the configuration.
        declared: usize,
    },

    /// A declared slot was never filled before `build()`.
    #[error("{phase} slot {slot} was never registered")]
    UnregisteredSlot {
        /// Which stage family the slot belongs to.
        phase: StagePhase,
        /// The empty slot index.
        slot: usize,
    },

    /// Every pipeline needs exactly one sync stage.
    #[error("no sync stage registered")]
    MissingSyncStage,

    /// Reading a configuration file failed.
    #[error("failed to read pipeline config: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing a configuration document failed.
    #[error("failed to parse pipeline config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A fatal runtime failure that terminated the run loop.
///
/// Stage failures are not retried or swallowed: the error propagates out of
/// the current iteration and [`run_loop`](crate::Pipeline::run_loop) returns
/// it to the host, which decides whether to restart or exit.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage returned an error.
    #[error("{phase} stage in slot {slot} failed: {source}")]
    Stage {
        /// The stage family that failed.
        phase: StagePhase,
        /// The declaration-order index of the failed stage.
        slot: usize,
        /// The error the stage raised.
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_render_readable_messages() {
        let err = ConfigError::FrameHistoryTooShort { got: 1 };
        assert_eq!(
            err.to_string(),
            "frame history must hold at least 2 slots, got 1"
        );

        let err = ConfigError::UnregisteredSlot {
            phase: StagePhase::Render,
            slot: 3,
        };
        assert_eq!(err.to_string(), "render slot 3 was never registered");
    }

    #[test]
    fn stage_error_carries_phase_slot_and_source() {
        let err = PipelineError::Stage {
            phase: StagePhase::Logic,
            slot: 0,
            source: anyhow::anyhow!("physics solver diverged"),
        };
        let message = err.to_string();
        assert!(message.contains("logic stage in slot 0"), "got: {message}");
        assert!(message.contains("physics solver diverged"), "got: {message}");
    }
}
