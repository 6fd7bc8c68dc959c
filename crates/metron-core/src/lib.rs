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

//! # Metron Core
//!
//! Frame-pipeline core that decouples a fixed-rate logic loop from a
//! variable-rate render loop. The orchestrator drains whole logic ticks out
//! of an elapsed-time accumulator, rotates a ring buffer of historical frame
//! states, and hands render stages the previous and current frames plus an
//! interpolation fraction so presentation stays smooth at any refresh rate.
//!
//! Everything runs on a single logical thread of control: stages are async
//! and may suspend while awaiting collaborator I/O, but they never run
//! concurrently with each other or with the orchestrator's bookkeeping, so
//! no locks are needed anywhere in the pipeline.

#![warn(missing_docs)]

pub mod backend;
pub mod config;
pub mod control;
pub mod error;
pub mod frame;
pub mod pipeline;

pub use config::PipelineConfig;
pub use control::ShutdownToken;
pub use error::{ConfigError, PipelineError};
pub use frame::ring::FrameRing;
pub use frame::timer::LogicFrameTimer;
pub use pipeline::observer::{FrameMetrics, LogObserver, NullObserver, PipelineEvent, PipelineObserver};
pub use pipeline::stage::{LogicStage, RenderStage, StagePhase, SyncStage};
pub use pipeline::{Pipeline, PipelineBuilder};
