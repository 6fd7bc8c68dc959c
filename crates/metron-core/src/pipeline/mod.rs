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

//! The stage registry and fixed-timestep orchestrator.
//!
//! # Execution model
//!
//! Everything here runs as one logical thread of control. Stages may
//! suspend at their own await points, but the orchestrator awaits each
//! stage to completion in declaration order, so no two stages (and no
//! stage and the orchestrator's bookkeeping) ever run concurrently. The
//! accumulator update, ring rotation, and interpolation-fraction
//! computation contain no await points and are therefore atomic with
//! respect to stage execution. That single-control-flow guarantee is what
//! lets the shared state and the frame ring be mutated without locks.
//!
//! # Ordering guarantees
//!
//! Within one logic tick, all logic stages complete in declared order
//! before the ring rotates. All logic ticks of an iteration complete
//! before any render stage of that iteration begins. The sync stage always
//! runs last in an iteration.

pub mod observer;
pub mod stage;

mod accumulator;
mod builder;
mod orchestrator;

pub use builder::PipelineBuilder;
pub use orchestrator::Pipeline;
