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

//! # Cadence Core
//!
//! Foundational crate containing the contracts shared by the scheduler, the
//! cycle pacer, and the telemetry sinks: time sources, cancellation, task
//! descriptors, per-cycle statistics, and the error taxonomy.

#![warn(missing_docs)]

pub mod cancel;
pub mod clock;
pub mod error;
pub mod sink;
pub mod stats;
pub mod task;
pub mod utils;

pub use cancel::CancelToken;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, PacerError};
pub use sink::{ErrorSink, NoopStatsSink, StatsSink};
pub use stats::{CycleStats, TickContext, Timings};
pub use task::{Task, TaskAction, TaskPriority, TaskSpec};
pub use utils::timer::Stopwatch;
