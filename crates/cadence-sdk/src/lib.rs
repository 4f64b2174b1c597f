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

//! The public-facing Software Development Kit (SDK) for the cadence frame pacer.
//! This crate provides a simple and stable API to pace a simulation at a fixed
//! tick rate and run background work in its spare time.

pub mod presets;

pub use anyhow::Result;
pub use cadence_control::{Capacity, PriorityEvaluator, Scheduler, TaskScore, TaskSnapshot};
pub use cadence_core::{
    CancelToken, Clock, ConfigError, CycleStats, ErrorSink, ManualClock, NoopStatsSink,
    PacerError, StatsSink, SystemClock, Task, TaskPriority, TickContext, Timings,
};
pub use cadence_pacer::{
    CyclePacer, ErrorBehavior, FnSimulation, PacerBuilder, PacerConfig, Simulation,
};
pub use cadence_telemetry::{
    ChannelStatsSink, FanOut, HistorySummary, LogErrorSink, StatsHistory, SummaryStatsSink,
    TracingStatsSink,
};

/// Everything needed to write a paced simulation.
pub mod prelude {
    pub use crate::presets::memory_reclaim;
    pub use cadence_core::{
        CancelToken, CycleStats, PacerError, Task, TaskPriority, TickContext,
    };
    pub use cadence_pacer::{CyclePacer, ErrorBehavior, PacerConfig, Simulation};
    pub use cadence_telemetry::{StatsHistory, SummaryStatsSink};
}

/// Installs `env_logger` with an `info` default, overridable through
/// `RUST_LOG`.
///
/// Call once from `main`; later calls are ignored.
pub fn init_logging() {
    use env_logger::{Builder, Env};

    if Builder::from_env(Env::default().default_filter_or("info"))
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialized");
    }
}
