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

//! Structured per-cycle events through `tracing`.

use cadence_core::sink::StatsSink;
use cadence_core::stats::CycleStats;

/// Emits one `tracing` event per cycle under the `cadence::cycle` target.
///
/// Without an installed subscriber the events fall through to the `log`
/// facade, so `RUST_LOG=cadence::cycle=debug` is enough to see them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStatsSink;

impl StatsSink for TracingStatsSink {
    fn collect(&mut self, stats: CycleStats) {
        tracing::debug!(
            target: "cadence::cycle",
            cycle_id = stats.cycle_id,
            ticks = stats.ticks_this_cycle,
            tasks_run = stats.tasks_run,
            tps = stats.current_tps,
            fps = stats.current_fps,
            possible_fps = stats.possible_fps,
            delta_us = stats.delta_time.as_micros() as u64,
            tick_us = stats.tick.duration.as_micros() as u64,
            frame_us = stats.frame.duration.as_micros() as u64,
            tasks_us = stats.tasks.duration.as_micros() as u64,
            throttle_us = stats.throttle_time.as_micros() as u64,
            correction_us = stats.throttle_correction.as_micros() as u64,
            "cycle finished"
        );
    }
}
