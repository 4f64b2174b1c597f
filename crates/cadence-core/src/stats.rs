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

//! Per-cycle statistics and the context handed to each state update.

use std::time::{Duration, Instant};

/// Start instant and duration of one measured span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// When the span started.
    pub start: Instant,
    /// How long the span lasted.
    pub duration: Duration,
}

impl Timings {
    /// An empty span starting at `start`.
    pub fn at(start: Instant) -> Self {
        Self {
            start,
            duration: Duration::ZERO,
        }
    }
}

/// Passed to every state-update call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    /// The cycle this tick belongs to (starts at 1).
    pub cycle_id: u64,
    /// Index of this tick among the catch-up ticks of the cycle (starts at 0).
    pub tick_index: u32,
    /// Fixed simulation step, always `1s / target_tps`.
    ///
    /// If you want to move an entity at 100 units per second, integrate
    /// `100.0 * tick.delta_secs()` per tick: at 60 TPS that is 1/60 s per step,
    /// at 30 TPS 1/30 s, and both cover 100 units per simulated second.
    pub delta_time: Duration,
}

impl TickContext {
    /// `delta_time` in seconds.
    #[inline]
    pub fn delta_secs(&self) -> f64 {
        self.delta_time.as_secs_f64()
    }
}

/// Snapshot of one loop cycle, handed to the stats sink after the throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    /// Number of cycles since the loop started; the first cycle is 1.
    pub cycle_id: u64,
    /// Configured ticks per second.
    pub target_tps: u32,
    /// `1s / target_tps`, the budget of one cycle.
    pub rate: Duration,
    /// Wall-clock time between the start of the previous cycle and this one.
    pub delta_time: Duration,

    /// Whole loop, from its start until the end of this cycle.
    pub game: Timings,
    /// This cycle, including the throttle sleep.
    pub cycle: Timings,
    /// All catch-up updates of this cycle.
    pub tick: Timings,
    /// The draw call of this cycle.
    pub frame: Timings,
    /// Background tasks of this cycle.
    pub tasks: Timings,

    /// Update calls performed this cycle (at least 1).
    pub ticks_this_cycle: u32,
    /// Background tasks run this cycle.
    pub tasks_run: usize,

    /// How late this cycle started relative to its ideal start, modulo `rate`.
    pub throttle_correction: Duration,
    /// Time slept at the end of this cycle. Zero when the cycle overran.
    pub throttle_time: Duration,

    /// Update calls counted over the last full wall-clock second.
    pub current_tps: u32,
    /// Draw calls counted over the last full wall-clock second.
    pub current_fps: u32,
    /// `1s / (update + draw)` of this cycle: the rate the machine could reach.
    pub possible_fps: u32,
}

impl CycleStats {
    /// Statistics before the first cycle ran.
    pub fn new(target_tps: u32, rate: Duration, now: Instant) -> Self {
        Self {
            cycle_id: 0,
            target_tps,
            rate,
            delta_time: Duration::ZERO,
            game: Timings::at(now),
            cycle: Timings::at(now),
            tick: Timings::at(now),
            frame: Timings::at(now),
            tasks: Timings::at(now),
            ticks_this_cycle: 0,
            tasks_run: 0,
            throttle_correction: Duration::ZERO,
            throttle_time: Duration::ZERO,
            current_tps: 0,
            current_fps: 0,
            possible_fps: 0,
        }
    }

    /// Time spent in updates and the draw call.
    pub fn busy_time(&self) -> Duration {
        self.tick.duration + self.frame.duration
    }

    /// Fraction of the cycle budget consumed by updates, draw, and tasks.
    pub fn load(&self) -> f64 {
        if self.rate.is_zero() {
            return 0.0;
        }
        (self.busy_time() + self.tasks.duration).as_secs_f64() / self.rate.as_secs_f64()
    }
}

/// Theoretical frame rate for a cycle that spent `busy` in updates and draw.
pub fn possible_fps(busy: Duration) -> u32 {
    let nanos = busy.as_nanos().max(1);
    let fps = Duration::from_secs(1).as_nanos() / nanos;
    u32::try_from(fps).unwrap_or(u32::MAX)
}
