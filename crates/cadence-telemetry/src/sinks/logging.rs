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

//! Sinks backed by the `log` facade.

use cadence_core::error::PacerError;
use cadence_core::sink::{ErrorSink, StatsSink};
use cadence_core::stats::CycleStats;
use std::time::{Duration, Instant};

/// Forwards swallowed callback failures to `log::error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn report(&mut self, error: &PacerError) {
        log::error!("{error}");
    }
}

/// Logs a one-line summary of the loop at a fixed interval of loop time.
///
/// The interval is measured on the cycle timestamps carried by the
/// snapshots, so it follows whatever clock drives the pacer.
#[derive(Debug)]
pub struct SummaryStatsSink {
    interval: Duration,
    last_report: Option<Instant>,
    cycles: u64,
    overruns: u64,
    worst_cycle: Duration,
}

impl SummaryStatsSink {
    /// Creates a sink reporting every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_report: None,
            cycles: 0,
            overruns: 0,
            worst_cycle: Duration::ZERO,
        }
    }

    /// Folds one snapshot in and returns `true` if a summary was logged.
    pub fn observe(&mut self, stats: &CycleStats) -> bool {
        let now = stats.cycle.start + stats.cycle.duration;
        let since = *self.last_report.get_or_insert(stats.game.start);

        self.cycles += 1;
        if stats.throttle_time.is_zero() {
            self.overruns += 1;
        }
        self.worst_cycle = self.worst_cycle.max(stats.cycle.duration);

        if now.saturating_duration_since(since) < self.interval {
            return false;
        }

        log::info!(
            "cycle {} | tps {}/{} | fps {} (possible {}) | worst cycle {:?} | overruns {}/{} | tasks {:?}",
            stats.cycle_id,
            stats.current_tps,
            stats.target_tps,
            stats.current_fps,
            stats.possible_fps,
            self.worst_cycle,
            self.overruns,
            self.cycles,
            stats.tasks.duration,
        );

        self.last_report = Some(now);
        self.cycles = 0;
        self.overruns = 0;
        self.worst_cycle = Duration::ZERO;
        true
    }
}

impl Default for SummaryStatsSink {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl StatsSink for SummaryStatsSink {
    fn collect(&mut self, stats: CycleStats) {
        self.observe(&stats);
    }
}
