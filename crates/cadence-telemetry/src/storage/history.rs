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

//! Rolling history of cycle timings.

use crate::storage::ring_buffer::RingBuffer;
use cadence_core::sink::StatsSink;
use cadence_core::stats::CycleStats;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

fn millis(duration: Duration) -> f32 {
    duration.as_secs_f32() * 1000.0
}

#[derive(Debug, Default)]
struct Windows<const N: usize> {
    cycle_ms: RingBuffer<N>,
    busy_ms: RingBuffer<N>,
    tasks_ms: RingBuffer<N>,
    throttle_ms: RingBuffer<N>,
    last_tps: u32,
}

/// Aggregates over the samples currently held, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HistorySummary {
    /// Samples in the window.
    pub samples: usize,
    /// Mean cycle duration, throttle included.
    pub cycle_mean_ms: f32,
    /// Variance of the cycle duration.
    pub cycle_variance: f32,
    /// Longest cycle in the window.
    pub cycle_max_ms: f32,
    /// Mean time spent in updates and draw.
    pub busy_mean_ms: f32,
    /// Mean time spent in background tasks.
    pub tasks_mean_ms: f32,
    /// Mean throttle sleep.
    pub throttle_mean_ms: f32,
    /// Shortest throttle sleep; zero means at least one cycle overran.
    pub throttle_min_ms: f32,
    /// Achieved tick rate reported by the latest snapshot.
    pub current_tps: u32,
}

/// Keeps the last `N` cycles of timing samples.
///
/// The history is a cheap, cloneable handle: hand one clone to the pacer as
/// its stats sink and keep another to read summaries from any thread.
#[derive(Debug, Clone)]
pub struct StatsHistory<const N: usize = 120> {
    windows: Arc<Mutex<Windows<N>>>,
}

impl<const N: usize> StatsHistory<N> {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self {
            windows: Arc::new(Mutex::new(Windows::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Windows<N>> {
        self.windows.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Appends one snapshot.
    pub fn record(&self, stats: &CycleStats) {
        let mut windows = self.lock();
        windows.cycle_ms.push(millis(stats.cycle.duration));
        windows.busy_ms.push(millis(stats.busy_time()));
        windows.tasks_ms.push(millis(stats.tasks.duration));
        windows.throttle_ms.push(millis(stats.throttle_time));
        windows.last_tps = stats.current_tps;
    }

    /// Aggregates the current window.
    pub fn summary(&self) -> HistorySummary {
        let windows = self.lock();
        HistorySummary {
            samples: windows.cycle_ms.len(),
            cycle_mean_ms: windows.cycle_ms.mean(),
            cycle_variance: windows.cycle_ms.variance(),
            cycle_max_ms: windows.cycle_ms.max().unwrap_or(0.0),
            busy_mean_ms: windows.busy_ms.mean(),
            tasks_mean_ms: windows.tasks_ms.mean(),
            throttle_mean_ms: windows.throttle_ms.mean(),
            throttle_min_ms: windows.throttle_ms.min().unwrap_or(0.0),
            current_tps: windows.last_tps,
        }
    }

    /// Cycle durations in milliseconds, oldest first.
    pub fn cycle_durations_ms(&self) -> Vec<f32> {
        self.lock().cycle_ms.iter().collect()
    }
}

impl<const N: usize> Default for StatsHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> StatsSink for StatsHistory<N> {
    fn collect(&mut self, stats: CycleStats) {
        self.record(&stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Instant;

    fn snapshot(cycle_ms: u64, busy_ms: u64, throttle_ms: u64) -> CycleStats {
        let mut stats = CycleStats::new(25, Duration::from_millis(40), Instant::now());
        stats.cycle.duration = Duration::from_millis(cycle_ms);
        stats.tick.duration = Duration::from_millis(busy_ms);
        stats.throttle_time = Duration::from_millis(throttle_ms);
        stats.current_tps = 25;
        stats
    }

    #[test]
    fn test_reader_handle_sees_sink_writes() {
        let reader = StatsHistory::<4>::new();
        let mut sink = reader.clone();

        sink.collect(snapshot(40, 30, 10));
        sink.collect(snapshot(40, 30, 10));
        sink.collect(snapshot(55, 55, 0));

        let summary = reader.summary();
        assert_eq!(summary.samples, 3);
        assert_relative_eq!(summary.cycle_mean_ms, 45.0, epsilon = 1e-3);
        assert_relative_eq!(summary.cycle_max_ms, 55.0, epsilon = 1e-3);
        assert_relative_eq!(summary.throttle_min_ms, 0.0);
        assert_eq!(summary.current_tps, 25);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let history = StatsHistory::<2>::new();
        history.record(&snapshot(10, 5, 5));
        history.record(&snapshot(20, 5, 5));
        history.record(&snapshot(30, 5, 5));

        let durations = history.cycle_durations_ms();
        assert_eq!(durations.len(), 2);
        assert_relative_eq!(durations[0], 20.0, epsilon = 1e-3);
        assert_relative_eq!(durations[1], 30.0, epsilon = 1e-3);
    }
}
