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

//! Long-run drift correction of the throttle sleep.
//!
//! Sleeping `rate − work` every cycle drifts, because the OS never wakes the
//! thread exactly on time. Instead each cycle is compared to the grid
//! `game_start + (cycle_id − 1) · rate` and its lateness within one rate
//! period is shaved off the next sleep.

use std::time::{Duration, Instant};

/// The instant cycle `cycle_id` (starting at 1) should have started at.
pub fn ideal_cycle_start(game_start: Instant, cycle_id: u64, rate: Duration) -> Instant {
    let periods = u128::from(cycle_id.saturating_sub(1));
    let offset = rate.as_nanos().saturating_mul(periods);
    game_start + Duration::from_nanos(u64::try_from(offset).unwrap_or(u64::MAX))
}

/// Lateness of `actual_start` against `ideal_start`, modulo `rate`.
///
/// Zero when the cycle started on time or early: only positive corrections
/// shorten the sleep.
pub fn throttle_correction(
    actual_start: Instant,
    ideal_start: Instant,
    rate: Duration,
) -> Duration {
    let rate_nanos = rate.as_nanos();
    if rate_nanos == 0 {
        return Duration::ZERO;
    }

    let late = actual_start.saturating_duration_since(ideal_start).as_nanos();
    let correction = late % rate_nanos;
    Duration::from_nanos(u64::try_from(correction).unwrap_or(u64::MAX))
}
