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

//! Number of fixed-step updates a cycle owes.

use std::time::Duration;

/// Plans the catch-up updates of a cycle that started `delta` after the
/// previous one.
///
/// The pending time is `rate + delta`. The first `rate` of it is consumed by
/// the mandatory update every cycle gets; each further `rate` still pending
/// afterwards, even partially, buys one more update while more than a full
/// `rate` remains. `max_ticks` caps the result when set.
///
/// ## Returns
/// `1` for an on-time cycle (`delta ≈ rate`) or an early one, `n` when the
/// previous cycle stalled for roughly `n` periods.
pub fn plan_ticks(delta: Duration, rate: Duration, max_ticks: Option<u32>) -> u32 {
    if rate.is_zero() {
        return 1;
    }

    // equivalent to decrementing `rate` from `delta` while it exceeds `rate`
    let owed = delta.as_nanos().div_ceil(rate.as_nanos()).saturating_sub(1);
    let ticks = u32::try_from(owed).unwrap_or(u32::MAX);

    match max_ticks {
        Some(max) => ticks.min(max),
        None => ticks,
    }
    .max(1)
}
