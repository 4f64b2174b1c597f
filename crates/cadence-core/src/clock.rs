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

//! Time sources used by the scheduler and the cycle pacer.
//!
//! Every component that reads the time does so through [`Clock`], so tests and
//! offline simulations can swap the wall clock for a [`ManualClock`].

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A source of monotonic time that can also block the calling thread.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;

    /// Blocks (or, for simulated clocks, advances) for the given duration.
    fn sleep(&self, duration: Duration);
}

/// The wall clock: [`Instant::now`] and [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A deterministic clock whose time only moves when told to.
///
/// Callbacks under test call [`advance`](Self::advance) to model how long they
/// take; the pacer's throttle goes through [`Clock::sleep`], which advances the
/// clock by the requested duration plus the configured overshoot. A non-zero
/// overshoot models an OS sleep that always wakes up a little late.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
    sleep_overshoot: Duration,
}

impl ManualClock {
    /// Creates a manual clock frozen at the current wall-clock instant.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a manual clock frozen at `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            now: Mutex::new(start),
            sleep_overshoot: Duration::ZERO,
        }
    }

    /// Every call to [`Clock::sleep`] will advance by an extra `overshoot`.
    pub fn with_sleep_overshoot(mut self, overshoot: Duration) -> Self {
        self.sleep_overshoot = overshoot;
        self
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += duration;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration + self.sleep_overshoot);
    }
}
