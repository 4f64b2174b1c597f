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

//! Lightweight phase timing against an injected [`Clock`].

use crate::clock::Clock;
use std::time::{Duration, Instant};

/// Measures the time elapsed since it was started, as seen by a [`Clock`].
#[derive(Clone, Copy)]
pub struct Stopwatch<'a> {
    clock: &'a dyn Clock,
    start_time: Instant,
}

impl<'a> Stopwatch<'a> {
    /// Starts a new stopwatch on the given clock.
    /// ## Returns
    /// A stopwatch whose start instant is `clock.now()`.
    #[inline]
    pub fn start(clock: &'a dyn Clock) -> Self {
        Self {
            clock,
            start_time: clock.now(),
        }
    }

    /// Returns the instant the stopwatch was started at.
    #[inline]
    pub fn started_at(&self) -> Instant {
        self.start_time
    }

    /// Returns the elapsed time since the stopwatch was started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.start_time)
    }

    /// Returns the elapsed time in whole milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Returns the elapsed time in whole microseconds.
    #[inline]
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed().as_micros() as u64
    }

    /// Returns the elapsed time in seconds as f64.
    #[inline]
    pub fn elapsed_secs_f64(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl std::fmt::Debug for Stopwatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stopwatch")
            .field("start_time", &self.start_time)
            .finish()
    }
}
