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

//! Achieved tick and frame rates.

use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Counts updates and draws per wall-clock second.
///
/// The reported rates are those of the last completed window, so they stay
/// at zero during the first second of the loop.
#[derive(Debug, Clone)]
pub struct RateCounter {
    window_start: Instant,
    ticks: u32,
    frames: u32,
    current_tps: u32,
    current_fps: u32,
}

impl RateCounter {
    /// Starts the first window at `start`.
    pub fn new(start: Instant) -> Self {
        Self {
            window_start: start,
            ticks: 0,
            frames: 0,
            current_tps: 0,
            current_fps: 0,
        }
    }

    /// Closes the current window if a second has elapsed by `now`.
    ///
    /// Returns `true` when the reported rates were refreshed. After a stall
    /// longer than a window the next window starts at `now`.
    pub fn roll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.window_start) < WINDOW {
            return false;
        }

        self.current_tps = self.ticks;
        self.current_fps = self.frames;
        self.ticks = 0;
        self.frames = 0;

        self.window_start += WINDOW;
        if now.saturating_duration_since(self.window_start) >= WINDOW {
            self.window_start = now;
        }
        true
    }

    /// Adds the updates and draws of one cycle to the current window.
    pub fn record(&mut self, ticks: u32, frames: u32) {
        self.ticks = self.ticks.saturating_add(ticks);
        self.frames = self.frames.saturating_add(frames);
    }

    /// Updates counted over the last completed window.
    pub fn current_tps(&self) -> u32 {
        self.current_tps
    }

    /// Draws counted over the last completed window.
    pub fn current_fps(&self) -> u32 {
        self.current_fps
    }
}
