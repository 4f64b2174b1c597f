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

//! Fixed-capacity sample window.

/// The last `N` samples of a series, oldest evicted first.
#[derive(Debug, Clone)]
pub struct RingBuffer<const N: usize> {
    samples: [f32; N],
    next: usize,
    len: usize,
}

impl<const N: usize> RingBuffer<N> {
    /// Creates an empty window.
    pub fn new() -> Self {
        Self {
            samples: [0.0; N],
            next: 0,
            len: 0,
        }
    }

    /// Appends a sample, evicting the oldest once full.
    pub fn push(&mut self, sample: f32) {
        if N == 0 {
            return;
        }
        self.samples[self.next] = sample;
        self.next = (self.next + 1) % N;
        self.len = (self.len + 1).min(N);
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` before the first push.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let oldest = (self.next + N - self.len) % N.max(1);
        (0..self.len).map(move |i| self.samples[(oldest + i) % N])
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<f32> {
        if self.len == 0 {
            return None;
        }
        Some(self.samples[(self.next + N - 1) % N])
    }

    /// Arithmetic mean, zero when empty.
    pub fn mean(&self) -> f32 {
        if self.len == 0 {
            return 0.0;
        }
        self.iter().sum::<f32>() / self.len as f32
    }

    /// Population variance, zero with fewer than two samples.
    ///
    /// High variance of cycle durations is what a player perceives as stutter.
    pub fn variance(&self) -> f32 {
        if self.len < 2 {
            return 0.0;
        }
        let mean = self.mean();
        self.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / self.len as f32
    }

    /// Smallest sample.
    pub fn min(&self) -> Option<f32> {
        self.iter().reduce(f32::min)
    }

    /// Largest sample.
    pub fn max(&self) -> Option<f32> {
        self.iter().reduce(f32::max)
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
