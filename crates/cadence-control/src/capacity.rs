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

//! Signed time budget offered to the scheduler.

use std::fmt;
use std::time::Duration;

fn duration_to_nanos(duration: Duration) -> i64 {
    i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX)
}

/// Remaining time budget of a cycle, in nanoseconds.
///
/// Unlike [`Duration`] it can go negative: an overdue task that runs past the
/// budget leaves a debt, and a cycle whose update and draw already overran
/// hands the scheduler a negative capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Capacity(i64);

impl Capacity {
    /// No time left.
    pub const ZERO: Capacity = Capacity(0);

    /// A positive budget of `duration`.
    pub fn from_duration(duration: Duration) -> Self {
        Self(duration_to_nanos(duration))
    }

    /// `budget − spent`, possibly negative.
    pub fn remaining(budget: Duration, spent: Duration) -> Self {
        Self(duration_to_nanos(budget).saturating_sub(duration_to_nanos(spent)))
    }

    /// Subtracts a measured duration.
    pub fn deduct(&mut self, duration: Duration) {
        self.0 = self.0.saturating_sub(duration_to_nanos(duration));
    }

    /// `true` once nothing is left (zero or negative).
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.0 <= 0
    }

    /// `true` if a task expected to take `cost` fits in what is left.
    #[inline]
    pub fn fits(&self, cost: Duration) -> bool {
        duration_to_nanos(cost) <= self.0
    }

    /// The signed value in nanoseconds.
    #[inline]
    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    /// The remaining budget clamped at zero.
    pub fn to_duration(&self) -> Duration {
        Duration::from_nanos(self.0.max(0) as u64)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-{:?}", Duration::from_nanos(self.0.unsigned_abs()))
        } else {
            write!(f, "{:?}", Duration::from_nanos(self.0 as u64))
        }
    }
}
