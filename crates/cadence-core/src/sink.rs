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

//! Narrow contracts for the pacer's outbound collaborators.

use crate::error::PacerError;
use crate::stats::CycleStats;

/// Receives one statistics snapshot per cycle, after the throttle.
///
/// Sinks are fire-and-forget: they must not block the loop.
pub trait StatsSink: Send {
    /// Consumes the snapshot of the cycle that just finished.
    fn collect(&mut self, stats: CycleStats);
}

impl<F> StatsSink for F
where
    F: FnMut(CycleStats) + Send,
{
    fn collect(&mut self, stats: CycleStats) {
        self(stats)
    }
}

/// Receives callback failures under the log-and-continue policy.
pub trait ErrorSink: Send {
    /// Reports a failure the loop has chosen to swallow.
    fn report(&mut self, error: &PacerError);
}

impl<F> ErrorSink for F
where
    F: FnMut(&PacerError) + Send,
{
    fn report(&mut self, error: &PacerError) {
        self(error)
    }
}

/// A stats sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStatsSink;

impl StatsSink for NoopStatsSink {
    fn collect(&mut self, _stats: CycleStats) {}
}
