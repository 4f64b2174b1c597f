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

//! Scheduler-owned bookkeeping of a registered task.

use crate::priority::TaskScore;
use cadence_core::task::{Task, TaskAction, TaskSpec};
use std::fmt;
use std::time::{Duration, Instant};

/// A task together with its run statistics.
pub struct TaskState {
    pub(crate) spec: TaskSpec,
    pub(crate) action: TaskAction,
    pub(crate) score: TaskScore,
    /// `None` until the first run; a never-run task is infinitely overdue.
    pub(crate) last_run_at: Option<Instant>,
    /// Cumulative moving average; zero means "cost unknown".
    pub(crate) avg_duration: Duration,
    pub(crate) runs_count: u64,
}

impl TaskState {
    /// Wraps a freshly registered task.
    pub fn new(task: Task) -> Self {
        let (action, spec) = task.into_parts();
        Self {
            spec,
            action,
            score: TaskScore::NotNeeded,
            last_run_at: None,
            avg_duration: Duration::ZERO,
            runs_count: 0,
        }
    }

    /// Static metadata of the task.
    pub fn spec(&self) -> &TaskSpec {
        &self.spec
    }

    /// Score computed by the most recent scheduling pass.
    pub fn score(&self) -> TaskScore {
        self.score
    }

    /// Start instant of the most recent run.
    pub fn last_run_at(&self) -> Option<Instant> {
        self.last_run_at
    }

    /// Average measured run time.
    pub fn avg_duration(&self) -> Duration {
        self.avg_duration
    }

    /// Completed runs.
    pub fn runs_count(&self) -> u64 {
        self.runs_count
    }

    /// Records one run that started at `started_at` and took `duration`.
    pub(crate) fn record_run(&mut self, started_at: Instant, duration: Duration) {
        let runs = u128::from(self.runs_count);
        let total = self.avg_duration.as_nanos() * runs + duration.as_nanos();
        let avg = total / (runs + 1);

        self.last_run_at = Some(started_at);
        self.avg_duration = Duration::from_nanos(u64::try_from(avg).unwrap_or(u64::MAX));
        self.runs_count += 1;
    }
}

impl fmt::Debug for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskState")
            .field("spec", &self.spec)
            .field("score", &self.score)
            .field("last_run_at", &self.last_run_at)
            .field("avg_duration", &self.avg_duration)
            .field("runs_count", &self.runs_count)
            .finish_non_exhaustive()
    }
}
