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

//! Urgency scoring of background tasks.

use crate::state::TaskState;
use cadence_core::clock::Clock;
use std::sync::Arc;
use std::time::Instant;

const RANK_NOT_NEEDED: f32 = -1.0;
const RANK_CRITICAL: f32 = 2.0;

/// How urgently a task wants to run right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskScore {
    /// Ran too recently; excluded from this cycle whatever the budget.
    NotNeeded,
    /// Idle past its limit; runs this cycle without a capacity check.
    Critical,
    /// Elapsed fraction of the idle window times the priority weight, in `(0, 1.25]`.
    Weighted(f32),
}

impl TaskScore {
    /// Sort key: −1 for not needed, +2 for critical, the weight otherwise.
    #[inline]
    pub fn rank(self) -> f32 {
        match self {
            TaskScore::NotNeeded => RANK_NOT_NEEDED,
            TaskScore::Critical => RANK_CRITICAL,
            TaskScore::Weighted(value) => value,
        }
    }
}

/// Scores tasks against an injected clock.
#[derive(Clone)]
pub struct PriorityEvaluator {
    clock: Arc<dyn Clock>,
}

impl PriorityEvaluator {
    /// Creates an evaluator reading the time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Scores `task` at the clock's current time.
    pub fn score(&self, task: &TaskState) -> TaskScore {
        self.score_at(task, self.clock.now())
    }

    /// Scores `task` as of `now`, so that a whole pass shares one instant.
    //
    // since | low  | normal | high
    // 0.25  | 0.19 | 0.25   | 0.31
    // 0.50  | 0.38 | 0.50   | 0.63
    // 0.90  | 0.68 | 0.90   | 1.13
    pub fn score_at(&self, task: &TaskState, now: Instant) -> TaskScore {
        let Some(last_run_at) = task.last_run_at else {
            // never ran: first run is always forced
            return TaskScore::Critical;
        };

        let since_last = now.saturating_duration_since(last_run_at);

        if since_last < task.spec.run_at_most_once_in {
            return TaskScore::NotNeeded;
        }

        if since_last >= task.spec.run_at_least_once_in {
            return TaskScore::Critical;
        }

        let fraction = since_last.as_secs_f64() / task.spec.run_at_least_once_in.as_secs_f64();
        TaskScore::Weighted(fraction as f32 * task.spec.priority.weight())
    }
}

impl std::fmt::Debug for PriorityEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityEvaluator").finish_non_exhaustive()
    }
}
