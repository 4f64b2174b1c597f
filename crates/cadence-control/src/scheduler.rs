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

//! Capacity-constrained execution of background tasks.

use crate::capacity::Capacity;
use crate::priority::{PriorityEvaluator, TaskScore};
use crate::state::TaskState;
use cadence_core::clock::Clock;
use cadence_core::task::{Task, TaskPriority};
use cadence_core::utils::timer::Stopwatch;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Diagnostic view of one registered task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    /// Task name.
    pub name: String,
    /// Priority class.
    pub priority: TaskPriority,
    /// Score of the latest scheduling pass.
    pub score: TaskScore,
    /// Completed runs.
    pub runs_count: u64,
    /// Average measured run time.
    pub avg_duration: Duration,
    /// Start of the latest run.
    pub last_run_at: Option<Instant>,
}

/// Owns the background tasks and runs those that fit in a cycle's spare time.
///
/// The admission is a greedy pass in descending score order, not an optimal
/// packing: a high-priority task that does not fit is skipped, but cheaper
/// lower-priority tasks behind it may still be admitted.
pub struct Scheduler {
    clock: Arc<dyn Clock>,
    evaluator: PriorityEvaluator,
    tasks: Vec<TaskState>,
}

impl Scheduler {
    /// Creates an empty scheduler reading the time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            evaluator: PriorityEvaluator::new(Arc::clone(&clock)),
            clock,
            tasks: Vec::new(),
        }
    }

    /// Creates a scheduler with an initial task set.
    pub fn with_tasks(clock: Arc<dyn Clock>, tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut scheduler = Self::new(clock);
        for task in tasks {
            scheduler.register(task);
        }
        scheduler
    }

    /// Registers a task. Tasks are never removed.
    pub fn register(&mut self, task: Task) {
        if !task.is_well_formed() {
            log::warn!(
                "Scheduler: task '{}' runs at most once in {:?} but at least once in {:?}; it will only run when overdue",
                task.name(),
                task.at_most_once_in(),
                task.at_least_once_in(),
            );
        }
        log::debug!(
            "Scheduler: registered '{}' ({:?})",
            task.name(),
            task.priority()
        );
        self.tasks.push(TaskState::new(task));
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// `true` if no task is registered.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Runs the tasks admitted by `capacity` on the calling thread.
    ///
    /// Returns how many tasks ran. Critical tasks always run and their
    /// measured time is deducted even if that drives the capacity negative.
    pub fn execute(&mut self, mut capacity: Capacity) -> usize {
        if self.tasks.is_empty() {
            return 0;
        }

        let now = self.clock.now();
        for task in &mut self.tasks {
            task.score = self.evaluator.score_at(task, now);
        }

        self.tasks.sort_by(|a, b| b.score.rank().total_cmp(&a.score.rank()));

        let clock = self.clock.as_ref();
        let mut executed = 0;

        for task in &mut self.tasks {
            match task.score {
                TaskScore::NotNeeded => continue,
                TaskScore::Critical => {
                    capacity.deduct(run_task(clock, task));
                    executed += 1;
                    continue;
                }
                TaskScore::Weighted(_) => {}
            }

            if capacity.is_exhausted() {
                break;
            }

            if task.avg_duration.is_zero() {
                // cost unknown: admit it alone
                run_task(clock, task);
                executed += 1;
                break;
            }

            if !capacity.fits(task.avg_duration) {
                continue;
            }

            capacity.deduct(run_task(clock, task));
            executed += 1;
        }

        log::trace!(
            "Scheduler: {} task(s) run, capacity left {}",
            executed,
            capacity
        );
        executed
    }

    /// Diagnostic snapshots of all tasks, in the order of the latest pass.
    pub fn task_stats(&self) -> Vec<TaskSnapshot> {
        self.tasks
            .iter()
            .map(|task| TaskSnapshot {
                name: task.spec.name.clone(),
                priority: task.spec.priority,
                score: task.score,
                runs_count: task.runs_count,
                avg_duration: task.avg_duration,
                last_run_at: task.last_run_at,
            })
            .collect()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

/// Runs the task's action and returns its measured duration.
fn run_task(clock: &dyn Clock, task: &mut TaskState) -> Duration {
    let watch = Stopwatch::start(clock);
    (task.action)();
    let duration = watch.elapsed();

    task.record_run(watch.started_at(), duration);

    log::trace!(
        "Scheduler: ran '{}' in {:?} (avg {:?}, runs {})",
        task.spec.name,
        duration,
        task.avg_duration,
        task.runs_count
    );
    duration
}
