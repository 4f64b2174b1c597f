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

//! Descriptors for opportunistic background tasks.

use std::fmt;
use std::time::Duration;

const DEFAULT_RUN_AT_LEAST_ONCE_IN: Duration = Duration::from_secs(60);
const DEFAULT_RUN_AT_MOST_ONCE_IN: Duration = Duration::from_secs(1);

/// The closure executed when a task is admitted. Opaque to the scheduler.
pub type TaskAction = Box<dyn FnMut() + Send>;

/// Static weighting class of a task against the other tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskPriority {
    /// Weight 0.75.
    Low,
    /// Weight 1.0.
    #[default]
    Normal,
    /// Weight 1.25.
    High,
}

impl TaskPriority {
    /// Multiplier applied to the elapsed fraction of the task's idle window.
    pub fn weight(self) -> f32 {
        match self {
            TaskPriority::Low => 0.75,
            TaskPriority::Normal => 1.0,
            TaskPriority::High => 1.25,
        }
    }
}

/// A background task registered with the pacer before the loop starts.
///
/// A task runs only when the cycle has spare time, but it is guaranteed to run
/// once it has been idle for `run_at_least_once_in`, and never more often than
/// every `run_at_most_once_in`.
pub struct Task {
    name: String,
    priority: TaskPriority,
    run_at_least_once_in: Duration,
    run_at_most_once_in: Duration,
    action: TaskAction,
}

impl Task {
    /// Creates a Normal-priority task that runs at least once a minute and at
    /// most once a second.
    pub fn new(name: impl Into<String>, action: impl FnMut() + Send + 'static) -> Self {
        Self {
            name: name.into(),
            priority: TaskPriority::Normal,
            run_at_least_once_in: DEFAULT_RUN_AT_LEAST_ONCE_IN,
            run_at_most_once_in: DEFAULT_RUN_AT_MOST_ONCE_IN,
            action: Box::new(action),
        }
    }

    /// Sets the priority class.
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Maximum tolerated idle time before the task becomes mandatory.
    pub fn run_at_least_once_in(mut self, interval: Duration) -> Self {
        self.run_at_least_once_in = interval;
        self
    }

    /// Minimum spacing between two runs.
    pub fn run_at_most_once_in(mut self, interval: Duration) -> Self {
        self.run_at_most_once_in = interval;
        self
    }

    /// The task's name, used in logs and diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The task's priority class.
    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// The task's idle limit.
    pub fn at_least_once_in(&self) -> Duration {
        self.run_at_least_once_in
    }

    /// The task's rate limit.
    pub fn at_most_once_in(&self) -> Duration {
        self.run_at_most_once_in
    }

    /// `true` when the rate limit is shorter than the idle limit.
    ///
    /// Ill-formed tasks are accepted, but they only ever run when overdue.
    pub fn is_well_formed(&self) -> bool {
        self.run_at_most_once_in < self.run_at_least_once_in
    }

    /// Splits the descriptor into its action and a copy of its metadata.
    pub fn into_parts(self) -> (TaskAction, TaskSpec) {
        let spec = TaskSpec {
            name: self.name,
            priority: self.priority,
            run_at_least_once_in: self.run_at_least_once_in,
            run_at_most_once_in: self.run_at_most_once_in,
        };
        (self.action, spec)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("run_at_least_once_in", &self.run_at_least_once_in)
            .field("run_at_most_once_in", &self.run_at_most_once_in)
            .finish_non_exhaustive()
    }
}

/// Static metadata of a task, without its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    /// Name used in logs and diagnostics.
    pub name: String,
    /// Priority class.
    pub priority: TaskPriority,
    /// Idle limit ("must run eventually").
    pub run_at_least_once_in: Duration,
    /// Rate limit ("not more often than").
    pub run_at_most_once_in: Duration,
}
